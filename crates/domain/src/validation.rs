use crate::entities::{Course, StudentFields};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::IntErrorKind;
use std::sync::LazyLock;

pub const MIN_AGE: i64 = 18;
pub const MAX_AGE: i64 = 60;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid"));

/// A single rejected field and the reason it was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every field error found in one candidate record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |error| error.field == field)
            .map(|error| error.message.as_str())
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Candidate student fields exactly as submitted by a client.
///
/// Everything is optional text so that a missing field and a malformed one
/// can be reported separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDraft {
    pub name: Option<String>,
    pub age: Option<String>,
    pub course: Option<String>,
    pub email: Option<String>,
}

impl StudentDraft {
    /// Check every field and return the normalized record, or all field errors.
    pub fn validate(&self) -> Result<StudentFields, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = validate_name(self.name.as_deref(), &mut errors);
        let age = validate_age(self.age.as_deref(), &mut errors);
        let course = validate_course(self.course.as_deref(), &mut errors);
        let email = validate_email(self.email.as_deref(), &mut errors);

        match (name, age, course, email) {
            (Some(name), Some(age), Some(course), Some(email)) if errors.is_empty() => {
                Ok(StudentFields {
                    name,
                    age,
                    course,
                    email,
                })
            }
            _ => Err(errors),
        }
    }
}

impl From<&StudentFields> for StudentDraft {
    fn from(fields: &StudentFields) -> Self {
        Self {
            name: Some(fields.name.clone()),
            age: Some(fields.age.to_string()),
            course: Some(fields.course.as_str().to_string()),
            email: Some(fields.email.clone()),
        }
    }
}

// Blank input counts as missing
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn validate_name(value: Option<&str>, errors: &mut ValidationErrors) -> Option<String> {
    match present(value) {
        Some(name) => Some(name.to_string()),
        None => {
            errors.push("name", "Name is required");
            None
        }
    }
}

fn validate_age(value: Option<&str>, errors: &mut ValidationErrors) -> Option<u8> {
    let Some(raw) = present(value) else {
        errors.push("age", "Age is required");
        return None;
    };

    let age = match raw.parse::<i64>() {
        Ok(age) => age,
        // Integers too wide for i64 are still integers, just out of range
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow) => MAX_AGE + 1,
        Err(e) if matches!(e.kind(), IntErrorKind::NegOverflow) => MIN_AGE - 1,
        Err(_) => {
            errors.push("age", "Age must be a whole number");
            return None;
        }
    };

    if age < MIN_AGE {
        errors.push("age", format!("Age must be at least {}", MIN_AGE));
        return None;
    }
    if age > MAX_AGE {
        errors.push("age", format!("Age must be at most {}", MAX_AGE));
        return None;
    }

    u8::try_from(age).ok()
}

fn validate_course(value: Option<&str>, errors: &mut ValidationErrors) -> Option<Course> {
    let Some(raw) = present(value) else {
        errors.push("course", "Course is required");
        return None;
    };

    match raw.parse::<Course>() {
        Ok(course) => Some(course),
        Err(_) => {
            let allowed: Vec<&str> = Course::ALL.iter().map(Course::as_str).collect();
            errors.push(
                "course",
                format!("Course must be one of: {}", allowed.join(", ")),
            );
            None
        }
    }
}

fn validate_email(value: Option<&str>, errors: &mut ValidationErrors) -> Option<String> {
    let Some(raw) = present(value) else {
        errors.push("email", "Email is required");
        return None;
    };

    if !EMAIL_SHAPE.is_match(raw) {
        errors.push("email", "Please enter a valid email");
        return None;
    }

    Some(raw.to_lowercase())
}
