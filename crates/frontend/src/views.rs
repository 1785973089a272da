use domain::{Student, StudentDraft, StudentId, ValidationErrors};

/// View-model handed to a renderer for one page
#[derive(Debug)]
pub enum View<'a> {
    /// Every student, in store order
    Home { students: &'a [Student] },
    Add { form: &'a StudentForm },
    Edit { id: &'a StudentId, form: &'a StudentForm },
    See { student: &'a Student },
}

/// Form contents plus whatever was wrong with the last submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentForm {
    pub values: StudentDraft,
    pub errors: ValidationErrors,
    /// Problem not tied to a single field input, e.g. a taken email
    pub notice: Option<String>,
}

impl StudentForm {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn prefilled(student: &Student) -> Self {
        Self {
            values: StudentDraft::from(&student.fields()),
            ..Self::default()
        }
    }

    pub fn rejected(values: StudentDraft, errors: ValidationErrors) -> Self {
        Self {
            values,
            errors,
            notice: None,
        }
    }

    pub fn with_notice(values: StudentDraft, notice: impl Into<String>) -> Self {
        Self {
            values,
            errors: ValidationErrors::default(),
            notice: Some(notice.into()),
        }
    }
}

/// Turns a view-model into markup
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &View<'_>) -> String;
}
