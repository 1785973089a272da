use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Opaque identifier assigned by the store when a student is first persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(Uuid);

impl StudentId {
    /// Only repositories mint new ids; everything else parses them.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for StudentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// The closed set of programs a student can be enrolled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Course {
    #[serde(rename = "Computer Science")]
    ComputerScience,
    #[serde(rename = "Electrical Engineering")]
    ElectricalEngineering,
    #[serde(rename = "Mechanical Engineering")]
    MechanicalEngineering,
    #[serde(rename = "Civil Engineering")]
    CivilEngineering,
    #[serde(rename = "Business")]
    Business,
}

impl Course {
    pub const ALL: [Course; 5] = [
        Course::ComputerScience,
        Course::ElectricalEngineering,
        Course::MechanicalEngineering,
        Course::CivilEngineering,
        Course::Business,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Course::ComputerScience => "Computer Science",
            Course::ElectricalEngineering => "Electrical Engineering",
            Course::MechanicalEngineering => "Mechanical Engineering",
            Course::CivilEngineering => "Civil Engineering",
            Course::Business => "Business",
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown course '{0}'")]
pub struct UnknownCourse(pub String);

impl FromStr for Course {
    type Err = UnknownCourse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Course::ALL
            .into_iter()
            .find(|course| course.as_str() == s)
            .ok_or_else(|| UnknownCourse(s.to_string()))
    }
}

/// The mutable part of a student, already validated and normalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentFields {
    pub name: String,
    pub age: u8,
    pub course: Course,
    pub email: String,
}

/// Core Student entity as it exists in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub age: u8,
    pub course: Course,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Student {
    pub fn new(id: StudentId, fields: StudentFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            age: fields.age,
            course: fields.course,
            email: fields.email,
            created_at,
        }
    }

    /// Replace the mutable fields; id and created_at stay as they were.
    pub fn apply(&mut self, fields: StudentFields) {
        self.name = fields.name;
        self.age = fields.age;
        self.course = fields.course;
        self.email = fields.email;
    }

    pub fn fields(&self) -> StudentFields {
        StudentFields {
            name: self.name.clone(),
            age: self.age,
            course: self.course,
            email: self.email.clone(),
        }
    }
}
