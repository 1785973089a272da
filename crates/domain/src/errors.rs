use crate::validation::ValidationErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationErrors),

    #[error("A student with email {0} already exists")]
    DuplicateEmail(String),

    #[error("Student not found with id: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Stored record could not be decoded: {0}")]
    CorruptRecord(String),
}
