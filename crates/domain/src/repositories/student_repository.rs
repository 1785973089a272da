use crate::entities::{Student, StudentFields, StudentId};
use crate::errors::DomainError;
use async_trait::async_trait;

/// Persistence port for students.
///
/// Implementations own the storage representation: they mint the id and
/// creation timestamp on insert and never change either afterwards. Email
/// values arrive already normalized, so lookups compare them exactly.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn find_by_id(&self, id: &StudentId) -> Result<Option<Student>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, DomainError>;
    async fn find_all(&self) -> Result<Vec<Student>, DomainError>;
    async fn insert(&self, fields: &StudentFields) -> Result<Student, DomainError>;
    /// Returns `None` when no record has this id.
    async fn update(
        &self,
        id: &StudentId,
        fields: &StudentFields,
    ) -> Result<Option<Student>, DomainError>;
    /// Returns `false` when no record has this id.
    async fn delete(&self, id: &StudentId) -> Result<bool, DomainError>;
}
