use domain::*;
use infrastructure::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Student Application - wires the store handle, repository and service once at startup
pub struct StudentApp {
    pub student_service: StudentService,
}

impl StudentApp {
    pub fn new(database_url: &str, store_timeout: Duration) -> Result<Self, DomainError> {
        // Infrastructure layer - database setup
        let database = Database::new(database_url, store_timeout)?;
        let pool = database.get_pool().clone();

        let student_repository: Arc<dyn StudentRepository> =
            Arc::new(SqliteStudentRepository::new(pool));

        info!("💾 Student store opened at {}", database_url);

        Ok(Self::with_repository(student_repository))
    }

    /// Build the app over any repository implementation
    pub fn with_repository(student_repository: Arc<dyn StudentRepository>) -> Self {
        Self {
            student_service: StudentService::new(student_repository),
        }
    }
}
