use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use domain::DomainError;
use std::time::Duration;
use tracing::debug;

pub mod schema;
pub use schema::*;

pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

const IN_MEMORY: &str = ":memory:";

/// Per-connection settings applied whenever the pool hands out a connection
#[derive(Debug)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        diesel::sql_query(format!(
            "PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ))
        .execute(conn)
        .map(|_| ())
        .map_err(r2d2::Error::QueryError)
    }
}

/// Store handle: built once at startup and handed to the repositories
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub fn new(database_url: &str, timeout: Duration) -> Result<Self, DomainError> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let mut builder = r2d2::Pool::builder()
            .connection_timeout(timeout)
            .connection_customizer(Box::new(ConnectionOptions {
                busy_timeout: timeout,
            }));

        // Every SQLite in-memory connection is its own database, so keep exactly one alive
        if database_url == IN_MEMORY {
            builder = builder
                .max_size(1)
                .min_idle(Some(1))
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = builder
            .build(manager)
            .map_err(|e| DomainError::StoreUnavailable(e.to_string()))?;

        let database = Database { pool };
        database.create_schema()?;
        debug!("Student store ready at {}", database_url);

        Ok(database)
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn create_schema(&self) -> Result<(), DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::StoreUnavailable(e.to_string()))?;

        diesel::sql_query(CREATE_STUDENTS_TABLE)
            .execute(&mut conn)
            .map_err(|e| DomainError::StoreUnavailable(e.to_string()))?;

        Ok(())
    }
}
