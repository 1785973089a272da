use crate::database::{students, SqlitePool};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use domain::{Course, DomainError, Student, StudentFields, StudentId, StudentRepository};
use tracing::warn;

// Database model - separate from domain entity
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct StudentModel {
    id: String,
    name: String,
    age: i32,
    course: String,
    email: String,
    created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = students)]
struct NewStudentModel {
    id: String,
    name: String,
    age: i32,
    course: String,
    email: String,
    created_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = students)]
struct StudentChangeset {
    name: String,
    age: i32,
    course: String,
    email: String,
}

// Convert between domain and database models
impl TryFrom<StudentModel> for Student {
    type Error = DomainError;

    fn try_from(model: StudentModel) -> Result<Self, Self::Error> {
        let id = model
            .id
            .parse::<StudentId>()
            .map_err(|e| DomainError::CorruptRecord(format!("id {}: {}", model.id, e)))?;
        let course = model
            .course
            .parse::<Course>()
            .map_err(|e| DomainError::CorruptRecord(format!("student {}: {}", id, e)))?;
        let age = u8::try_from(model.age).map_err(|_| {
            DomainError::CorruptRecord(format!("student {}: age {}", id, model.age))
        })?;

        Ok(Student::new(
            id,
            StudentFields {
                name: model.name,
                age,
                course,
                email: model.email,
            },
            model.created_at.and_utc(),
        ))
    }
}

impl From<&StudentFields> for StudentChangeset {
    fn from(fields: &StudentFields) -> Self {
        StudentChangeset {
            name: fields.name.clone(),
            age: i32::from(fields.age),
            course: fields.course.as_str().to_string(),
            email: fields.email.clone(),
        }
    }
}

fn store_error(e: impl ToString) -> DomainError {
    DomainError::StoreUnavailable(e.to_string())
}

// A UNIQUE violation means another writer claimed the email between the
// service's pre-check and this write.
fn write_error(e: DieselError, email: &str) -> DomainError {
    match e {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            warn!("Unique constraint rejected {}: {}", email, info.message());
            DomainError::DuplicateEmail(email.to_string())
        }
        other => store_error(other),
    }
}

pub struct SqliteStudentRepository {
    pool: SqlitePool,
}

impl SqliteStudentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentRepository for SqliteStudentRepository {
    async fn find_by_id(&self, id: &StudentId) -> Result<Option<Student>, DomainError> {
        let mut conn = self.pool.get().map_err(store_error)?;

        let id = id.to_string();
        let result = tokio::task::spawn_blocking(move || {
            students::table
                .filter(students::id.eq(id))
                .select(StudentModel::as_select())
                .first::<StudentModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(store_error)?
        .map_err(store_error)?;

        result.map(Student::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, DomainError> {
        let mut conn = self.pool.get().map_err(store_error)?;

        let email = email.to_string();
        let result = tokio::task::spawn_blocking(move || {
            students::table
                .filter(students::email.eq(email))
                .select(StudentModel::as_select())
                .first::<StudentModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(store_error)?
        .map_err(store_error)?;

        result.map(Student::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Student>, DomainError> {
        let mut conn = self.pool.get().map_err(store_error)?;

        let result = tokio::task::spawn_blocking(move || {
            students::table
                .order(students::created_at.asc())
                .select(StudentModel::as_select())
                .load::<StudentModel>(&mut conn)
        })
        .await
        .map_err(store_error)?
        .map_err(store_error)?;

        result.into_iter().map(Student::try_from).collect()
    }

    async fn insert(&self, fields: &StudentFields) -> Result<Student, DomainError> {
        let mut conn = self.pool.get().map_err(store_error)?;

        let id = StudentId::generate().to_string();
        let new_student = NewStudentModel {
            id: id.clone(),
            name: fields.name.clone(),
            age: i32::from(fields.age),
            course: fields.course.as_str().to_string(),
            email: fields.email.clone(),
            created_at: Utc::now().naive_utc(),
        };

        let result = tokio::task::spawn_blocking(move || {
            diesel::insert_into(students::table)
                .values(&new_student)
                .execute(&mut conn)?;

            // Read back what the store actually holds
            students::table
                .filter(students::id.eq(id))
                .select(StudentModel::as_select())
                .first::<StudentModel>(&mut conn)
        })
        .await
        .map_err(store_error)?
        .map_err(|e| write_error(e, &fields.email))?;

        Student::try_from(result)
    }

    async fn update(
        &self,
        id: &StudentId,
        fields: &StudentFields,
    ) -> Result<Option<Student>, DomainError> {
        let mut conn = self.pool.get().map_err(store_error)?;

        let id = id.to_string();
        let changes = StudentChangeset::from(fields);

        let result = tokio::task::spawn_blocking(move || -> QueryResult<Option<StudentModel>> {
            let updated = diesel::update(students::table.filter(students::id.eq(&id)))
                .set(&changes)
                .execute(&mut conn)?;

            if updated == 0 {
                return Ok(None);
            }

            // Fetch the updated student
            students::table
                .filter(students::id.eq(&id))
                .select(StudentModel::as_select())
                .first::<StudentModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(store_error)?
        .map_err(|e| write_error(e, &fields.email))?;

        result.map(Student::try_from).transpose()
    }

    async fn delete(&self, id: &StudentId) -> Result<bool, DomainError> {
        let mut conn = self.pool.get().map_err(store_error)?;

        let id = id.to_string();
        let deleted = tokio::task::spawn_blocking(move || {
            diesel::delete(students::table.filter(students::id.eq(id))).execute(&mut conn)
        })
        .await
        .map_err(store_error)?
        .map_err(store_error)?;

        Ok(deleted > 0)
    }
}
