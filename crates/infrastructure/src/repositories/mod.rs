pub mod sqlite_student_repository;

pub use sqlite_student_repository::SqliteStudentRepository;
