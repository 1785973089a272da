// Database schema for the student registry
diesel::table! {
    students (id) {
        id -> Text,                // Hyphenated UUID
        name -> Text,
        age -> Integer,
        course -> Text,            // Display name of the course
        email -> Text,             // Lowercased, unique
        created_at -> Timestamp,   // UTC
    }
}

/// DDL applied on startup; the CHECK and UNIQUE constraints back up the
/// service-level validation.
pub const CREATE_STUDENTS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS students (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        age INTEGER NOT NULL CHECK (age BETWEEN 18 AND 60),
        course TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        created_at TIMESTAMP NOT NULL
    )
";
