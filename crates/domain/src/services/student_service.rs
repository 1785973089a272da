use crate::entities::{Student, StudentId};
use crate::errors::DomainError;
use crate::repositories::StudentRepository;
use crate::validation::StudentDraft;
use std::sync::Arc;

/// Student Service - validation and uniqueness rules in front of the repository
pub struct StudentService {
    student_repository: Arc<dyn StudentRepository>,
}

impl StudentService {
    pub fn new(student_repository: Arc<dyn StudentRepository>) -> Self {
        Self { student_repository }
    }

    /// Validate a draft and persist it as a new student
    pub async fn create_student(&self, draft: &StudentDraft) -> Result<Student, DomainError> {
        let fields = draft.validate()?;

        if self
            .student_repository
            .find_by_email(&fields.email)
            .await?
            .is_some()
        {
            return Err(DomainError::DuplicateEmail(fields.email));
        }

        self.student_repository.insert(&fields).await
    }

    /// All students in store order
    pub async fn list_students(&self) -> Result<Vec<Student>, DomainError> {
        self.student_repository.find_all().await
    }

    pub async fn get_student(&self, id: &StudentId) -> Result<Student, DomainError> {
        match self.student_repository.find_by_id(id).await? {
            Some(student) => Ok(student),
            None => Err(DomainError::NotFound(id.to_string())),
        }
    }

    /// Replace the mutable fields of an existing student
    pub async fn update_student(
        &self,
        id: &StudentId,
        draft: &StudentDraft,
    ) -> Result<Student, DomainError> {
        let fields = draft.validate()?;

        // Check if student exists
        self.get_student(id).await?;

        // Check if new email conflicts with another student
        if let Some(existing) = self.student_repository.find_by_email(&fields.email).await? {
            if existing.id != *id {
                return Err(DomainError::DuplicateEmail(fields.email));
            }
        }

        self.student_repository
            .update(id, &fields)
            .await?
            .ok_or_else(|| DomainError::NotFound(id.to_string()))
    }

    pub async fn delete_student(&self, id: &StudentId) -> Result<(), DomainError> {
        if self.student_repository.delete(id).await? {
            Ok(())
        } else {
            Err(DomainError::NotFound(id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Course, StudentFields};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryRepository {
        students: Mutex<Vec<Student>>,
        offline: AtomicBool,
    }

    impl MemoryRepository {
        fn check_online(&self) -> Result<(), DomainError> {
            if self.offline.load(Ordering::SeqCst) {
                Err(DomainError::StoreUnavailable("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl StudentRepository for MemoryRepository {
        async fn find_by_id(&self, id: &StudentId) -> Result<Option<Student>, DomainError> {
            self.check_online()?;
            let students = self.students.lock().unwrap();
            Ok(students.iter().find(|s| s.id == *id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Student>, DomainError> {
            self.check_online()?;
            let students = self.students.lock().unwrap();
            Ok(students.iter().find(|s| s.email == email).cloned())
        }

        async fn find_all(&self) -> Result<Vec<Student>, DomainError> {
            self.check_online()?;
            Ok(self.students.lock().unwrap().clone())
        }

        async fn insert(&self, fields: &StudentFields) -> Result<Student, DomainError> {
            self.check_online()?;
            let student = Student::new(StudentId::generate(), fields.clone(), Utc::now());
            self.students.lock().unwrap().push(student.clone());
            Ok(student)
        }

        async fn update(
            &self,
            id: &StudentId,
            fields: &StudentFields,
        ) -> Result<Option<Student>, DomainError> {
            self.check_online()?;
            let mut students = self.students.lock().unwrap();
            Ok(students.iter_mut().find(|s| s.id == *id).map(|student| {
                student.apply(fields.clone());
                student.clone()
            }))
        }

        async fn delete(&self, id: &StudentId) -> Result<bool, DomainError> {
            self.check_online()?;
            let mut students = self.students.lock().unwrap();
            let before = students.len();
            students.retain(|s| s.id != *id);
            Ok(students.len() != before)
        }
    }

    fn service() -> (StudentService, Arc<MemoryRepository>) {
        let repository = Arc::new(MemoryRepository::default());
        (StudentService::new(repository.clone()), repository)
    }

    fn draft(name: &str, age: &str, course: &str, email: &str) -> StudentDraft {
        StudentDraft {
            name: Some(name.to_string()),
            age: Some(age.to_string()),
            course: Some(course.to_string()),
            email: Some(email.to_string()),
        }
    }

    fn alice() -> StudentDraft {
        draft("Alice", "22", "Computer Science", "alice@x.com")
    }

    #[tokio::test]
    async fn create_then_get_returns_normalized_record() {
        let (service, _) = service();

        let created = service
            .create_student(&draft(" Alice ", "22", "Computer Science", "Alice@X.com"))
            .await
            .unwrap();
        let fetched = service.get_student(&created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(
            fetched.fields(),
            StudentFields {
                name: "Alice".to_string(),
                age: 22,
                course: Course::ComputerScience,
                email: "alice@x.com".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn invalid_draft_is_never_stored() {
        let (service, repository) = service();

        let err = service
            .create_student(&draft("Bob", "17", "Computer Science", "bob@x.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::ValidationFailed(ref e) if e.has("age")));
        assert!(repository.students.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn email_uniqueness_ignores_case() {
        let (service, _) = service();

        service
            .create_student(&draft("A", "20", "Business", "a@b.com"))
            .await
            .unwrap();
        let err = service
            .create_student(&draft("B", "21", "Business", "A@B.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::DuplicateEmail(ref email) if email == "a@b.com"));
        assert_eq!(service.list_students().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_may_keep_its_own_email() {
        let (service, _) = service();
        let created = service.create_student(&alice()).await.unwrap();

        let updated = service
            .update_student(
                &created.id,
                &draft("Alice Smith", "23", "Business", "ALICE@x.com"),
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.name, "Alice Smith");
        assert_eq!(updated.age, 23);
        assert_eq!(updated.course, Course::Business);
        assert_eq!(updated.email, "alice@x.com");
    }

    #[tokio::test]
    async fn update_rejects_email_taken_by_another_student() {
        let (service, _) = service();
        service.create_student(&alice()).await.unwrap();
        let bob = service
            .create_student(&draft("Bob", "30", "Business", "bob@x.com"))
            .await
            .unwrap();

        let err = service
            .update_student(&bob.id, &draft("Bob", "30", "Business", "alice@x.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::DuplicateEmail(_)));
        assert_eq!(service.get_student(&bob.id).await.unwrap().email, "bob@x.com");
    }

    #[tokio::test]
    async fn update_of_unknown_student_is_not_found() {
        let (service, _) = service();

        let err = service
            .update_student(&StudentId::generate(), &alice())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_of_unknown_student_is_not_found() {
        let (service, _) = service();

        let err = service
            .delete_student(&StudentId::generate())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn store_failures_surface_as_unavailable() {
        let (service, repository) = service();
        repository.offline.store(true, Ordering::SeqCst);

        assert!(matches!(
            service.list_students().await,
            Err(DomainError::StoreUnavailable(_))
        ));
        assert!(matches!(
            service.create_student(&alice()).await,
            Err(DomainError::StoreUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn student_lifecycle() {
        let (service, _) = service();

        let created = service.create_student(&alice()).await.unwrap();
        assert_eq!(service.list_students().await.unwrap(), vec![created.clone()]);

        let err = service
            .update_student(
                &created.id,
                &draft("Alice", "17", "Computer Science", "alice@x.com"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));
        assert_eq!(service.get_student(&created.id).await.unwrap(), created);

        service.delete_student(&created.id).await.unwrap();
        assert!(matches!(
            service.get_student(&created.id).await,
            Err(DomainError::NotFound(_))
        ));
        assert!(service.list_students().await.unwrap().is_empty());
    }
}
