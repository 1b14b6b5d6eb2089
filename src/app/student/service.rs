//! 学生业务服务

use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use super::model::{Student, StudentPayload};
use super::repository::StudentRepository;
use crate::core::error::CoreError;

const STUDENT_NOT_FOUND: &str = "Student not found";
const EMAIL_TAKEN: &str = "Email already registered";

#[derive(Clone)]
pub struct StudentService {
    repository: Arc<dyn StudentRepository>,
}

impl StudentService {
    pub fn new(repository: Arc<dyn StudentRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_students(&self) -> Result<Vec<Student>, CoreError> {
        Ok(self.repository.find_all().await?)
    }

    pub async fn get_student(&self, id: i32) -> Result<Student, CoreError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(STUDENT_NOT_FOUND.to_string()))
    }

    pub async fn create_student(&self, payload: StudentPayload) -> Result<Student, CoreError> {
        payload.validate()?;

        if self.repository.find_by_email(&payload.email).await?.is_some() {
            warn!("创建学生失败，邮箱已存在: {}", payload.email);
            return Err(CoreError::Conflict(EMAIL_TAKEN.to_string()));
        }

        // 预检查与插入之间的竞争由存储层唯一约束兜底
        let student = self.repository.insert(&payload).await?;

        info!("Created student: {} ({})", student.name, student.id);
        Ok(student)
    }

    pub async fn update_student(
        &self,
        id: i32,
        payload: StudentPayload,
    ) -> Result<Student, CoreError> {
        payload.validate()?;

        let existing = self.get_student(id).await?;

        if payload.email != existing.email {
            if let Some(holder) = self.repository.find_by_email(&payload.email).await? {
                if holder.id != id {
                    warn!("更新学生 {} 失败，邮箱已被 {} 使用", id, holder.id);
                    return Err(CoreError::Conflict(EMAIL_TAKEN.to_string()));
                }
            }
        }

        let student = self
            .repository
            .update(id, &payload)
            .await?
            .ok_or_else(|| CoreError::NotFound(STUDENT_NOT_FOUND.to_string()))?;

        info!("Updated student: {} ({})", student.name, student.id);
        Ok(student)
    }

    pub async fn delete_student(&self, id: i32) -> Result<(), CoreError> {
        if !self.repository.delete(id).await? {
            return Err(CoreError::NotFound(STUDENT_NOT_FOUND.to_string()));
        }

        info!("Deleted student: {}", id);
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), CoreError> {
        Ok(self.repository.ping().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::student::repository::{RepositoryError, RepositoryResult};
    use crate::infrastructure::memory::InMemoryStudentRepository;
    use async_trait::async_trait;

    /// 邮箱查询总是落空，模拟并发写入绕过了预检查
    struct RacingRepository {
        inner: InMemoryStudentRepository,
    }

    #[async_trait]
    impl StudentRepository for RacingRepository {
        async fn find_all(&self) -> RepositoryResult<Vec<Student>> {
            self.inner.find_all().await
        }

        async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Student>> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_email(&self, _email: &str) -> RepositoryResult<Option<Student>> {
            Ok(None)
        }

        async fn insert(&self, payload: &StudentPayload) -> RepositoryResult<Student> {
            self.inner.insert(payload).await
        }

        async fn update(
            &self,
            id: i32,
            payload: &StudentPayload,
        ) -> RepositoryResult<Option<Student>> {
            self.inner.update(id, payload).await
        }

        async fn delete(&self, id: i32) -> RepositoryResult<bool> {
            self.inner.delete(id).await
        }

        async fn ping(&self) -> RepositoryResult<()> {
            Ok(())
        }
    }

    fn service() -> StudentService {
        StudentService::new(Arc::new(InMemoryStudentRepository::new()))
    }

    fn payload(name: &str, email: &str) -> StudentPayload {
        StudentPayload {
            name: name.to_string(),
            email: email.to_string(),
            age: 20,
            address: "Main St".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let service = service();
        let created = service.create_student(payload("Ana", "ana@x.com")).await.unwrap();
        assert_eq!(created.id, 1);

        let fetched = service.get_student(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let service = service();
        service.create_student(payload("Ana", "ana@x.com")).await.unwrap();

        let err = service
            .create_student(payload("Other", "ana@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
        assert_eq!(service.list_students().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let service = service();
        assert!(matches!(service.get_student(42).await, Err(CoreError::NotFound(_))));
        assert!(matches!(
            service.update_student(42, payload("Ana", "ana@x.com")).await,
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(service.delete_student(42).await, Err(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_keeping_email_is_not_a_conflict() {
        let service = service();
        let created = service.create_student(payload("Ana", "ana@x.com")).await.unwrap();

        let mut changed = payload("Ana Maria", "ana@x.com");
        changed.age = 21;
        let updated = service.update_student(created.id, changed).await.unwrap();
        assert_eq!(updated.name, "Ana Maria");
        assert_eq!(updated.age, 21);
        assert_eq!(updated.id, created.id);
    }

    #[tokio::test]
    async fn test_update_email_conflicts_with_other_record() {
        let service = service();
        let ana = service.create_student(payload("Ana", "ana@x.com")).await.unwrap();
        service.create_student(payload("Bob", "bob@x.com")).await.unwrap();

        let err = service
            .update_student(ana.id, payload("Ana", "bob@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));

        let updated = service
            .update_student(ana.id, payload("Ana", "ana@y.com"))
            .await
            .unwrap();
        assert_eq!(updated.email, "ana@y.com");
    }

    #[tokio::test]
    async fn test_invalid_payload_is_rejected_before_storage() {
        let service = service();
        let err = service
            .create_student(payload(&"a".repeat(101), "ana@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(service.list_students().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let service = service();
        let ana = service.create_student(payload("Ana", "ana@x.com")).await.unwrap();
        service.create_student(payload("Bob", "bob@x.com")).await.unwrap();

        service.delete_student(ana.id).await.unwrap();

        assert!(matches!(service.get_student(ana.id).await, Err(CoreError::NotFound(_))));
        assert!(matches!(service.delete_student(ana.id).await, Err(CoreError::NotFound(_))));
        let remaining = service.list_students().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].email, "bob@x.com");
    }

    #[tokio::test]
    async fn test_store_level_duplicate_is_conflict() {
        let repository = RacingRepository {
            inner: InMemoryStudentRepository::new(),
        };
        let service = StudentService::new(Arc::new(repository));

        let ana = service.create_student(payload("Ana", "ana@x.com")).await.unwrap();
        let bob = service.create_student(payload("Bob", "bob@x.com")).await.unwrap();

        let err = service
            .create_student(payload("Other", "ana@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));

        let err = service
            .update_student(bob.id, payload("Bob", "ana@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));

        let students = service.list_students().await.unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[0], ana);
    }

    #[test]
    fn test_duplicate_email_error_maps_to_conflict() {
        let err: CoreError = RepositoryError::DuplicateEmail.into();
        assert!(matches!(err, CoreError::Conflict(_)));
    }
}
