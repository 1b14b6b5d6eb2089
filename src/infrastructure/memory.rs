//! 内存存储
//!
//! 用于测试和无数据库的本地运行。邮箱唯一性在写锁内检查，
//! 与数据库唯一约束具有相同语义。

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::app::student::{
    model::{Student, StudentPayload},
    repository::{RepositoryError, RepositoryResult, StudentRepository},
};

#[derive(Default)]
struct Table {
    rows: BTreeMap<i32, Student>,
    next_id: i32,
}

#[derive(Default)]
pub struct InMemoryStudentRepository {
    table: RwLock<Table>,
}

impl InMemoryStudentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Table {
    fn email_taken_by_other(&self, email: &str, id: Option<i32>) -> bool {
        self.rows
            .values()
            .any(|s| s.email == email && Some(s.id) != id)
    }
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<Student>> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Student>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Student>> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|s| s.email == email).cloned())
    }

    async fn insert(&self, payload: &StudentPayload) -> RepositoryResult<Student> {
        let mut table = self.table.write().await;
        if table.email_taken_by_other(&payload.email, None) {
            return Err(RepositoryError::DuplicateEmail);
        }

        // 与 SERIAL 一致：id 从 1 开始，删除后不复用
        let id = table
            .next_id
            .checked_add(1)
            .ok_or(RepositoryError::IdExhausted)?;
        table.next_id = id;
        let student = Student::from_payload(id, payload);
        table.rows.insert(student.id, student.clone());
        Ok(student)
    }

    async fn update(&self, id: i32, payload: &StudentPayload) -> RepositoryResult<Option<Student>> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&id) {
            return Ok(None);
        }
        if table.email_taken_by_other(&payload.email, Some(id)) {
            return Err(RepositoryError::DuplicateEmail);
        }

        let student = Student::from_payload(id, payload);
        table.rows.insert(id, student.clone());
        Ok(Some(student))
    }

    async fn delete(&self, id: i32) -> RepositoryResult<bool> {
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&id).is_some())
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
