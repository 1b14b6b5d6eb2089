//! 学生存储接口

use async_trait::async_trait;

use super::model::{Student, StudentPayload};

/// 存储层错误
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// 存储层唯一约束拒绝了重复邮箱
    #[error("email already registered")]
    DuplicateEmail,
    /// id 序列已用尽
    #[error("student id sequence exhausted")]
    IdExhausted,
    #[cfg(feature = "database")]
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// 学生存储接口
///
/// 实现必须在存储层保证 `email` 唯一，违反时返回
/// [`RepositoryError::DuplicateEmail`]。服务层的预检查不能覆盖并发写入。
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// 返回全部记录，按 id 升序
    async fn find_all(&self) -> RepositoryResult<Vec<Student>>;

    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Student>>;

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Student>>;

    /// 插入新记录，id 由存储分配
    async fn insert(&self, payload: &StudentPayload) -> RepositoryResult<Student>;

    /// 覆盖除 id 外的全部字段；记录不存在时返回 `None`
    async fn update(&self, id: i32, payload: &StudentPayload) -> RepositoryResult<Option<Student>>;

    /// 删除记录；返回是否确实删除了一行
    async fn delete(&self, id: i32) -> RepositoryResult<bool>;

    /// 存储连通性检查
    async fn ping(&self) -> RepositoryResult<()>;
}
