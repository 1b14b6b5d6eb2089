//! 数据库基础设施
//!
//! 基于 SQLx Postgres 连接池的学生存储。读操作在调用期间占用一个池连接，
//! 写操作在事务中执行：成功时提交，任何错误路径上事务被 drop 时自动回滚。

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

use crate::app::student::{
    model::{Student, StudentPayload},
    repository::{RepositoryError, RepositoryResult, StudentRepository},
};
use crate::config::StorageConfig;

/// Postgres 唯一约束冲突的 SQLSTATE
const UNIQUE_VIOLATION: &str = "23505";

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn new(config: &StorageConfig) -> Result<Self, sqlx::Error> {
        info!("Connecting to database: {}", config.masked_database_url());

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }
}

pub struct PgStudentRepository {
    pool: PgPool,
}

impl PgStudentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 创建 `students` 表（已存在时跳过）
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        info!("Creating database tables...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS students (
                id SERIAL PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                email VARCHAR(100) NOT NULL UNIQUE,
                age INTEGER NOT NULL,
                address TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_students_name ON students (name)")
            .execute(&self.pool)
            .await?;

        info!("Database tables created successfully");
        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .map(|code| code == UNIQUE_VIOLATION)
            .unwrap_or(false),
        _ => false,
    }
}

fn map_write_error(err: sqlx::Error) -> RepositoryError {
    if is_unique_violation(&err) {
        RepositoryError::DuplicateEmail
    } else {
        RepositoryError::Database(err)
    }
}

#[async_trait]
impl StudentRepository for PgStudentRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<Student>> {
        let mut conn = self.pool.acquire().await?;
        let students = sqlx::query_as::<_, Student>(
            "SELECT id, name, email, age, address FROM students ORDER BY id",
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(students)
    }

    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Student>> {
        let mut conn = self.pool.acquire().await?;
        let student = sqlx::query_as::<_, Student>(
            "SELECT id, name, email, age, address FROM students WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(student)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Student>> {
        let mut conn = self.pool.acquire().await?;
        let student = sqlx::query_as::<_, Student>(
            "SELECT id, name, email, age, address FROM students WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(student)
    }

    async fn insert(&self, payload: &StudentPayload) -> RepositoryResult<Student> {
        let mut tx = self.pool.begin().await?;

        let student = sqlx::query_as::<_, Student>(
            "INSERT INTO students (name, email, age, address) VALUES ($1, $2, $3, $4) \
             RETURNING id, name, email, age, address",
        )
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(payload.age)
        .bind(&payload.address)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;
        Ok(student)
    }

    async fn update(&self, id: i32, payload: &StudentPayload) -> RepositoryResult<Option<Student>> {
        let mut tx = self.pool.begin().await?;

        let student = sqlx::query_as::<_, Student>(
            "UPDATE students SET name = $1, email = $2, age = $3, address = $4 \
             WHERE id = $5 RETURNING id, name, email, age, address",
        )
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(payload.age)
        .bind(&payload.address)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;
        Ok(student)
    }

    async fn delete(&self, id: i32) -> RepositoryResult<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
