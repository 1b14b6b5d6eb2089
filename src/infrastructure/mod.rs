//! 基础设施层：存储实现与日志

#[cfg(feature = "database")]
pub mod database;
pub mod logger;
pub mod memory;

use std::sync::Arc;

use crate::app::student::repository::StudentRepository;
use crate::config::{StorageBackend, StorageConfig};

/// 按配置打开存储后端；Postgres 后端会在启动时建表
pub async fn open_repository(config: &StorageConfig) -> anyhow::Result<Arc<dyn StudentRepository>> {
    match config.backend {
        #[cfg(feature = "database")]
        StorageBackend::Postgres => {
            let manager = database::DatabaseManager::new(config).await?;
            let repository = database::PgStudentRepository::new(manager.get_pool().clone());
            repository.ensure_schema().await?;
            Ok(Arc::new(repository))
        }
        #[cfg(not(feature = "database"))]
        StorageBackend::Postgres => {
            anyhow::bail!("postgres backend requires the `database` feature")
        }
        StorageBackend::Memory => {
            tracing::warn!("使用内存存储，进程退出后数据将丢失");
            Ok(Arc::new(memory::InMemoryStudentRepository::new()))
        }
    }
}
