//! # 学生记录管理服务
//!
//! 基于 Axum + SQLx 的学生 CRUD 服务，分层结构：
//! - `app`: 学生模型、存储接口、业务服务和 HTTP 处理器
//! - `core`: 错误处理、响应结构、中间件
//! - `infrastructure`: Postgres/内存存储、日志
//! - `config`: 配置加载
//! - `router`: 路由和 CORS

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;
pub mod router;

pub use app::student::handler::AppState;
pub use app::student::model::{Student, StudentPayload};
pub use app::student::service::StudentService;
pub use router::create_router;
