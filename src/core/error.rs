//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::app::student::repository::RepositoryError;

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// 记录不存在 (404)
    #[error("not found: {0}")]
    NotFound(String),
    /// 唯一性约束冲突 (400)
    #[error("conflict: {0}")]
    Conflict(String),
    /// 请求字段校验失败 (422)
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("internal error: {0}")]
    InternalServerError(String),
}

/// 错误响应结构
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
}

impl CoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Conflict(_) => StatusCode::BAD_REQUEST,
            CoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CoreError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_message, user_message) = match self {
            CoreError::NotFound(msg) => ("NOT_FOUND", msg),
            CoreError::Conflict(msg) => ("CONFLICT", msg),
            CoreError::Validation(msg) => ("VALIDATION_ERROR", msg),
            CoreError::InternalServerError(msg) => {
                error!("Internal error: {}", msg);
                ("INTERNAL_SERVER_ERROR", "Internal server error".to_string())
            }
        };

        let error_response = ErrorResponse {
            error: error_message.to_string(),
            message: user_message,
            code: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, axum::Json(error_response)).into_response()
    }
}

impl From<RepositoryError> for CoreError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateEmail => {
                CoreError::Conflict("Email already registered".to_string())
            }
            RepositoryError::IdExhausted => {
                CoreError::InternalServerError("student id sequence exhausted".to_string())
            }
            #[cfg(feature = "database")]
            RepositoryError::Database(e) => {
                error!("Database error: {}", e);
                CoreError::InternalServerError(format!("database error: {}", e))
            }
        }
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect();
        // HashMap 迭代顺序不固定
        messages.sort();

        CoreError::Validation(messages.join(", "))
    }
}
