//! 学生数据模型

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 学生记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub address: String,
}

/// 创建/更新学生请求
///
/// 更新时所有字段都必须提供，整体覆盖原记录。
/// 只校验与列宽 `VARCHAR(100)` 对应的长度上限。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct StudentPayload {
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: String,

    #[validate(length(max = 100, message = "Email must be at most 100 characters"))]
    pub email: String,

    pub age: i32,

    pub address: String,
}

impl Student {
    /// 以给定 id 构造记录
    pub fn from_payload(id: i32, payload: &StudentPayload) -> Self {
        Self {
            id,
            name: payload.name.clone(),
            email: payload.email.clone(),
            age: payload.age,
            address: payload.address.clone(),
        }
    }
}
