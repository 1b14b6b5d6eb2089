//! 学生记录管理

pub mod handler;
pub mod model;
pub mod repository;
pub mod service;
