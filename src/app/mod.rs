//! 应用层

pub mod student;
