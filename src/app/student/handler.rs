//! 学生处理器

use axum::{
    extract::{Path, State},
    response::Json,
};

use super::{
    model::{Student, StudentPayload},
    service::StudentService,
};
use crate::core::{
    error::CoreError,
    response::{HealthResponse, MessageResponse},
};

#[derive(Clone)]
pub struct AppState {
    pub student_service: StudentService,
}

pub async fn list_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<Student>>, CoreError> {
    let students = state.student_service.list_students().await?;
    Ok(Json(students))
}

pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Student>, CoreError> {
    let student = state.student_service.get_student(id).await?;
    Ok(Json(student))
}

pub async fn create_student(
    State(state): State<AppState>,
    Json(payload): Json<StudentPayload>,
) -> Result<Json<Student>, CoreError> {
    let student = state.student_service.create_student(payload).await?;
    Ok(Json(student))
}

pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<StudentPayload>,
) -> Result<Json<Student>, CoreError> {
    let student = state.student_service.update_student(id, payload).await?;
    Ok(Json(student))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, CoreError> {
    state.student_service.delete_student(id).await?;
    Ok(Json(MessageResponse::new("Student deleted successfully")))
}

pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, CoreError> {
    state.student_service.health_check().await?;
    Ok(Json(HealthResponse::healthy()))
}
