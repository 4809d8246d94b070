//! Student CRUD handlers.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::caller::Caller;
use crate::error::{Result, ServiceError};
use crate::store::{NewStudent, Student, StudentStore, StudentUpdate};

/// Shared handler state.
pub type StudentState = Arc<StudentStore>;

/// Response for a deleted student.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    /// Human-readable confirmation.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// `GET /api/students`
pub async fn list_students(
    State(store): State<StudentState>,
    caller: Caller,
) -> Json<Vec<Student>> {
    let students = store.list();
    tracing::debug!(caller = %caller.name(), count = students.len(), "Listed students");
    Json(students)
}

/// `GET /api/students/:id`
pub async fn get_student(
    State(store): State<StudentState>,
    caller: Caller,
    id: std::result::Result<Path<u32>, PathRejection>,
) -> Result<Json<Student>> {
    let id = student_id(id)?;
    tracing::debug!(caller = %caller.name(), id, "Fetching student");
    store.get(id).map(Json)
}

/// `POST /api/students`
pub async fn create_student(
    State(store): State<StudentState>,
    caller: Caller,
    body: std::result::Result<Json<NewStudent>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(new_student) = body.map_err(|e| ServiceError::BadRequest(e.body_text()))?;
    let student = store.create(new_student, caller.0.as_ref())?;

    tracing::info!(caller = %caller.name(), id = student.id, "Student created");
    Ok((StatusCode::CREATED, Json(student)))
}

/// `PUT /api/students/:id`
pub async fn update_student(
    State(store): State<StudentState>,
    caller: Caller,
    id: std::result::Result<Path<u32>, PathRejection>,
    body: std::result::Result<Json<StudentUpdate>, JsonRejection>,
) -> Result<Json<Student>> {
    let id = student_id(id)?;
    let Json(update) = body.map_err(|e| ServiceError::BadRequest(e.body_text()))?;
    let student = store.update(id, update)?;

    tracing::info!(caller = %caller.name(), id, "Student updated");
    Ok(Json(student))
}

/// `DELETE /api/students/:id`
pub async fn delete_student(
    State(store): State<StudentState>,
    caller: Caller,
    id: std::result::Result<Path<u32>, PathRejection>,
) -> Result<Json<DeletedResponse>> {
    let id = student_id(id)?;
    store.delete(id)?;

    tracing::info!(caller = %caller.name(), id, "Student deleted");
    Ok(Json(DeletedResponse {
        message: format!("student {id} deleted"),
    }))
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn student_id(id: std::result::Result<Path<u32>, PathRejection>) -> Result<u32> {
    id.map(|Path(id)| id)
        .map_err(|e| ServiceError::BadRequest(e.body_text()))
}
