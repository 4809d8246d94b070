//! Course catalogue handlers.
//!
//! Calls arrive only through the gateway, which sets the verified caller in
//! `x-authenticated-user`; the caller is logged with each change.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use campus_core::SUBJECT_HEADER;

use crate::error::{CourseError, Result};
use crate::store::{Course, CourseStore, CourseUpdate, NewCourse};

/// Shared handler state.
pub type CourseState = Arc<CourseStore>;

/// Response for a deleted course.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    /// Human-readable confirmation.
    pub message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// `GET /api/courses`
pub async fn list_courses(State(store): State<CourseState>) -> Json<Vec<Course>> {
    Json(store.list())
}

/// `GET /api/courses/:id`
pub async fn get_course(
    State(store): State<CourseState>,
    id: std::result::Result<Path<u32>, PathRejection>,
) -> Result<Json<Course>> {
    store.get(course_id(id)?).map(Json)
}

/// `POST /api/courses`
pub async fn create_course(
    State(store): State<CourseState>,
    headers: HeaderMap,
    body: std::result::Result<Json<NewCourse>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(new_course) = body.map_err(|e| CourseError::BadRequest(e.body_text()))?;
    let course = store.create(new_course)?;

    tracing::info!(caller = %caller(&headers), id = course.id, code = %course.code, "Course created");
    Ok((StatusCode::CREATED, Json(course)))
}

/// `PUT /api/courses/:id`
pub async fn update_course(
    State(store): State<CourseState>,
    headers: HeaderMap,
    id: std::result::Result<Path<u32>, PathRejection>,
    body: std::result::Result<Json<CourseUpdate>, JsonRejection>,
) -> Result<Json<Course>> {
    let id = course_id(id)?;
    let Json(update) = body.map_err(|e| CourseError::BadRequest(e.body_text()))?;
    let course = store.update(id, update)?;

    tracing::info!(caller = %caller(&headers), id, "Course updated");
    Ok(Json(course))
}

/// `DELETE /api/courses/:id`
pub async fn delete_course(
    State(store): State<CourseState>,
    headers: HeaderMap,
    id: std::result::Result<Path<u32>, PathRejection>,
) -> Result<Json<DeletedResponse>> {
    let id = course_id(id)?;
    store.delete(id)?;

    tracing::info!(caller = %caller(&headers), id, "Course deleted");
    Ok(Json(DeletedResponse {
        message: format!("course {id} deleted"),
    }))
}

/// `GET /health`
pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn caller(headers: &HeaderMap) -> &str {
    headers
        .get(SUBJECT_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

fn course_id(id: std::result::Result<Path<u32>, PathRejection>) -> Result<u32> {
    id.map(|Path(id)| id)
        .map_err(|e| CourseError::BadRequest(e.body_text()))
}
