//! Router configuration.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::store::CourseStore;

/// Create the Course Service router.
///
/// # Routes
///
/// - `GET /api/courses` - List courses
/// - `POST /api/courses` - Create a course
/// - `GET /api/courses/:id` - Fetch one course
/// - `PUT /api/courses/:id` - Partially update a course
/// - `DELETE /api/courses/:id` - Delete a course
/// - `GET /health` - Health check
pub fn create_router(store: Arc<CourseStore>) -> Router {
    let collection = get(handlers::list_courses).post(handlers::create_course);

    Router::new()
        .route("/api/courses", collection.clone())
        .route("/api/courses/", collection)
        .route(
            "/api/courses/:id",
            get(handlers::get_course)
                .put(handlers::update_course)
                .delete(handlers::delete_course),
        )
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}
