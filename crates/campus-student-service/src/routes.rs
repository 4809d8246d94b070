//! Router configuration.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::store::StudentStore;

/// Create the Student Service router.
///
/// # Routes
///
/// - `GET /api/students` - List students
/// - `POST /api/students` - Create a student
/// - `GET /api/students/:id` - Fetch one student
/// - `PUT /api/students/:id` - Partially update a student
/// - `DELETE /api/students/:id` - Delete a student
/// - `GET /health` - Health check
pub fn create_router(store: Arc<StudentStore>) -> Router {
    let collection = get(handlers::list_students).post(handlers::create_student);

    Router::new()
        .route("/api/students", collection.clone())
        .route("/api/students/", collection)
        .route(
            "/api/students/:id",
            get(handlers::get_student)
                .put(handlers::update_student)
                .delete(handlers::delete_student),
        )
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use campus_core::SUBJECT_HEADER;
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        create_router(Arc::new(StudentStore::seeded()))
    }

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(SUBJECT_HEADER, "alice")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn lists_seeded_students() {
        let (status, body) = call(app(), empty_request("GET", "/api/students")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);

        let (status, _) = call(app(), empty_request("GET", "/api/students/")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn gets_one_student() {
        let (status, body) = call(app(), empty_request("GET", "/api/students/2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Jane Smith");
    }

    #[tokio::test]
    async fn unknown_student_is_json_404() {
        let (status, body) = call(app(), empty_request("GET", "/api/students/42")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["message"], "student 42 not found");
    }

    #[tokio::test]
    async fn non_numeric_id_is_bad_request() {
        let (status, body) = call(app(), empty_request("GET", "/api/students/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn create_records_authenticated_subject() {
        let app = app();
        let (status, body) = call(
            app.clone(),
            json_request(
                "POST",
                "/api/students",
                &serde_json::json!({
                    "name": "Ann Lee",
                    "age": 23,
                    "email": "ann@example.com",
                    "course": "Mathematics"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 4);
        assert_eq!(body["created_by"], "alice");

        let (_, body) = call(app, empty_request("GET", "/api/students")).await;
        assert_eq!(body.as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn create_with_missing_field_is_bad_request() {
        let (status, body) = call(
            app(),
            json_request("POST", "/api/students", &serde_json::json!({"name": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn put_updates_only_given_fields() {
        let (status, body) = call(
            app(),
            json_request("PUT", "/api/students/1", &serde_json::json!({"age": 30})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["age"], 30);
        assert_eq!(body["email"], "john@example.com");
    }

    #[tokio::test]
    async fn put_with_blank_email_is_bad_request() {
        let (status, body) = call(
            app(),
            json_request("PUT", "/api/students/1", &serde_json::json!({"email": " "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "bad request: email must not be empty");
    }

    #[tokio::test]
    async fn delete_removes_student() {
        let app = app();
        let (status, _) = call(app.clone(), empty_request("DELETE", "/api/students/3")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(app.clone(), empty_request("GET", "/api/students/3")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(app, empty_request("DELETE", "/api/students/3")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
