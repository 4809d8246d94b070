//! End-to-end tests of the gateway against stub backends.
//!
//! The gateway router is driven in-process; backends are `wiremock` servers
//! whose `expect` counts assert exactly how many calls reached them.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, body_string, header as has_header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use campus_auth::{AuthConfig, TokenCodec};
use campus_core::{RouteEntry, RouteTable, Subject, SUBJECT_HEADER};
use campus_gateway::{create_router, GatewayConfig, GatewayState, ProxyClient};

const SECRET: &str = "integration-test-secret-0123456789abcdef";

fn codec() -> TokenCodec {
    TokenCodec::new(&AuthConfig::new(SECRET))
}

fn subject(name: &str) -> Subject {
    Subject::parse(name).unwrap()
}

fn token_for(name: &str) -> String {
    codec()
        .issue(&subject(name), Duration::from_secs(300))
        .unwrap()
        .access_token
}

fn gateway(routes: Vec<RouteEntry>) -> Router {
    gateway_with_timeout(routes, Duration::from_secs(5))
}

fn gateway_with_timeout(routes: Vec<RouteEntry>, timeout: Duration) -> Router {
    let config = GatewayConfig {
        routes: routes.clone(),
        max_body_bytes: 1024,
        ..GatewayConfig::default()
    };
    let table = RouteTable::new(routes).unwrap();
    let proxy = ProxyClient::new(timeout, Duration::from_secs(1));
    create_router(GatewayState::with_proxy(
        table,
        Arc::new(codec()),
        proxy,
        config,
    ))
}

fn standard_routes(auth: &MockServer, students: &MockServer) -> Vec<RouteEntry> {
    vec![
        RouteEntry::public("/auth", auth.uri()),
        RouteEntry::protected("/students", format!("{}/api/students", students.uri())),
    ]
}

struct Relayed {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Relayed {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

async fn send(app: &Router, request: Request<Body>) -> Relayed {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    Relayed {
        status,
        headers,
        body,
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

// =============================================================================
// Public routes
// =============================================================================

#[tokio::test]
async fn login_is_proxied_without_credential() {
    let auth = MockServer::start().await;
    let students = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"username": "admin", "password": "admin123"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "abc", "token_type": "bearer"})),
        )
        .expect(1)
        .mount(&auth)
        .await;

    let app = gateway(standard_routes(&auth, &students));
    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"username":"admin","password":"admin123"}"#))
            .unwrap(),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({"access_token": "abc", "token_type": "bearer"})
    );
}

#[tokio::test]
async fn downstream_error_status_and_body_are_relayed_unchanged() {
    let auth = MockServer::start().await;
    let students = MockServer::start().await;

    let body = r#"{"detail":"Incorrect username or password"}"#;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_raw(body, "application/json"),
        )
        .expect(1)
        .mount(&auth)
        .await;

    let app = gateway(standard_routes(&auth, &students));
    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/auth/login")
            .body(Body::from("username=admin&password=wrong"))
            .unwrap(),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body, Bytes::from(body));
    assert_eq!(
        response.headers.get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn missing_content_type_is_not_invented() {
    let auth = MockServer::start().await;
    let students = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&auth)
        .await;

    let app = gateway(standard_routes(&auth, &students));
    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/auth/logout")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.headers.get(header::CONTENT_TYPE).is_none());
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn spoofed_subject_is_dropped_on_public_routes() {
    let auth = MockServer::start().await;
    let students = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&auth)
        .await;

    let app = gateway(standard_routes(&auth, &students));
    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/auth/register")
            .header(SUBJECT_HEADER, "admin")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let received = auth.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(received[0].headers.get(SUBJECT_HEADER).is_none());
}

// =============================================================================
// Protected routes
// =============================================================================

#[tokio::test]
async fn missing_credential_is_rejected_without_downstream_call() {
    let auth = MockServer::start().await;
    let students = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&students)
        .await;

    let app = gateway(standard_routes(&auth, &students));
    let response = send(&app, get("/students")).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers.get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
    assert_eq!(
        response.json(),
        json!({"error": "unauthorized", "message": "missing bearer credential"})
    );
}

#[tokio::test]
async fn invalid_credentials_are_rejected_without_downstream_call() {
    let auth = MockServer::start().await;
    let students = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&students)
        .await;

    let expired = codec()
        .issue_at(
            &subject("alice"),
            Duration::from_secs(60),
            Utc::now() - chrono::Duration::hours(1),
        )
        .unwrap()
        .access_token;
    let foreign = TokenCodec::new(&AuthConfig::new("another-secret-0123456789abcdef0123"))
        .issue(&subject("alice"), Duration::from_secs(60))
        .unwrap()
        .access_token;

    let app = gateway(standard_routes(&auth, &students));
    for token in ["garbage", "a.b.c", expired.as_str(), foreign.as_str()] {
        let response = send(&app, get_with_token("/students/1", token)).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "token {token}");
        assert_eq!(
            response.json(),
            json!({"error": "unauthorized", "message": "invalid or expired credential"})
        );
    }
}

#[tokio::test]
async fn valid_credential_forwards_body_and_subject() {
    let auth = MockServer::start().await;
    let students = MockServer::start().await;

    let new_student = json!({"name": "Ada Lovelace", "email": "ada@example.com"});
    Mock::given(method("POST"))
        .and(path("/api/students"))
        .and(has_header(SUBJECT_HEADER, "alice"))
        .and(body_json(new_student.clone()))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("x-backend", "students")
                .set_body_json(json!({"id": 4, "name": "Ada Lovelace"})),
        )
        .expect(1)
        .mount(&students)
        .await;

    let app = gateway(standard_routes(&auth, &students));
    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/students")
            .header(header::AUTHORIZATION, format!("Bearer {}", token_for("alice")))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(new_student.to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.headers.get("x-backend").unwrap(), "students");
    assert_eq!(response.json(), json!({"id": 4, "name": "Ada Lovelace"}));
}

#[tokio::test]
async fn path_suffix_query_and_method_are_preserved() {
    let auth = MockServer::start().await;
    let students = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/students/7"))
        .and(query_param("fields", "name"))
        .respond_with(ResponseTemplate::new(200).set_body_string("seven"))
        .expect(1)
        .mount(&students)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/students/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&students)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/students/7"))
        .and(body_string("email=ada@example.com"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&students)
        .await;

    let app = gateway(standard_routes(&auth, &students));
    let token = token_for("alice");

    let response = send(&app, get_with_token("/students/7?fields=name", &token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, Bytes::from("seven"));

    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri("/students/7")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = send(
        &app,
        Request::builder()
            .method("PATCH")
            .uri("/students/7")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from("email=ada@example.com"))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn spoofed_subject_is_replaced_by_verified_subject() {
    let auth = MockServer::start().await;
    let students = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/students"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&students)
        .await;

    let app = gateway(standard_routes(&auth, &students));
    let response = send(
        &app,
        Request::builder()
            .uri("/students")
            .header(header::AUTHORIZATION, format!("Bearer {}", token_for("alice")))
            .header(SUBJECT_HEADER, "admin")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let received = students.received_requests().await.unwrap();
    let values: Vec<_> = received[0].headers.get_all(SUBJECT_HEADER).iter().collect();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0], "alice");
}

#[tokio::test]
async fn connection_headers_are_not_relayed() {
    let auth = MockServer::start().await;
    let students = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/students"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("proxy-authenticate", "Basic")
                .insert_header("x-request-cost", "3"),
        )
        .expect(1)
        .mount(&students)
        .await;

    let app = gateway(standard_routes(&auth, &students));
    let response = send(&app, get_with_token("/students", &token_for("alice"))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.headers.get("proxy-authenticate").is_none());
    assert_eq!(response.headers.get("x-request-cost").unwrap(), "3");
}

#[tokio::test]
async fn oversized_body_is_rejected_without_downstream_call() {
    let auth = MockServer::start().await;
    let students = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&students)
        .await;

    let app = gateway(standard_routes(&auth, &students));
    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/students")
            .header(header::AUTHORIZATION, format!("Bearer {}", token_for("alice")))
            .body(Body::from(vec![b'x'; 4096]))
            .unwrap(),
    )
    .await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.json()["error"], "payload_too_large");
}

// =============================================================================
// Routing
// =============================================================================

#[tokio::test]
async fn unknown_path_is_not_found() {
    let auth = MockServer::start().await;
    let students = MockServer::start().await;

    let app = gateway(standard_routes(&auth, &students));
    let response = send(&app, get("/library/books")).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.json(),
        json!({"error": "not_found", "message": "no route for /library/books"})
    );
    assert!(auth.received_requests().await.unwrap().is_empty());
    assert!(students.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn dot_segments_cannot_cross_into_protected_targets() {
    let backend = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/secret/data"))
        .respond_with(ResponseTemplate::new(200).set_body_string("SECRET"))
        .expect(0)
        .mount(&backend)
        .await;

    let app = gateway(vec![
        RouteEntry::public("/public", format!("{}/open", backend.uri())),
        RouteEntry::protected("/private", format!("{}/secret", backend.uri())),
    ]);

    let response = send(&app, get("/private/data")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    for uri in [
        "/public/../secret/data",
        "/public/%2e%2e/secret/data",
        "/public/%2E./secret/data",
        "/public/./../secret/data",
    ] {
        let response = send(&app, get(uri)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(response.json()["error"], "bad_request", "{uri}");
    }

    assert!(backend.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn first_declared_overlapping_prefix_wins() {
    let general = MockServer::start().await;
    let admin = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("general"))
        .expect(1)
        .mount(&general)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("admin"))
        .expect(0)
        .mount(&admin)
        .await;

    let app = gateway(vec![
        RouteEntry::public("/api", general.uri()),
        RouteEntry::public("/api/admin", admin.uri()),
    ]);
    let response = send(&app, get("/api/admin/users")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, Bytes::from("general"));
}

#[tokio::test]
async fn health_lists_routes_in_order() {
    let auth = MockServer::start().await;
    let students = MockServer::start().await;

    let app = gateway(standard_routes(&auth, &students));
    let response = send(&app, get("/health")).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(
        body["routes"],
        json!([
            {"prefix": "/auth", "requires_auth": false},
            {"prefix": "/students", "requires_auth": true}
        ])
    );
}

// =============================================================================
// Downstream failures and concurrency
// =============================================================================

#[tokio::test]
async fn unreachable_backend_is_bad_gateway_within_timeout() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let timeout = Duration::from_secs(2);
    let app = gateway_with_timeout(
        vec![RouteEntry::protected("/students", format!("http://{addr}/api/students"))],
        timeout,
    );

    let started = Instant::now();
    let response = send(&app, get_with_token("/students", &token_for("alice"))).await;

    assert!(started.elapsed() < timeout + Duration::from_secs(1));
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.json()["error"], "bad_gateway");
}

#[tokio::test]
async fn slow_backend_is_gateway_timeout() {
    let students = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&students)
        .await;

    let timeout = Duration::from_millis(300);
    let app = gateway_with_timeout(
        vec![RouteEntry::protected(
            "/students",
            format!("{}/api/students", students.uri()),
        )],
        timeout,
    );

    let started = Instant::now();
    let response = send(&app, get_with_token("/students", &token_for("alice"))).await;

    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(response.status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(
        response.json(),
        json!({"error": "gateway_timeout", "message": "service behind /students timed out"})
    );
}

#[tokio::test]
async fn slow_requests_do_not_serialize() {
    let students = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .expect(8)
        .mount(&students)
        .await;

    let app = gateway(vec![RouteEntry::protected(
        "/students",
        format!("{}/api/students", students.uri()),
    )]);
    let token = token_for("alice");

    let started = Instant::now();
    let mut tasks = tokio::task::JoinSet::new();
    for id in 0..8 {
        let app = app.clone();
        let request = get_with_token(&format!("/students/{id}"), &token);
        tasks.spawn(async move { send(&app, request).await.status });
    }
    while let Some(status) = tasks.join_next().await {
        assert_eq!(status.unwrap(), StatusCode::OK);
    }

    assert!(started.elapsed() < Duration::from_secs(3));
}
