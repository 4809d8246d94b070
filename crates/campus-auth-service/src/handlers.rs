//! Login, registration and health handlers.

use axum::extract::{FromRequest, Request, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};
use crate::state::AuthServiceState;
use crate::users::{Role, User};

/// Username and password, sent as JSON or as an HTML form.
#[derive(Deserialize)]
pub struct Credentials {
    /// Login name.
    pub username: String,
    /// Plain-text password.
    pub password: String,
}

#[async_trait::async_trait]
impl<S> FromRequest<S> for Credentials
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(credentials) = Form::<Self>::from_request(req, state)
                .await
                .map_err(|e| ServiceError::BadRequest(e.body_text()))?;
            Ok(credentials)
        } else {
            let Json(credentials) = Json::<Self>::from_request(req, state)
                .await
                .map_err(|e| ServiceError::BadRequest(e.body_text()))?;
            Ok(credentials)
        }
    }
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Signed bearer token.
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: &'static str,
}

/// Registration response.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// The registered name.
    pub username: String,
    /// The assigned role.
    pub role: Role,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// `POST /login`
pub async fn login(
    State(state): State<AuthServiceState>,
    credentials: Credentials,
) -> Result<Json<LoginResponse>> {
    let users = state.users.clone();
    let username = credentials.username.clone();
    let user = run_blocking(move || {
        users.authenticate(&credentials.username, &credentials.password)
    })
    .await
    .inspect_err(|_| tracing::info!(username = %username, "Login rejected"))?;

    let issued = state.codec.issue(&user.username, state.token_ttl)?;
    tracing::info!(
        username = %user.username,
        expires_at = %issued.expires_at,
        "Login succeeded"
    );

    Ok(Json(LoginResponse {
        access_token: issued.access_token,
        token_type: "bearer",
    }))
}

/// `POST /register`
pub async fn register(
    State(state): State<AuthServiceState>,
    credentials: Credentials,
) -> Result<impl IntoResponse> {
    let users = state.users.clone();
    let User { username, role } = run_blocking(move || {
        users.register(&credentials.username, &credentials.password)
    })
    .await?;

    tracing::info!(username = %username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            username: username.to_string(),
            role,
        }),
    ))
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Run bcrypt work off the async runtime.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServiceError::Internal(e.to_string()))?
}
