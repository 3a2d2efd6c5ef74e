//! Authentication route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use clementine_core::{ApiMessage, Email, Role};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::auth::AuthService;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Credentials for registration and login.
#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub refresh_token: String,
    pub email: Email,
    pub role: Role,
}

/// Refresh grant request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh grant response.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<AuthRequest>,
) -> Result<Json<ApiMessage>> {
    let service = AuthService::new(state.pool(), state.tokens(), &state.config().jwt);
    let user = service.register(&req.email, &req.password).await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(Json(ApiMessage::ok()))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<AuthRequest>,
) -> Result<Json<LoginResponse>> {
    let service = AuthService::new(state.pool(), state.tokens(), &state.config().jwt);
    let issued = service.login(&req.email, &req.password).await?;

    Ok(Json(LoginResponse {
        token: issued.token,
        refresh_token: issued.refresh_token,
        email: issued.user.email,
        role: issued.user.role,
    }))
}

/// `POST /api/auth/refresh`
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>> {
    let service = AuthService::new(state.pool(), state.tokens(), &state.config().jwt);
    let token = service.refresh(&req.refresh_token).await?;

    Ok(Json(RefreshResponse { token }))
}

/// `GET /api/auth/verify`
///
/// A 200 here means the presented access token passed verification; the
/// response body carries nothing else. Rejection happens in [`RequireAuth`].
pub async fn verify(RequireAuth(_principal): RequireAuth) -> Json<ApiMessage> {
    Json(ApiMessage::ok())
}
