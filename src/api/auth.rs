use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::{ApiError, ApiResponse, AppState};
use crate::auth::extract_bearer_token;
use crate::services::{TokenPair, UserInfo};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Authenticated subject, injected into request extensions by the
/// middleware and consumed by protected handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub username: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication gate for every protected route: extracts the bearer token
/// and verifies it as an access token. All failures collapse into a generic
/// 401; the specific cause is logged, never returned.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = extract_bearer_token(header_value).map_err(|e| {
        debug!("Rejected request: {e}");
        ApiError::Unauthorized
    })?;

    let username = state.tokens().verify_access(token).map_err(|e| {
        debug!("Rejected access token: {e}");
        ApiError::Unauthorized
    })?;

    tracing::Span::current().record("user_id", &username);
    request
        .extensions_mut()
        .insert(CurrentUser { username });

    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/signup
/// Register a new (non-staff) user.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), ApiError> {
    let user = state
        .auth_service
        .signup(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

/// POST /auth/login
/// Authenticate with username and password; returns an access and a refresh
/// token on success.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<TokenPair>>, ApiError> {
    let tokens = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(tokens)))
}

/// POST /auth/refreshtoken
/// Exchange a bearer refresh token for a new access token. Not behind the
/// access-token middleware: the refresh token itself is the credential here.
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<RefreshResponse>>, ApiError> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = extract_bearer_token(header_value).map_err(|e| {
        debug!("Rejected refresh request: {e}");
        ApiError::Unauthorized
    })?;

    let access_token = state.auth_service.refresh(token).await?;

    Ok(Json(ApiResponse::success(RefreshResponse { access_token })))
}

/// GET /auth/
/// Get current user information (requires authentication).
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let info = state.auth_service.get_user_info(&user.username).await?;

    Ok(Json(ApiResponse::success(info)))
}
