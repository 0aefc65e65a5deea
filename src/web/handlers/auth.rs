//! Authentication handlers for the HTTP API.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::auth::{RegistrationRequest, TokenClaims};
use crate::db::Identity;
use crate::web::dto::{
    ApiResponse, AuthResponse, LoginRequest, RegisterRequest, UserInfo, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;
use crate::ShelfError;

/// Load the stored identity behind verified claims.
///
/// A token whose subject no longer exists is treated as unauthenticated.
pub async fn caller_identity(state: &AppState, claims: &TokenClaims) -> Result<Identity, ApiError> {
    match state.auth.current_identity(claims.sub).await {
        Ok(identity) => Ok(identity),
        Err(ShelfError::NotFound(_)) => Err(ApiError::unauthorized("Authentication required")),
        Err(e) => Err(e.into()),
    }
}

/// POST /api/auth/register - Register a new identity.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    let outcome = state
        .auth
        .register(RegistrationRequest::new(
            req.email,
            req.password,
            req.display_name,
        ))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(AuthResponse::from(outcome))),
    ))
}

/// POST /api/auth/login - Exchange credentials for a token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let outcome = state
        .auth
        .login(&req.email, &req.password, req.remember_me)
        .await?;

    Ok(Json(ApiResponse::new(AuthResponse::from(outcome))))
}

/// GET /api/auth/me - Current identity, read from the store.
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let identity = caller_identity(&state, &claims).await?;
    Ok(Json(ApiResponse::new(UserInfo::from(&identity))))
}
