//! Session extraction and credential endpoints.
//!
//! [`CurrentTenant`] is the `currentTenant()` check the protected endpoints
//! run: it resolves the bearer token to a tenant *before* any handler body
//! executes, so an unauthenticated ingestion request never reads a row or
//! touches storage.

use crate::{
    core::account,
    entities::user,
    errors::Error,
    web::{
        AppState,
        error::{ApiError, ApiResult},
    },
};
use axum::{
    Json, async_trait,
    extract::{FromRequestParts, State},
    http::{HeaderMap, header, request::Parts},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

/// The authenticated tenant for this request.
#[derive(Debug, Clone)]
pub struct CurrentTenant(pub user::Model);

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentTenant {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(ApiError(Error::Unauthorized))?;
        let tenant = account::resolve_session(&state.db, token)
            .await
            .map_err(ApiError)?;
        tenant.map(Self).ok_or(ApiError(Error::Unauthorized))
    }
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Plaintext password, verified against the stored hash
    pub password: String,
}

/// Login response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub token: String,
    /// Email of the authenticated tenant
    pub email: String,
}

/// `POST /api/auth/login` - verifies credentials and opens a session.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let tenant = account::authenticate(&state.db, &request.email, &request.password).await?;
    let session = account::create_session(&state.db, tenant.id, state.session_ttl).await?;
    info!(tenant_id = tenant.id, "tenant logged in");

    Ok(Json(LoginResponse {
        token: session.token,
        email: tenant.email,
    }))
}

/// `POST /api/auth/logout` - revokes the presented session token.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    let token = bearer_token(&headers).ok_or(Error::Unauthorized)?;
    account::revoke_session(&state.db, token).await?;
    Ok(Json(json!({ "message": "Logged out" })))
}

/// Password reset request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// Login email
    #[serde(default)]
    pub email: Option<String>,
    /// Current plaintext password
    #[serde(default)]
    pub current_password: Option<String>,
    /// Replacement plaintext password
    #[serde(default)]
    pub new_password: Option<String>,
}

/// `POST /api/auth/reset-password` - resets a password after verifying the
/// current one. Field-presence errors are 400; unknown email and wrong
/// current password are both 401 with the same message.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> ApiResult<Json<Value>> {
    let (Some(email), Some(current_password), Some(new_password)) = (
        request.email.filter(|s| !s.is_empty()),
        request.current_password.filter(|s| !s.is_empty()),
        request.new_password.filter(|s| !s.is_empty()),
    ) else {
        return Err(Error::InvalidRequest {
            message: "Email, current password, and new password are required".to_string(),
        }
        .into());
    };

    account::reset_password(&state.db, &email, &current_password, &new_password).await?;
    info!(email = %email, "password reset");

    Ok(Json(json!({ "message": "Password reset successfully" })))
}
