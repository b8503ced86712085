use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::database::models::UserPublic;
use crate::database::store;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserPublic,
}

/// POST /login - verify credentials, issue the access/refresh pair.
///
/// Unknown email and wrong password both come back as 401 so the response
/// does not confirm which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let (email, password) = match (&request.email, &request.password) {
        (Some(e), Some(p)) => (e.trim(), p.as_str()),
        _ => return Err(ApiError::validation_error("email and password are required")),
    };

    let user = store::users::find_by_email(&state.pool, email)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Login attempt for unknown email");
            ApiError::unauthorized("Invalid credentials")
        })?;

    let valid = auth::verify_password(password, &user.password_hash).map_err(|e| {
        tracing::error!("Password verification error: {}", e);
        ApiError::internal_server_error("Could not process credentials")
    })?;

    if !valid {
        tracing::warn!("Invalid password for user: {}", user.username);
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let pair = auth::issue_token_pair(user.user_id)
        .map_err(|e| {
            tracing::error!("Failed to issue tokens: {}", e);
            ApiError::internal_server_error("Could not issue tokens")
        })?;

    tracing::info!("User logged in: {}", user.username);
    Ok(ApiResponse::success(LoginResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        user: user.to_public(),
    }))
}
