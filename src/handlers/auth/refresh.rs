use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::{self, TokenKind};
use crate::database::store;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// POST /refresh - exchange a refresh token for a new access token.
///
/// Access tokens are rejected here; only the refresh kind may be exchanged.
/// The subject must still exist, so deleting a user ends their sessions.
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> ApiResult<RefreshResponse> {
    let token = request
        .refresh_token
        .as_deref()
        .ok_or_else(|| ApiError::validation_error("refresh_token is required"))?;

    let claims = auth::verify_token(token, TokenKind::Refresh)
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    let user = store::users::find_by_id(&state.pool, claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Token subject no longer exists"))?;

    let access_token = auth::generate_token(user.user_id, TokenKind::Access).map_err(|e| {
        tracing::error!("Failed to issue access token: {}", e);
        ApiError::internal_server_error("Could not issue tokens")
    })?;

    Ok(ApiResponse::success(RefreshResponse { access_token }))
}
