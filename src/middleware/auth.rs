use axum::{async_trait, extract::FromRequestParts, http::request::Parts, http::HeaderMap};

use crate::auth::{self, TokenKind};
use crate::database::models::Role;
use crate::database::store;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller for a protected operation. The bearer token only
/// proves identity; the role comes from the users table on every request,
/// so a stale token cannot carry a revoked role.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).map_err(ApiError::unauthorized)?;

        let claims = auth::verify_token(&token, TokenKind::Access)
            .map_err(|e| ApiError::unauthorized(e.to_string()))?;

        let user = store::users::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Token subject no longer exists"))?;

        let role = user.role().map_err(|e| {
            tracing::error!("User {} has unparseable role: {}", user.user_id, e);
            ApiError::internal_server_error("User record is corrupt")
        })?;

        Ok(CurrentUser {
            user_id: user.user_id,
            username: user.username,
            role,
        })
    }
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
