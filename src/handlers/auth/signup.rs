use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::str::FromStr;

use crate::auth;
use crate::database::models::{Role, UserPublic};
use crate::database::store;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// POST /signup - create a user account.
///
/// Duplicate username or email is a 409; the response carries the public
/// fields only, never the credential.
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> ApiResult<UserPublic> {
    let (username, email, password) = match (&request.username, &request.email, &request.password) {
        (Some(u), Some(e), Some(p)) => (u.trim(), e.trim(), p.as_str()),
        _ => {
            return Err(ApiError::validation_error(
                "username, email and password are required",
            ))
        }
    };

    if !email.contains('@') {
        return Err(ApiError::validation_error("Invalid email format"));
    }
    if password.len() < 8 {
        return Err(ApiError::validation_error(
            "Password must be at least 8 characters",
        ));
    }

    // Role defaults to client; anything outside the closed set is rejected
    let role = match &request.role {
        Some(r) => Role::from_str(r).map_err(ApiError::validation_error)?,
        None => Role::Client,
    };

    let password_hash = password_hash_or_500(password)?;

    let mut tx = state.pool.begin().await?;

    if store::users::find_by_email(&mut *tx, email).await?.is_some()
        || store::users::find_by_username(&mut *tx, username).await?.is_some()
    {
        return Err(ApiError::conflict("User exists. Proceed to login"));
    }

    let user = store::users::create(&mut *tx, username, email, &password_hash, role)
        .await
        .map_err(|e| {
            if unique_violation(&e) {
                // Lost the race against a concurrent signup for the same name
                ApiError::conflict("User exists. Proceed to login")
            } else {
                ApiError::from(e)
            }
        })?;

    tx.commit().await?;

    tracing::info!("User created: {} ({})", user.username, user.email);
    Ok(ApiResponse::created(user.to_public()))
}

fn password_hash_or_500(password: &str) -> Result<String, ApiError> {
    auth::hash_password(password).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ApiError::internal_server_error("Could not process credentials")
    })
}

fn unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}
