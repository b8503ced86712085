use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::auth::policy::{can_perform, Action};
use crate::config;
use crate::database::models::{Auction, AuctionStatus};
use crate::database::store;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

/// GET /auctions - all auction records
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Auction>> {
    let auctions = store::auctions::list_all(&state.pool).await?;
    Ok(ApiResponse::success(auctions))
}

#[derive(Debug, Deserialize)]
pub struct CreateAuctionRequest {
    pub name: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// POST /auctions - create an auction (admin). Status always starts at
/// Upcoming regardless of the payload.
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateAuctionRequest>,
) -> ApiResult<Auction> {
    if !can_perform(user.role, Action::CreateAuction) {
        return Err(ApiError::forbidden("You are not authorized to create auctions"));
    }

    let (name, date, start_time, end_time) = match (
        &request.name,
        &request.date,
        &request.start_time,
        &request.end_time,
    ) {
        (Some(n), Some(d), Some(s), Some(e)) => (n, d, s, e),
        _ => return Err(ApiError::validation_error("Required data is missing")),
    };

    let mut tx = state.pool.begin().await?;
    let auction =
        store::auctions::create(&mut *tx, name, date, start_time, end_time, AuctionStatus::Upcoming)
            .await?;
    audit(&mut tx, &user, &format!("created auction {}", auction.auction_id)).await?;
    tx.commit().await?;

    tracing::info!("Auction created: {} ({})", auction.auction_id, auction.name);
    Ok(ApiResponse::created(auction))
}

/// GET /auction/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Auction> {
    let auction = store::auctions::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Auction not found"))?;
    Ok(ApiResponse::success(auction))
}

/// DELETE /auction/:id - admin only; dependent items cascade away
pub async fn destroy(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Value> {
    if !can_perform(user.role, Action::DeleteAuction) {
        return Err(ApiError::forbidden("You are not authorized to delete auctions"));
    }

    let mut tx = state.pool.begin().await?;
    let deleted = store::auctions::delete_by_id(&mut *tx, id).await?;
    if !deleted {
        return Err(ApiError::not_found("Auction not found"));
    }
    audit(&mut tx, &user, &format!("deleted auction {}", id)).await?;
    tx.commit().await?;

    tracing::info!("Auction deleted: {}", id);
    Ok(ApiResponse::success(json!({ "message": "Auction deleted successfully" })))
}

/// PATCH /auction/:id - admin only; only name/start_time/end_time may change
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(patch): Json<Value>,
) -> ApiResult<Auction> {
    if !can_perform(user.role, Action::UpdateAuction) {
        return Err(ApiError::forbidden("You are not authorized to update auctions"));
    }

    let patch = patch
        .as_object()
        .ok_or_else(|| ApiError::validation_error("Patch body must be a JSON object"))?
        .clone();

    let mut tx = state.pool.begin().await?;
    let mut auction = store::auctions::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Auction not found"))?;

    apply_auction_patch(&mut auction, &patch)?;

    let auction = store::auctions::update(&mut *tx, &auction).await?;
    audit(&mut tx, &user, &format!("updated auction {}", id)).await?;
    tx.commit().await?;

    Ok(ApiResponse::success(auction))
}

/// Copy allow-listed fields from the patch onto the record. Unknown fields
/// are ignored without error; allow-listed fields must be strings.
fn apply_auction_patch(auction: &mut Auction, patch: &Map<String, Value>) -> Result<(), ApiError> {
    for field in ["name", "start_time", "end_time"] {
        if let Some(value) = patch.get(field) {
            let text = value
                .as_str()
                .ok_or_else(|| ApiError::validation_error(format!("{} must be a string", field)))?
                .to_string();
            match field {
                "name" => auction.name = text,
                "start_time" => auction.start_time = text,
                "end_time" => auction.end_time = text,
                _ => unreachable!(),
            }
        }
    }
    Ok(())
}

async fn audit(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user: &CurrentUser,
    action: &str,
) -> Result<(), ApiError> {
    if config::config().security.enable_audit_logging {
        store::audit::record(&mut **tx, user.user_id, action).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_auction() -> Auction {
        Auction {
            auction_id: 1,
            name: "Spring sale".into(),
            date: "2025-04-01".into(),
            start_time: "09:00".into(),
            end_time: "17:00".into(),
            status: "Upcoming".into(),
        }
    }

    #[test]
    fn patch_applies_allow_listed_fields() {
        let mut auction = sample_auction();
        let patch = serde_json::json!({ "name": "Summer sale", "end_time": "18:00" });
        apply_auction_patch(&mut auction, patch.as_object().unwrap()).unwrap();
        assert_eq!(auction.name, "Summer sale");
        assert_eq!(auction.end_time, "18:00");
        assert_eq!(auction.start_time, "09:00");
    }

    #[test]
    fn patch_ignores_unknown_and_protected_fields() {
        let mut auction = sample_auction();
        let patch = serde_json::json!({ "status": "Closed", "color": "red" });
        apply_auction_patch(&mut auction, patch.as_object().unwrap()).unwrap();
        assert_eq!(auction.status, "Upcoming");
        assert_eq!(auction.name, "Spring sale");
    }

    #[test]
    fn patch_rejects_non_string_values() {
        let mut auction = sample_auction();
        let patch = serde_json::json!({ "name": 42 });
        let err = apply_auction_patch(&mut auction, patch.as_object().unwrap()).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
