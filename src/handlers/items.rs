use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::auth::policy::{can_perform, Action};
use crate::database::models::Item;
use crate::database::store;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

/// GET /items - all items
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Item>> {
    let items = store::items::list_all(&state.pool).await?;
    Ok(ApiResponse::success(items))
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub starting_price: Option<f64>,
    pub category: Option<String>,
    pub auction_id: Option<i64>,
}

/// POST /items - create an item with attached images.
///
/// Multipart body: repeated `file` parts plus a JSON-encoded `item_data`
/// field. The item row and every image row share one transaction; if any
/// upload fails nothing is persisted.
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> ApiResult<Item> {
    if !can_perform(user.role, Action::CreateItem) {
        return Err(ApiError::forbidden("You are not authorized to create items"));
    }

    let mut files: Vec<(String, Vec<u8>)> = Vec::new();
    let mut item_data: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("Malformed multipart body"))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload.bin").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::bad_request("Could not read uploaded file"))?
                    .to_vec();
                files.push((filename, bytes));
            }
            Some("item_data") => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| ApiError::bad_request("Could not read item_data field"))?;
                item_data = Some(text);
            }
            _ => {}
        }
    }

    let item_data = item_data.ok_or_else(|| ApiError::validation_error("item_data is required"))?;
    let request: CreateItemRequest = serde_json::from_str(&item_data)
        .map_err(|e| ApiError::validation_error(format!("item_data is not valid JSON: {}", e)))?;

    let (title, description, starting_price, auction_id) = match (
        &request.title,
        &request.description,
        request.starting_price,
        request.auction_id,
    ) {
        (Some(t), Some(d), Some(p), Some(a)) => (t, d, p, a),
        _ => return Err(ApiError::validation_error("Required data is missing")),
    };
    let category = request.category.as_deref().unwrap_or("");

    let mut tx = state.pool.begin().await?;

    // Reject dangling auction references up front instead of bubbling an
    // FK violation as a 500
    if store::auctions::find_by_id(&mut *tx, auction_id).await?.is_none() {
        return Err(ApiError::validation_error(
            "auction_id does not reference an existing auction",
        ));
    }

    let item = store::items::create(
        &mut *tx,
        title,
        description,
        starting_price,
        category,
        user.user_id,
        auction_id,
    )
    .await?;

    for (filename, bytes) in files {
        // A failed upload drops the transaction: no item, no partial images
        let uploaded = state.media.upload(bytes, &filename).await?;
        store::images::create(&mut *tx, &uploaded.url, item.item_id).await?;
    }

    tx.commit().await?;

    tracing::info!("Item created: {} ({})", item.item_id, item.title);
    Ok(ApiResponse::created(item))
}

/// GET /item/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Item> {
    let item = store::items::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Item not found"))?;
    Ok(ApiResponse::success(item))
}

/// GET /item/:id/images - images linked to an item (the create response
/// does not embed them)
pub async fn images(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Value> {
    if store::items::find_by_id(&state.pool, id).await?.is_none() {
        return Err(ApiError::not_found("Item not found"));
    }
    let images = store::images::list_for_item(&state.pool, id).await?;
    Ok(ApiResponse::success(json!(images)))
}

/// DELETE /item/:id - any authenticated user; images and bids cascade
pub async fn destroy(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Value> {
    if !can_perform(user.role, Action::DeleteItem) {
        return Err(ApiError::forbidden("You are not authorized to delete items"));
    }

    let mut tx = state.pool.begin().await?;
    let deleted = store::items::delete_by_id(&mut *tx, id).await?;
    if !deleted {
        return Err(ApiError::not_found("Item not found"));
    }
    tx.commit().await?;

    tracing::info!("Item deleted: {}", id);
    Ok(ApiResponse::success(json!({ "message": "Item deleted successfully" })))
}

/// PATCH /item/:id - allow-listed field overwrite; an `images` array adds
/// one image row per URL
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(patch): Json<Value>,
) -> ApiResult<Item> {
    if !can_perform(user.role, Action::UpdateItem) {
        return Err(ApiError::forbidden("You are not authorized to update items"));
    }

    let patch = patch
        .as_object()
        .ok_or_else(|| ApiError::validation_error("Patch body must be a JSON object"))?
        .clone();

    let mut tx = state.pool.begin().await?;
    let mut item = store::items::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Item not found"))?;

    apply_item_patch(&mut item, &patch)?;

    if store::auctions::find_by_id(&mut *tx, item.auction_id).await?.is_none() {
        return Err(ApiError::validation_error(
            "auction_id does not reference an existing auction",
        ));
    }

    let item = store::items::update(&mut *tx, &item).await?;

    if let Some(urls) = patch.get("images") {
        let urls = urls
            .as_array()
            .ok_or_else(|| ApiError::validation_error("images must be an array of URLs"))?;
        for url in urls {
            let url = url
                .as_str()
                .ok_or_else(|| ApiError::validation_error("images must be an array of URLs"))?;
            store::images::create(&mut *tx, url, item.item_id).await?;
        }
    }

    tx.commit().await?;

    Ok(ApiResponse::success(item))
}

/// Copy allow-listed fields from the patch onto the record. Unknown fields
/// are ignored without error.
fn apply_item_patch(item: &mut Item, patch: &Map<String, Value>) -> Result<(), ApiError> {
    if let Some(value) = patch.get("title") {
        item.title = expect_string("title", value)?;
    }
    if let Some(value) = patch.get("description") {
        item.description = expect_string("description", value)?;
    }
    if let Some(value) = patch.get("category") {
        item.category = expect_string("category", value)?;
    }
    if let Some(value) = patch.get("starting_price") {
        item.starting_price = value
            .as_f64()
            .ok_or_else(|| ApiError::validation_error("starting_price must be a number"))?;
    }
    if let Some(value) = patch.get("auction_id") {
        item.auction_id = value
            .as_i64()
            .ok_or_else(|| ApiError::validation_error("auction_id must be an integer"))?;
    }
    Ok(())
}

fn expect_string(field: &str, value: &Value) -> Result<String, ApiError> {
    value
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| ApiError::validation_error(format!("{} must be a string", field)))
}
