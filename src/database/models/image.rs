use serde::Serialize;
use sqlx::FromRow;

/// An image row; the url is whatever the media collaborator returned.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Image {
    pub image_id: i64,
    pub image_url: String,
    pub item_id: i64,
}
