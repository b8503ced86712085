use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub item_id: i64,
    pub title: String,
    pub description: String,
    pub starting_price: f64,
    pub category: String,
    pub posted_by: i64,
    pub auction_id: i64,
}
