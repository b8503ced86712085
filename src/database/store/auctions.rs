use sqlx::PgExecutor;

use crate::database::models::{Auction, AuctionStatus};

pub async fn list_all(ex: impl PgExecutor<'_>) -> Result<Vec<Auction>, sqlx::Error> {
    sqlx::query_as::<_, Auction>(
        r#"
        SELECT auction_id, name, date, start_time, end_time, status
        FROM auctions
        ORDER BY auction_id
        "#,
    )
    .fetch_all(ex)
    .await
}

pub async fn create(
    ex: impl PgExecutor<'_>,
    name: &str,
    date: &str,
    start_time: &str,
    end_time: &str,
    status: AuctionStatus,
) -> Result<Auction, sqlx::Error> {
    sqlx::query_as::<_, Auction>(
        r#"
        INSERT INTO auctions (name, date, start_time, end_time, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING auction_id, name, date, start_time, end_time, status
        "#,
    )
    .bind(name)
    .bind(date)
    .bind(start_time)
    .bind(end_time)
    .bind(status.as_str())
    .fetch_one(ex)
    .await
}

pub async fn find_by_id(
    ex: impl PgExecutor<'_>,
    auction_id: i64,
) -> Result<Option<Auction>, sqlx::Error> {
    sqlx::query_as::<_, Auction>(
        r#"
        SELECT auction_id, name, date, start_time, end_time, status
        FROM auctions
        WHERE auction_id = $1
        "#,
    )
    .bind(auction_id)
    .fetch_optional(ex)
    .await
}

/// Returns true when a row was deleted. Items under the auction go with it
/// (ON DELETE CASCADE).
pub async fn delete_by_id(ex: impl PgExecutor<'_>, auction_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM auctions WHERE auction_id = $1")
        .bind(auction_id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Full-row overwrite; callers apply the PATCH allow-list before this.
pub async fn update(ex: impl PgExecutor<'_>, auction: &Auction) -> Result<Auction, sqlx::Error> {
    sqlx::query_as::<_, Auction>(
        r#"
        UPDATE auctions
        SET name = $1, date = $2, start_time = $3, end_time = $4, status = $5
        WHERE auction_id = $6
        RETURNING auction_id, name, date, start_time, end_time, status
        "#,
    )
    .bind(&auction.name)
    .bind(&auction.date)
    .bind(&auction.start_time)
    .bind(&auction.end_time)
    .bind(&auction.status)
    .bind(auction.auction_id)
    .fetch_one(ex)
    .await
}
