use sqlx::PgExecutor;

use crate::database::models::Item;

pub async fn list_all(ex: impl PgExecutor<'_>) -> Result<Vec<Item>, sqlx::Error> {
    sqlx::query_as::<_, Item>(
        r#"
        SELECT item_id, title, description, starting_price, category, posted_by, auction_id
        FROM items
        ORDER BY item_id
        "#,
    )
    .fetch_all(ex)
    .await
}

pub async fn create(
    ex: impl PgExecutor<'_>,
    title: &str,
    description: &str,
    starting_price: f64,
    category: &str,
    posted_by: i64,
    auction_id: i64,
) -> Result<Item, sqlx::Error> {
    sqlx::query_as::<_, Item>(
        r#"
        INSERT INTO items (title, description, starting_price, category, posted_by, auction_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING item_id, title, description, starting_price, category, posted_by, auction_id
        "#,
    )
    .bind(title)
    .bind(description)
    .bind(starting_price)
    .bind(category)
    .bind(posted_by)
    .bind(auction_id)
    .fetch_one(ex)
    .await
}

pub async fn find_by_id(ex: impl PgExecutor<'_>, item_id: i64) -> Result<Option<Item>, sqlx::Error> {
    sqlx::query_as::<_, Item>(
        r#"
        SELECT item_id, title, description, starting_price, category, posted_by, auction_id
        FROM items
        WHERE item_id = $1
        "#,
    )
    .bind(item_id)
    .fetch_optional(ex)
    .await
}

/// Returns true when a row was deleted. Images and bids cascade.
pub async fn delete_by_id(ex: impl PgExecutor<'_>, item_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM items WHERE item_id = $1")
        .bind(item_id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Full-row overwrite; callers apply the PATCH allow-list before this.
pub async fn update(ex: impl PgExecutor<'_>, item: &Item) -> Result<Item, sqlx::Error> {
    sqlx::query_as::<_, Item>(
        r#"
        UPDATE items
        SET title = $1, description = $2, starting_price = $3, category = $4, auction_id = $5
        WHERE item_id = $6
        RETURNING item_id, title, description, starting_price, category, posted_by, auction_id
        "#,
    )
    .bind(&item.title)
    .bind(&item.description)
    .bind(item.starting_price)
    .bind(&item.category)
    .bind(item.auction_id)
    .bind(item.item_id)
    .fetch_one(ex)
    .await
}
