use sqlx::PgExecutor;

use crate::database::models::Image;

pub async fn create(
    ex: impl PgExecutor<'_>,
    image_url: &str,
    item_id: i64,
) -> Result<Image, sqlx::Error> {
    sqlx::query_as::<_, Image>(
        r#"
        INSERT INTO images (image_url, item_id)
        VALUES ($1, $2)
        RETURNING image_id, image_url, item_id
        "#,
    )
    .bind(image_url)
    .bind(item_id)
    .fetch_one(ex)
    .await
}

pub async fn list_for_item(ex: impl PgExecutor<'_>, item_id: i64) -> Result<Vec<Image>, sqlx::Error> {
    sqlx::query_as::<_, Image>(
        r#"
        SELECT image_id, image_url, item_id
        FROM images
        WHERE item_id = $1
        ORDER BY image_id
        "#,
    )
    .bind(item_id)
    .fetch_all(ex)
    .await
}
