use sqlx::PgExecutor;

/// Insert an audit row for an administrative mutation. Runs inside the same
/// transaction as the mutation it records.
pub async fn record(ex: impl PgExecutor<'_>, user_id: i64, action: &str) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO audit_logs (action, user_id) VALUES ($1, $2)")
        .bind(action)
        .bind(user_id)
        .execute(ex)
        .await?;
    Ok(())
}
