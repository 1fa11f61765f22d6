//! The staging table that feeds both pipeline runs with content ids.

use sqlx::PgPool;

use crate::DbError;

/// Returns the staged content ids in staging order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails — including when the
/// staging table does not exist yet, which means nothing has been staged
/// and the run cannot proceed.
pub async fn list_staged_content_ids(pool: &PgPool) -> Result<Vec<String>, DbError> {
    let ids = sqlx::query_scalar::<_, String>(
        "SELECT content_id FROM stg_content_ids ORDER BY position",
    )
    .fetch_all(pool)
    .await?;
    Ok(ids)
}

/// Replaces the staging table contents with `content_ids`, preserving their
/// order via an explicit position column.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails.
pub async fn insert_staged_content_ids(pool: &PgPool, content_ids: &[String]) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS stg_content_ids (
            position BIGINT NOT NULL,
            content_id TEXT NOT NULL
        )",
    )
    .execute(&mut *tx)
    .await?;
    sqlx::query("TRUNCATE stg_content_ids")
        .execute(&mut *tx)
        .await?;

    for (position, content_id) in (1i64..).zip(content_ids) {
        sqlx::query("INSERT INTO stg_content_ids (position, content_id) VALUES ($1, $2)")
            .bind(position)
            .bind(content_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    tracing::info!(count = content_ids.len(), "staging table replaced");
    Ok(())
}
