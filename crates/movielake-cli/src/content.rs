//! The content run: staged ids → batched metadata fetch → star-schema
//! decomposition → overwrite writes.

use movielake_catalog::{fetch_batches, BatchConfig, ImdbClient};
use movielake_core::{AppConfig, TableSink, WriteMode};
use movielake_db::PgTableSink;
use movielake_normalize::{
    bridge_table, build_content_dimension, content_dimension_table, ensure_required_columns,
    list_dimension_table, normalize_list, normalize_struct, schema, struct_bridge_table,
    struct_dimension_table, ContentRecord,
};
use sqlx::PgPool;

pub(crate) async fn run_content(
    pool: &PgPool,
    config: &AppConfig,
    dry_run: bool,
) -> anyhow::Result<()> {
    let ids = movielake_db::list_staged_content_ids(pool).await?;
    tracing::info!(count = ids.len(), "staged content ids loaded");

    if dry_run {
        println!(
            "dry-run: would fetch {} titles and rebuild {} tables",
            ids.len(),
            // DimContent + one dimension and one bridge per nested field.
            1 + 2 * (schema::LIST_COLUMNS.len() + schema::STRUCT_COLUMNS.len())
        );
        return Ok(());
    }

    let client = ImdbClient::new(
        &config.imdb_api_key,
        &config.imdb_api_host,
        &config.imdb_base_url,
        config.fetch_timeout_secs,
    )?;
    let batch_config = BatchConfig {
        batch_size: config.content_batch_size,
        max_retries: config.fetch_max_retries,
        backoff_base_ms: config.fetch_backoff_base_ms,
        pause_min_ms: config.batch_pause_min_ms,
        pause_max_ms: config.batch_pause_max_ms,
    };

    let mut fetched = fetch_batches(&ids, &batch_config, |id| {
        let client = &client;
        async move { client.get_title(&id).await }
    })
    .await;

    // Records in staging order; ids that came back absent simply drop out
    // of every table. A record that fails to parse is degraded the same way.
    let mut records: Vec<ContentRecord> = Vec::with_capacity(fetched.len());
    for id in &ids {
        let Some(value) = fetched.remove(id) else {
            continue;
        };
        match ContentRecord::from_value(value) {
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::warn!(content_id = %id, error = %err, "unusable record, skipping");
            }
        }
    }
    tracing::info!(fetched = records.len(), requested = ids.len(), "batch fetch complete");

    // Hard stop before any write if the upstream contract changed shape.
    ensure_required_columns(&records)?;

    let sink = PgTableSink::new(pool.clone());

    let wide = build_content_dimension(&records);
    sink.write_table(&content_dimension_table(&wide), WriteMode::Overwrite)
        .await?;

    for field in schema::LIST_COLUMNS {
        let (dimension, bridge) = normalize_list(&records, field);
        sink.write_table(&list_dimension_table(field, &dimension), WriteMode::Overwrite)
            .await?;
        sink.write_table(&bridge_table(field, &bridge), WriteMode::Overwrite)
            .await?;
    }

    for field in schema::STRUCT_COLUMNS {
        let (dimension, bridge) = normalize_struct(&records, field);
        sink.write_table(&struct_dimension_table(field, &dimension), WriteMode::Overwrite)
            .await?;
        sink.write_table(&struct_bridge_table(field, &bridge), WriteMode::Overwrite)
            .await?;
    }

    tracing::info!(titles = records.len(), "content run complete");
    Ok(())
}
