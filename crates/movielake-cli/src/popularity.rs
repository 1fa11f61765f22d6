//! The popularity run: staged ids → IMDb→TMDB id mapping → metric lookup →
//! dense-ranked fact rows, appended under today's date.

use chrono::Utc;
use movielake_catalog::{fetch_batches, BatchConfig, ImdbClient, TmdbClient};
use movielake_core::{AppConfig, TableSink, WriteMode};
use movielake_db::PgTableSink;
use movielake_normalize::{build_popularity_facts, popularity_fact_table, PopularitySample};
use serde_json::Value;
use sqlx::PgPool;

pub(crate) async fn run_popularity(
    pool: &PgPool,
    config: &AppConfig,
    dry_run: bool,
) -> anyhow::Result<()> {
    let api_token = config.tmdb_api_token.as_deref().ok_or_else(|| {
        anyhow::anyhow!("MOVIELAKE_TMDB_API_TOKEN is required for the popularity run")
    })?;

    let ids = movielake_db::list_staged_content_ids(pool).await?;
    tracing::info!(count = ids.len(), "staged content ids loaded");

    if dry_run {
        println!(
            "dry-run: would resolve {} ids and append to FactContentPopularity",
            ids.len()
        );
        return Ok(());
    }

    let imdb = ImdbClient::new(
        &config.imdb_api_key,
        &config.imdb_api_host,
        &config.imdb_base_url,
        config.fetch_timeout_secs,
    )?;
    let tmdb = TmdbClient::new(api_token, &config.tmdb_base_url, config.fetch_timeout_secs)?;
    let batch_config = BatchConfig {
        batch_size: config.popularity_batch_size,
        max_retries: config.fetch_max_retries,
        backoff_base_ms: config.fetch_backoff_base_ms,
        pause_min_ms: config.batch_pause_min_ms,
        pause_max_ms: config.batch_pause_max_ms,
    };

    // Step 1: IMDb id → TMDB id. Unmapped ids resolve to None and fall out
    // of the fact; fetch failures are absent from the map with the same effect.
    let id_map = fetch_batches(&ids, &batch_config, |id| {
        let imdb = &imdb;
        async move { imdb.get_tmdb_id(&id).await }
    })
    .await;

    let tmdb_ids: Vec<String> = ids
        .iter()
        .filter_map(|id| id_map.get(id).cloned().flatten())
        .collect();
    tracing::info!(resolved = tmdb_ids.len(), requested = ids.len(), "id mapping complete");

    // Step 2: TMDB id → popularity metric.
    let metrics = fetch_batches(&tmdb_ids, &batch_config, |tmdb_id| {
        let tmdb = &tmdb;
        async move { tmdb.get_popularity(&tmdb_id).await }
    })
    .await;

    // Assemble samples in staging order; any break in the id→metric chain
    // leaves the metric Null, which the fact builder silently drops.
    let samples: Vec<PopularitySample> = ids
        .iter()
        .map(|id| {
            let popularity = id_map
                .get(id)
                .and_then(|tmdb_id| tmdb_id.as_ref())
                .and_then(|tmdb_id| metrics.get(tmdb_id))
                .cloned()
                .unwrap_or(Value::Null);
            PopularitySample {
                content_id: id.clone(),
                popularity,
            }
        })
        .collect();

    let facts = build_popularity_facts(&samples, Utc::now().date_naive());
    tracing::info!(facts = facts.len(), samples = samples.len(), "popularity facts built");

    let sink = PgTableSink::new(pool.clone());
    sink.write_table(&popularity_fact_table(&facts), WriteMode::Append)
        .await?;

    tracing::info!(facts = facts.len(), "popularity run complete");
    Ok(())
}
