//! Paced batch fetching over any per-item fetch operation.
//!
//! The pipeline consumes complete batches: every requested id either maps to
//! a fetched value or is absent from the result. Absence is the degraded
//! form of every per-item failure — a 404, or retries exhausted on a
//! transient error — and never aborts the run.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::CatalogError;
use crate::retry::retry_with_backoff;

/// Pacing and retry settings for one batched fetch run.
#[derive(Debug, Clone, Copy)]
pub struct BatchConfig {
    pub batch_size: usize,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    /// Random pause drawn from this range between consecutive batches, to
    /// stay under the upstream rate limits.
    pub pause_min_ms: u64,
    pub pause_max_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            max_retries: 4,
            backoff_base_ms: 1_000,
            pause_min_ms: 2_000,
            pause_max_ms: 4_000,
        }
    }
}

/// Fetches `ids` in batches of `config.batch_size`, applying bounded
/// per-item retry with back-off and a randomized pause between batches.
///
/// Returns a map from id to fetched value. Ids that came back 404 or
/// exhausted their retries are simply absent from the map (logged, not
/// propagated), so the caller sees a completed batch either way.
pub async fn fetch_batches<T, F, Fut>(
    ids: &[String],
    config: &BatchConfig,
    mut fetch_one: F,
) -> HashMap<String, T>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, CatalogError>>,
{
    let batch_size = config.batch_size.max(1);
    let batch_count = ids.len().div_ceil(batch_size);
    let mut fetched: HashMap<String, T> = HashMap::with_capacity(ids.len());

    for (index, batch) in ids.chunks(batch_size).enumerate() {
        tracing::info!(
            batch = index + 1,
            batches = batch_count,
            size = batch.len(),
            "fetching batch"
        );

        for id in batch {
            let result = retry_with_backoff(config.max_retries, config.backoff_base_ms, || {
                fetch_one(id.clone())
            })
            .await;
            match result {
                Ok(value) => {
                    fetched.insert(id.clone(), value);
                }
                Err(CatalogError::NotFound(_)) => {
                    tracing::debug!(content_id = %id, "not found upstream — skipping");
                }
                Err(err) => {
                    tracing::warn!(content_id = %id, error = %err, "fetch failed — skipping");
                }
            }
        }

        if index + 1 < batch_count {
            let pause_ms = if config.pause_max_ms > config.pause_min_ms {
                rand::rng().random_range(config.pause_min_ms..=config.pause_max_ms)
            } else {
                config.pause_min_ms
            };
            tokio::time::sleep(Duration::from_millis(pause_ms)).await;
        }
    }

    fetched
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn quick_config() -> BatchConfig {
        BatchConfig {
            batch_size: 2,
            max_retries: 1,
            backoff_base_ms: 0,
            pause_min_ms: 0,
            pause_max_ms: 0,
        }
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_owned()).collect()
    }

    #[tokio::test]
    async fn fetches_every_id_across_batches() {
        let ids = ids(&["a", "b", "c"]);
        let fetched = fetch_batches(&ids, &quick_config(), |id| async move {
            Ok::<String, CatalogError>(format!("value-{id}"))
        })
        .await;
        assert_eq!(fetched.len(), 3);
        assert_eq!(fetched["c"], "value-c");
    }

    #[tokio::test]
    async fn not_found_degrades_to_absent() {
        let ids = ids(&["a", "missing", "c"]);
        let fetched = fetch_batches(&ids, &quick_config(), |id| async move {
            if id == "missing" {
                Err(CatalogError::NotFound(id))
            } else {
                Ok(id)
            }
        })
        .await;
        assert_eq!(fetched.len(), 2);
        assert!(!fetched.contains_key("missing"));
    }

    #[tokio::test]
    async fn exhausted_retries_degrade_to_absent() {
        let calls = Arc::new(AtomicU32::new(0));
        let ids = ids(&["flaky"]);
        let c = Arc::clone(&calls);
        let fetched = fetch_batches(&ids, &quick_config(), move |id| {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                let _ = id;
                Err::<String, _>(CatalogError::UnexpectedStatus {
                    status: 503,
                    url: "http://x".to_owned(),
                })
            }
        })
        .await;
        assert!(fetched.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 2, "1 try + 1 retry");
    }

    #[tokio::test]
    async fn empty_id_list_is_a_no_op() {
        let fetched =
            fetch_batches(&[], &quick_config(), |id| async move { Ok::<String, CatalogError>(id) })
                .await;
        assert!(fetched.is_empty());
    }
}
