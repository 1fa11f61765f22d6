//! The append-only popularity fact: sentinel filtering, date stamping, and
//! dense ranking over the metric.

use chrono::NaiveDate;
use serde_json::Value;

/// One identifier with its raw popularity metric as fetched — possibly
/// null, a number, or a sentinel string.
#[derive(Debug, Clone)]
pub struct PopularitySample {
    pub content_id: String,
    pub popularity: Value,
}

/// A fact row ready for append. Repeated runs accumulate rows; the same
/// content id reappears across load dates by design.
#[derive(Debug, Clone, PartialEq)]
pub struct PopularityFactRow {
    pub content_id: String,
    pub popularity: f64,
    pub load_date: NaiveDate,
    pub popularity_rank: i32,
}

/// Sentinel strings the upstream uses where a number is missing.
const METRIC_SENTINELS: &[&str] = &["", " ", "NaN", "nan"];

/// Parses a raw metric value into a finite float. Null, sentinel strings,
/// non-numeric strings, and non-finite numbers all yield `None`.
#[must_use]
pub fn parse_metric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            if METRIC_SENTINELS.contains(&s.as_str()) {
                None
            } else {
                s.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

/// Builds the fact rows for one load: samples whose metric does not parse
/// are silently dropped (an unresolved identifier chain is not an error),
/// survivors are stamped with `load_date` and dense-ranked descending.
/// Input order is preserved.
#[must_use]
pub fn build_popularity_facts(
    samples: &[PopularitySample],
    load_date: NaiveDate,
) -> Vec<PopularityFactRow> {
    let resolved: Vec<(&str, f64)> = samples
        .iter()
        .filter_map(|sample| {
            parse_metric(&sample.popularity).map(|metric| (sample.content_id.as_str(), metric))
        })
        .collect();

    let metrics: Vec<f64> = resolved.iter().map(|(_, metric)| *metric).collect();
    let ranks = dense_rank_desc(&metrics);

    resolved
        .into_iter()
        .zip(ranks)
        .map(|((content_id, popularity), popularity_rank)| PopularityFactRow {
            content_id: content_id.to_owned(),
            popularity,
            load_date,
            popularity_rank,
        })
        .collect()
}

/// Dense rank over `values`, descending: the highest value ranks 1, ties
/// share a rank, and the next distinct value continues without a gap.
///
/// Values must be finite (callers filter through [`parse_metric`] first).
#[must_use]
pub fn dense_rank_desc(values: &[f64]) -> Vec<i32> {
    let mut distinct: Vec<f64> = values.to_vec();
    distinct.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    distinct.dedup();

    values
        .iter()
        .map(|v| {
            let greater = distinct.partition_point(|d| d > v);
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            {
                greater as i32 + 1
            }
        })
        .collect()
}
