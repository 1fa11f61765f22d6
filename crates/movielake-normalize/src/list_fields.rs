//! Normalization of list columns (sequences of scalar strings) into a
//! dimension of distinct values plus a content→value bridge.

use std::collections::HashMap;

use serde_json::Value;

use crate::record::ContentRecord;
use crate::value::coerce;

/// A distinct value in a list-field dimension, keyed by a run-scoped
/// surrogate assigned in first order of appearance, starting at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueDimRow {
    pub key: i64,
    pub value: String,
}

/// One occurrence of a dimension value in a content record's list field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeRow {
    pub content_id: String,
    pub key: i64,
}

/// Decomposes one list field across the batch into `(dimension, bridge)`.
///
/// Each record's sequence expands to `(content_id, element)` pairs; a null
/// or empty sequence contributes zero pairs (the record simply has no bridge
/// rows). A non-null scalar cell behaves as a one-element sequence. Null
/// elements are dropped; surviving elements are coerced to strings and
/// deduplicated by string equality. Repeats within a single record emit
/// repeated bridge rows.
#[must_use]
pub fn normalize_list(
    records: &[ContentRecord],
    field: &str,
) -> (Vec<ValueDimRow>, Vec<BridgeRow>) {
    let mut dimension: Vec<ValueDimRow> = Vec::new();
    let mut keys: HashMap<String, i64> = HashMap::new();
    let mut bridge: Vec<BridgeRow> = Vec::new();

    for record in records {
        for element in expand_sequence(record.field(field)) {
            if element.is_null() {
                continue;
            }
            let value = coerce(element);
            let next_key = dimension.len() as i64 + 1;
            let key = *keys.entry(value.clone()).or_insert_with(|| {
                dimension.push(ValueDimRow {
                    key: next_key,
                    value,
                });
                next_key
            });
            bridge.push(BridgeRow {
                content_id: record.content_id().to_owned(),
                key,
            });
        }
    }

    (dimension, bridge)
}

/// Expands a cell into its element sequence: arrays yield their elements,
/// null yields nothing, and any other scalar yields itself.
pub(crate) fn expand_sequence(cell: &Value) -> impl Iterator<Item = &Value> {
    let elements: Vec<&Value> = match cell {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    };
    elements.into_iter()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: serde_json::Value) -> ContentRecord {
        ContentRecord::from_value(value).expect("test record should parse")
    }

    #[test]
    fn round_trip_batch_of_three() {
        // One 2-element list, one empty list, one list with a repeat:
        // the dimension holds the distinct values, the bridge 2 + 0 + 2 rows.
        let records = vec![
            record(json!({"id": "tt1", "genres": ["Drama", "Sci-Fi"]})),
            record(json!({"id": "tt2", "genres": []})),
            record(json!({"id": "tt3", "genres": ["Drama", "Drama"]})),
        ];

        let (dimension, bridge) = normalize_list(&records, "genres");

        assert_eq!(dimension.len(), 2);
        assert_eq!(dimension[0], ValueDimRow { key: 1, value: "Drama".into() });
        assert_eq!(dimension[1], ValueDimRow { key: 2, value: "Sci-Fi".into() });

        assert_eq!(bridge.len(), 4);
        assert_eq!(bridge[0], BridgeRow { content_id: "tt1".into(), key: 1 });
        assert_eq!(bridge[1], BridgeRow { content_id: "tt1".into(), key: 2 });
        // Intra-record repeat: two bridge rows pointing at the same key.
        assert_eq!(bridge[2], BridgeRow { content_id: "tt3".into(), key: 1 });
        assert_eq!(bridge[3], BridgeRow { content_id: "tt3".into(), key: 1 });
    }

    #[test]
    fn surrogate_keys_follow_first_appearance() {
        let records = vec![
            record(json!({"id": "tt1", "genres": ["Horror"]})),
            record(json!({"id": "tt2", "genres": ["Comedy", "Horror"]})),
        ];
        let (dimension, _) = normalize_list(&records, "genres");
        let values: Vec<&str> = dimension.iter().map(|d| d.value.as_str()).collect();
        assert_eq!(values, ["Horror", "Comedy"]);
        assert_eq!(dimension[0].key, 1);
        assert_eq!(dimension[1].key, 2);
    }

    #[test]
    fn null_and_missing_cells_contribute_nothing() {
        let records = vec![
            record(json!({"id": "tt1", "genres": null})),
            record(json!({"id": "tt2"})),
        ];
        let (dimension, bridge) = normalize_list(&records, "genres");
        assert!(dimension.is_empty());
        assert!(bridge.is_empty());
    }

    #[test]
    fn null_elements_are_dropped() {
        let records = vec![record(json!({"id": "tt1", "genres": ["Drama", null]}))];
        let (dimension, bridge) = normalize_list(&records, "genres");
        assert_eq!(dimension.len(), 1);
        assert_eq!(bridge.len(), 1);
    }

    #[test]
    fn scalar_cell_acts_as_one_element_sequence() {
        let records = vec![record(json!({"id": "tt1", "genres": "Drama"}))];
        let (dimension, bridge) = normalize_list(&records, "genres");
        assert_eq!(dimension.len(), 1);
        assert_eq!(dimension[0].value, "Drama");
        assert_eq!(bridge.len(), 1);
    }

    #[test]
    fn every_bridge_key_exists_in_the_dimension() {
        let records = vec![
            record(json!({"id": "tt1", "genres": ["A", "B", "C"]})),
            record(json!({"id": "tt2", "genres": ["B", "D"]})),
        ];
        let (dimension, bridge) = normalize_list(&records, "genres");
        for row in &bridge {
            assert!(
                dimension.iter().any(|d| d.key == row.key),
                "bridge key {} missing from dimension",
                row.key
            );
        }
    }
}
