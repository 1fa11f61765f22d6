//! Normalization of structured columns (sequences of person/company
//! entities) into a dimension of distinct entities plus a bridge that can
//! carry per-occurrence edge attributes.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::list_fields::expand_sequence;
use crate::record::ContentRecord;
use crate::schema::{EDGE_ATTRIBUTES, EDGE_ATTRIBUTE_COLUMN};
use crate::value::coerce;

/// Dimension table for one structured field. `columns` is the union of
/// entity attribute names seen across the batch (deterministic order);
/// each row's `values` are positionally aligned with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDimension {
    pub columns: Vec<String>,
    pub rows: Vec<StructDimRow>,
}

/// A distinct entity under full-row equality across every flattened
/// attribute — two companies sharing a display name but differing in any
/// other attribute stay two rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDimRow {
    pub key: i64,
    pub values: Vec<String>,
}

/// One occurrence of an entity in a record's structured field. The edge
/// attributes are populated only for the designated cast field and describe
/// the occurrence, never the entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructBridgeRow {
    pub content_id: String,
    pub key: i64,
    pub characters: Option<String>,
    pub job: Option<String>,
}

/// Decomposes one structured field across the batch into
/// `(dimension, bridge)`.
///
/// Entities that are not JSON objects contribute an empty attribute set
/// (they still occupy a dimension row and a bridge row — malformed data is
/// degraded, not dropped, and never an error). Every attribute value is
/// scalar-coerced; attributes absent from a given entity become `""` so
/// full-row equality is well defined. For the cast field the
/// `characters`/`job` attributes are split out of the entity before dedup
/// and carried per occurrence on the bridge row.
#[must_use]
pub fn normalize_struct(
    records: &[ContentRecord],
    field: &str,
) -> (StructDimension, Vec<StructBridgeRow>) {
    let carries_edges = field == EDGE_ATTRIBUTE_COLUMN;

    // Pass 1: the attribute column set, in first order of appearance.
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for entity in expand_sequence(record.field(field)) {
            if let Value::Object(map) = entity {
                for name in map.keys() {
                    if carries_edges && EDGE_ATTRIBUTES.contains(&name.as_str()) {
                        continue;
                    }
                    if !columns.iter().any(|c| c == name) {
                        columns.push(name.clone());
                    }
                }
            }
        }
    }

    // Pass 2: flatten occurrences, dedup into the dimension, emit bridges.
    let mut rows: Vec<StructDimRow> = Vec::new();
    let mut keys: HashMap<Vec<String>, i64> = HashMap::new();
    let mut bridge: Vec<StructBridgeRow> = Vec::new();
    let empty = Map::new();

    for record in records {
        for entity in expand_sequence(record.field(field)) {
            if entity.is_null() {
                continue;
            }
            let attrs = match entity {
                Value::Object(map) => map,
                _ => &empty,
            };
            let values: Vec<String> = columns
                .iter()
                .map(|name| attrs.get(name).map(coerce).unwrap_or_default())
                .collect();

            let next_key = rows.len() as i64 + 1;
            let key = *keys.entry(values.clone()).or_insert_with(|| {
                rows.push(StructDimRow {
                    key: next_key,
                    values,
                });
                next_key
            });

            let (characters, job) = if carries_edges {
                (
                    attrs.get("characters").map(coerce),
                    attrs.get("job").map(coerce),
                )
            } else {
                (None, None)
            };
            bridge.push(StructBridgeRow {
                content_id: record.content_id().to_owned(),
                key,
                characters,
                job,
            });
        }
    }

    (StructDimension { columns, rows }, bridge)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: serde_json::Value) -> ContentRecord {
        ContentRecord::from_value(value).expect("test record should parse")
    }

    fn column_value<'a>(dim: &'a StructDimension, row: &'a StructDimRow, name: &str) -> &'a str {
        let idx = dim.columns.iter().position(|c| c == name).expect("column");
        &row.values[idx]
    }

    #[test]
    fn shared_entities_dedup_across_records() {
        let records = vec![
            record(json!({"id": "tt1", "directors": [
                {"id": "nm1", "fullName": "Ridley Scott"}
            ]})),
            record(json!({"id": "tt2", "directors": [
                {"id": "nm1", "fullName": "Ridley Scott"},
                {"id": "nm2", "fullName": "Denis Villeneuve"}
            ]})),
        ];

        let (dimension, bridge) = normalize_struct(&records, "directors");

        assert_eq!(dimension.rows.len(), 2);
        assert_eq!(bridge.len(), 3);
        assert_eq!(bridge[0].key, 1);
        assert_eq!(bridge[1].key, 1);
        assert_eq!(bridge[2].key, 2);
    }

    #[test]
    fn same_name_different_attributes_stay_distinct() {
        let records = vec![record(json!({"id": "tt1", "productionCompanies": [
            {"id": "co1", "name": "Orion"},
            {"id": "co2", "name": "Orion"}
        ]}))];

        let (dimension, bridge) = normalize_struct(&records, "productionCompanies");

        assert_eq!(
            dimension.rows.len(),
            2,
            "full-row equality must not merge companies that differ in id"
        );
        assert_eq!(bridge[0].key, 1);
        assert_eq!(bridge[1].key, 2);
    }

    #[test]
    fn attribute_coercion_flattens_nested_values() {
        let records = vec![record(json!({"id": "tt1", "writers": [
            {"id": "nm1", "fullName": {"name": "Dan O'Bannon"}}
        ]}))];
        let (dimension, _) = normalize_struct(&records, "writers");
        let row = &dimension.rows[0];
        assert_eq!(column_value(&dimension, row, "fullName"), "Dan O'Bannon");
    }

    #[test]
    fn missing_attributes_become_empty_strings() {
        let records = vec![record(json!({"id": "tt1", "writers": [
            {"id": "nm1", "fullName": "A"},
            {"id": "nm2"}
        ]}))];
        let (dimension, _) = normalize_struct(&records, "writers");
        assert_eq!(dimension.columns, ["id", "fullName"]);
        assert_eq!(dimension.rows[1].values, ["nm2", ""]);
    }

    #[test]
    fn non_object_entity_degrades_to_empty_attribute_set() {
        let records = vec![record(json!({"id": "tt1", "writers": ["oops", {"id": "nm1"}]}))];
        let (dimension, bridge) = normalize_struct(&records, "writers");
        assert_eq!(bridge.len(), 2);
        assert_eq!(dimension.rows[0].values, [""]);
        assert_eq!(dimension.rows[1].values, ["nm1"]);
    }

    #[test]
    fn cast_bridge_preserves_per_occurrence_edge_attributes() {
        // Same cast member twice with different characters: one dimension
        // row, two bridge rows with their own edge attributes.
        let records = vec![
            record(json!({"id": "tt1", "cast": [
                {"id": "nm1", "fullName": "Hugo Weaving",
                 "characters": ["Agent Smith"], "job": "actor"}
            ]})),
            record(json!({"id": "tt2", "cast": [
                {"id": "nm1", "fullName": "Hugo Weaving",
                 "characters": ["Elrond"], "job": "actor"}
            ]})),
        ];

        let (dimension, bridge) = normalize_struct(&records, "cast");

        assert_eq!(dimension.rows.len(), 1, "edge attrs must not split the entity");
        assert!(!dimension.columns.contains(&"characters".to_string()));
        assert!(!dimension.columns.contains(&"job".to_string()));

        assert_eq!(bridge.len(), 2);
        assert_eq!(bridge[0].key, bridge[1].key);
        assert_eq!(bridge[0].characters.as_deref(), Some("Agent Smith"));
        assert_eq!(bridge[1].characters.as_deref(), Some("Elrond"));
        assert_eq!(bridge[0].job.as_deref(), Some("actor"));
    }

    #[test]
    fn non_cast_bridge_rows_have_no_edge_attributes() {
        let records = vec![record(json!({"id": "tt1", "directors": [
            {"id": "nm1", "fullName": "Ridley Scott", "job": "director"}
        ]}))];
        let (dimension, bridge) = normalize_struct(&records, "directors");
        // Outside the cast field, "job" is an ordinary entity attribute.
        assert!(dimension.columns.contains(&"job".to_string()));
        assert_eq!(bridge[0].characters, None);
        assert_eq!(bridge[0].job, None);
    }

    #[test]
    fn empty_and_missing_fields_contribute_nothing() {
        let records = vec![
            record(json!({"id": "tt1", "cast": []})),
            record(json!({"id": "tt2"})),
        ];
        let (dimension, bridge) = normalize_struct(&records, "cast");
        assert!(dimension.columns.is_empty());
        assert!(dimension.rows.is_empty());
        assert!(bridge.is_empty());
    }
}
