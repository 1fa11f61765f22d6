//! Shaping normalizer output into the generic [`TableData`] handed to the
//! sink, with the warehouse's table and column naming: `DimContent`,
//! `Dim_<field>`, `bridge_<field>`, `FactContentPopularity`.

use movielake_core::{CellValue, ColumnDef, ColumnType, TableData};

use crate::content::ContentDimensionRow;
use crate::list_fields::{BridgeRow, ValueDimRow};
use crate::popularity::PopularityFactRow;
use crate::schema::EDGE_ATTRIBUTE_COLUMN;
use crate::struct_fields::{StructBridgeRow, StructDimension};

fn key_column(field: &str) -> String {
    format!("{field}_id")
}

/// `Dim_<field>` for a list field: `(<field>_id, <field>)`.
#[must_use]
pub fn list_dimension_table(field: &str, rows: &[ValueDimRow]) -> TableData {
    let mut table = TableData::new(
        format!("Dim_{field}"),
        vec![
            ColumnDef::new(key_column(field), ColumnType::BigInt),
            ColumnDef::new(field, ColumnType::Text),
        ],
    );
    for row in rows {
        table.push_row(vec![
            CellValue::BigInt(row.key),
            CellValue::Text(row.value.clone()),
        ]);
    }
    table
}

/// `bridge_<field>` for a list field: `(content_id, <field>_id)`.
#[must_use]
pub fn bridge_table(field: &str, rows: &[BridgeRow]) -> TableData {
    let mut table = TableData::new(
        format!("bridge_{field}"),
        vec![
            ColumnDef::new("content_id", ColumnType::Text),
            ColumnDef::new(key_column(field), ColumnType::BigInt),
        ],
    );
    for row in rows {
        table.push_row(vec![
            CellValue::Text(row.content_id.clone()),
            CellValue::BigInt(row.key),
        ]);
    }
    table
}

/// `Dim_<field>` for a structured field: the surrogate key followed by the
/// batch's flattened attribute columns.
#[must_use]
pub fn struct_dimension_table(field: &str, dimension: &StructDimension) -> TableData {
    let mut columns = vec![ColumnDef::new(key_column(field), ColumnType::BigInt)];
    columns.extend(
        dimension
            .columns
            .iter()
            .map(|name| ColumnDef::new(name.clone(), ColumnType::Text)),
    );
    let mut table = TableData::new(format!("Dim_{field}"), columns);
    for row in &dimension.rows {
        let mut cells = vec![CellValue::BigInt(row.key)];
        cells.extend(row.values.iter().cloned().map(CellValue::Text));
        table.push_row(cells);
    }
    table
}

/// `bridge_<field>` for a structured field; the cast bridge additionally
/// carries the per-occurrence `characters` and `job` columns.
#[must_use]
pub fn struct_bridge_table(field: &str, rows: &[StructBridgeRow]) -> TableData {
    let carries_edges = field == EDGE_ATTRIBUTE_COLUMN;
    let mut columns = vec![
        ColumnDef::new("content_id", ColumnType::Text),
        ColumnDef::new(key_column(field), ColumnType::BigInt),
    ];
    if carries_edges {
        columns.push(ColumnDef::new("characters", ColumnType::Text));
        columns.push(ColumnDef::new("job", ColumnType::Text));
    }
    let mut table = TableData::new(format!("bridge_{field}"), columns);
    for row in rows {
        let mut cells = vec![
            CellValue::Text(row.content_id.clone()),
            CellValue::BigInt(row.key),
        ];
        if carries_edges {
            cells.push(CellValue::Text(row.characters.clone().unwrap_or_default()));
            cells.push(CellValue::Text(row.job.clone().unwrap_or_default()));
        }
        table.push_row(cells);
    }
    table
}

/// `DimContent`: the wide one-row-per-title table.
#[must_use]
pub fn content_dimension_table(rows: &[ContentDimensionRow]) -> TableData {
    let text = |name: &str| ColumnDef::new(name, ColumnType::Text);
    let bigint = |name: &str| ColumnDef::new(name, ColumnType::BigInt);
    let mut table = TableData::new(
        "DimContent",
        vec![
            text("content_id"),
            text("type"),
            text("primaryTitle"),
            text("description"),
            text("primaryImage"),
            text("trailer"),
            text("contentRating"),
            bigint("startYear"),
            bigint("endYear"),
            bigint("budget"),
            bigint("grossWorldwide"),
            bigint("runtimeMinutes"),
            ColumnDef::new("averageRating", ColumnType::Double),
            bigint("numVotes"),
            bigint("totalSeasons"),
            bigint("totalEpisodes"),
            text("interests"),
            text("countriesOfOrigin"),
            text("spokenLanguages"),
            text("filmingLocations"),
            text("genres"),
            text("directors_fullName"),
            text("writers_fullName"),
            text("cast_fullName"),
            text("productionCompanies_fullName"),
        ],
    );
    for row in rows {
        table.push_row(vec![
            CellValue::Text(row.content_id.clone()),
            CellValue::Text(row.content_type.clone()),
            CellValue::Text(row.primary_title.clone()),
            CellValue::Text(row.description.clone()),
            CellValue::Text(row.primary_image.clone()),
            CellValue::Text(row.trailer.clone()),
            CellValue::Text(row.content_rating.clone()),
            CellValue::from(row.start_year),
            CellValue::from(row.end_year),
            CellValue::from(row.budget),
            CellValue::from(row.gross_worldwide),
            CellValue::from(row.runtime_minutes),
            CellValue::from(row.average_rating),
            CellValue::from(row.num_votes),
            CellValue::from(row.total_seasons),
            CellValue::from(row.total_episodes),
            CellValue::Text(row.interests.clone()),
            CellValue::Text(row.countries_of_origin.clone()),
            CellValue::Text(row.spoken_languages.clone()),
            CellValue::Text(row.filming_locations.clone()),
            CellValue::Text(row.genres.clone()),
            CellValue::Text(row.directors_full_name.clone()),
            CellValue::Text(row.writers_full_name.clone()),
            CellValue::Text(row.cast_full_name.clone()),
            CellValue::Text(row.production_companies_full_name.clone()),
        ]);
    }
    table
}

/// `FactContentPopularity`: append-only popularity fact.
#[must_use]
pub fn popularity_fact_table(rows: &[PopularityFactRow]) -> TableData {
    let mut table = TableData::new(
        "FactContentPopularity",
        vec![
            ColumnDef::new("content_id", ColumnType::Text),
            ColumnDef::new("popularity", ColumnType::Double),
            ColumnDef::new("loadDate", ColumnType::Date),
            ColumnDef::new("popularity_rank", ColumnType::BigInt),
        ],
    );
    for row in rows {
        table.push_row(vec![
            CellValue::Text(row.content_id.clone()),
            CellValue::Double(row.popularity),
            CellValue::Date(row.load_date),
            CellValue::BigInt(i64::from(row.popularity_rank)),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::record::ContentRecord;
    use crate::{build_content_dimension, normalize_list, normalize_struct};

    fn record(value: serde_json::Value) -> ContentRecord {
        ContentRecord::from_value(value).expect("test record should parse")
    }

    #[test]
    fn list_tables_carry_field_scoped_key_columns() {
        let records = vec![record(json!({"id": "tt1", "genres": ["Drama"]}))];
        let (dimension, bridge) = normalize_list(&records, "genres");

        let dim_table = list_dimension_table("genres", &dimension);
        assert_eq!(dim_table.name, "Dim_genres");
        assert_eq!(dim_table.columns[0].name, "genres_id");
        assert_eq!(dim_table.columns[1].name, "genres");

        let brg_table = bridge_table("genres", &bridge);
        assert_eq!(brg_table.name, "bridge_genres");
        assert_eq!(brg_table.columns[0].name, "content_id");
        assert_eq!(brg_table.columns[1].name, "genres_id");
        assert_eq!(brg_table.rows.len(), 1);
    }

    #[test]
    fn cast_bridge_table_has_edge_columns_others_do_not() {
        let records = vec![record(json!({"id": "tt1",
            "cast": [{"id": "nm1", "fullName": "A", "characters": ["X"], "job": "actor"}],
            "directors": [{"id": "nm2", "fullName": "B"}]
        }))];

        let (_, cast_bridge) = normalize_struct(&records, "cast");
        let cast_table = struct_bridge_table("cast", &cast_bridge);
        let names: Vec<&str> = cast_table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["content_id", "cast_id", "characters", "job"]);

        let (_, dir_bridge) = normalize_struct(&records, "directors");
        let dir_table = struct_bridge_table("directors", &dir_bridge);
        let names: Vec<&str> = dir_table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["content_id", "directors_id"]);
    }

    #[test]
    fn struct_dimension_table_prepends_surrogate_key() {
        let records = vec![record(json!({"id": "tt1",
            "writers": [{"id": "nm1", "fullName": "A"}]
        }))];
        let (dimension, _) = normalize_struct(&records, "writers");
        let table = struct_dimension_table("writers", &dimension);
        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["writers_id", "id", "fullName"]);
        assert_eq!(table.rows[0][0], CellValue::BigInt(1));
    }

    #[test]
    fn content_dimension_table_applies_null_policy() {
        let records = vec![record(json!({"id": "tt1", "primaryTitle": "Alien"}))];
        let rows = build_content_dimension(&records);
        let table = content_dimension_table(&rows);
        assert_eq!(table.columns.len(), 25);
        // description (text, missing) -> "", startYear (numeric, missing) -> NULL
        assert_eq!(table.rows[0][3], CellValue::Text(String::new()));
        assert_eq!(table.rows[0][7], CellValue::Null);
    }

    #[test]
    fn popularity_fact_table_shape() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).expect("valid date");
        let rows = vec![crate::PopularityFactRow {
            content_id: "tt1".into(),
            popularity: 12.5,
            load_date: date,
            popularity_rank: 1,
        }];
        let table = popularity_fact_table(&rows);
        assert_eq!(table.name, "FactContentPopularity");
        assert_eq!(table.rows[0][2], CellValue::Date(date));
        assert_eq!(table.rows[0][3], CellValue::BigInt(1));
    }
}
