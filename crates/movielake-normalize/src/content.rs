//! The wide content dimension: one denormalized row per title, independent
//! of the dimension/bridge decomposition.

use serde_json::Value;

use crate::list_fields::expand_sequence;
use crate::record::ContentRecord;
use crate::schema::DISPLAY_NAME_KEYS;
use crate::value::{as_integer, as_real, coerce};

/// One row of `DimContent`. Text columns use `""` for missing values,
/// numeric columns use `None` — the type-aware null policy of the sink.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDimensionRow {
    pub content_id: String,
    pub content_type: String,
    pub primary_title: String,
    pub description: String,
    pub primary_image: String,
    pub trailer: String,
    pub content_rating: String,
    pub start_year: Option<i64>,
    pub end_year: Option<i64>,
    pub budget: Option<i64>,
    pub gross_worldwide: Option<i64>,
    pub runtime_minutes: Option<i64>,
    pub average_rating: Option<f64>,
    pub num_votes: Option<i64>,
    pub total_seasons: Option<i64>,
    pub total_episodes: Option<i64>,
    pub interests: String,
    pub countries_of_origin: String,
    pub spoken_languages: String,
    pub filming_locations: String,
    pub genres: String,
    pub directors_full_name: String,
    pub writers_full_name: String,
    pub cast_full_name: String,
    pub production_companies_full_name: String,
}

/// Flattens the batch into the wide content dimension, one row per record
/// in batch order. List fields become comma-joined strings (`""` when empty
/// or missing); structured fields become comma-joined display names.
#[must_use]
pub fn build_content_dimension(records: &[ContentRecord]) -> Vec<ContentDimensionRow> {
    records
        .iter()
        .map(|record| ContentDimensionRow {
            content_id: record.content_id().to_owned(),
            content_type: text(record, "type"),
            primary_title: text(record, "primaryTitle"),
            description: text(record, "description"),
            primary_image: text(record, "primaryImage"),
            trailer: text(record, "trailer"),
            content_rating: text(record, "contentRating"),
            start_year: as_integer(record.field("startYear")),
            end_year: as_integer(record.field("endYear")),
            budget: as_integer(record.field("budget")),
            gross_worldwide: as_integer(record.field("grossWorldwide")),
            runtime_minutes: as_integer(record.field("runtimeMinutes")),
            average_rating: as_real(record.field("averageRating")),
            num_votes: as_integer(record.field("numVotes")),
            total_seasons: as_integer(record.field("totalSeasons")),
            total_episodes: as_integer(record.field("totalEpisodes")),
            interests: joined_list(record, "interests"),
            countries_of_origin: joined_list(record, "countriesOfOrigin"),
            spoken_languages: joined_list(record, "spokenLanguages"),
            filming_locations: joined_list(record, "filmingLocations"),
            genres: joined_list(record, "genres"),
            directors_full_name: joined_display_names(record, "directors"),
            writers_full_name: joined_display_names(record, "writers"),
            cast_full_name: joined_display_names(record, "cast"),
            production_companies_full_name: joined_display_names(record, "productionCompanies"),
        })
        .collect()
}

fn text(record: &ContentRecord, field: &str) -> String {
    coerce(record.field(field))
}

/// Comma-joins a list field's coerced elements; null elements are dropped.
fn joined_list(record: &ContentRecord, field: &str) -> String {
    let parts: Vec<String> = expand_sequence(record.field(field))
        .filter(|element| !element.is_null())
        .map(coerce)
        .collect();
    parts.join(", ")
}

/// Comma-joins each entity's display name, resolved through the ordered
/// key-preference list; entities without any preferred key contribute `""`.
fn joined_display_names(record: &ContentRecord, field: &str) -> String {
    let parts: Vec<String> = expand_sequence(record.field(field))
        .filter(|element| !element.is_null())
        .map(display_name)
        .collect();
    parts.join(", ")
}

fn display_name(entity: &Value) -> String {
    if let Value::Object(map) = entity {
        for key in DISPLAY_NAME_KEYS {
            if let Some(inner) = map.get(*key) {
                let coerced = coerce(inner);
                if !coerced.is_empty() {
                    return coerced;
                }
            }
        }
        return String::new();
    }
    coerce(entity)
}
