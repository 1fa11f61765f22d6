//! Fixed source schema for the catalog's title records.
//!
//! The nested JSON has three field classes — scalar, list-of-strings, and
//! list-of-entities — resolved here once at schema-definition time rather
//! than sniffed per record. The column lists below are the upstream
//! contract; [`crate::ensure_required_columns`] enforces them per batch.

/// Kind of a scalar column, driving the output null policy: text columns
/// carry `""` for missing values, numeric columns carry NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Text,
    Integer,
    Real,
}

#[derive(Debug, Clone, Copy)]
pub struct ScalarColumn {
    pub name: &'static str,
    pub kind: ScalarKind,
}

const fn text(name: &'static str) -> ScalarColumn {
    ScalarColumn {
        name,
        kind: ScalarKind::Text,
    }
}

const fn integer(name: &'static str) -> ScalarColumn {
    ScalarColumn {
        name,
        kind: ScalarKind::Integer,
    }
}

/// Source field holding the content identifier; renamed to `content_id` in
/// every output table.
pub const ID_COLUMN: &str = "id";

/// Scalar descriptive columns fetched for every title.
///
/// `url` is part of the fetch contract but intentionally not carried into
/// the wide content dimension.
pub const SCALAR_COLUMNS: &[ScalarColumn] = &[
    text("type"),
    text("url"),
    text("primaryTitle"),
    text("description"),
    text("primaryImage"),
    text("trailer"),
    text("contentRating"),
    integer("startYear"),
    integer("endYear"),
    integer("budget"),
    integer("grossWorldwide"),
    integer("runtimeMinutes"),
    ScalarColumn {
        name: "averageRating",
        kind: ScalarKind::Real,
    },
    integer("numVotes"),
    integer("totalSeasons"),
    integer("totalEpisodes"),
];

/// Columns whose cells are sequences of scalar strings.
pub const LIST_COLUMNS: &[&str] = &[
    "interests",
    "countriesOfOrigin",
    "spokenLanguages",
    "filmingLocations",
    "genres",
];

/// Columns whose cells are sequences of structured entities (person or
/// company credits).
pub const STRUCT_COLUMNS: &[&str] = &["directors", "writers", "cast", "productionCompanies"];

/// The one structured column whose bridge rows carry per-occurrence edge
/// attributes: the same cast member can appear twice with different
/// characters, and that belongs to the edge, not the person.
pub const EDGE_ATTRIBUTE_COLUMN: &str = "cast";

/// Edge attributes split out of `cast` entities before dimension dedup.
pub const EDGE_ATTRIBUTES: &[&str] = &["characters", "job"];

/// Ordered key preference for resolving a display name out of a structured
/// entity; the first key with a non-empty value wins.
pub const DISPLAY_NAME_KEYS: &[&str] = &["name", "fullName", "title"];

/// All columns the upstream fetch must provide, in output order.
#[must_use]
pub fn required_columns() -> Vec<&'static str> {
    let mut columns = vec![ID_COLUMN];
    columns.extend(SCALAR_COLUMNS.iter().map(|c| c.name));
    columns.extend(LIST_COLUMNS.iter().copied());
    columns.extend(STRUCT_COLUMNS.iter().copied());
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_columns_cover_every_class() {
        let columns = required_columns();
        assert!(columns.contains(&"id"));
        assert!(columns.contains(&"averageRating"));
        assert!(columns.contains(&"genres"));
        assert!(columns.contains(&"cast"));
        assert_eq!(
            columns.len(),
            1 + SCALAR_COLUMNS.len() + LIST_COLUMNS.len() + STRUCT_COLUMNS.len()
        );
    }

    #[test]
    fn edge_attribute_column_is_a_struct_column() {
        assert!(STRUCT_COLUMNS.contains(&EDGE_ATTRIBUTE_COLUMN));
    }
}
