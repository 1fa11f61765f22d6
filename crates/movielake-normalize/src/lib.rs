//! Normalization engine for the movielake star schema.
//!
//! Takes a batch of raw catalog records (nested JSON) and deterministically
//! decomposes them into dimension tables with run-scoped surrogate keys,
//! content→dimension bridge tables, one wide content dimension, and an
//! append-only popularity fact. Pure and synchronous; fetching and
//! persistence live in the catalog and db crates.

mod content;
mod error;
mod list_fields;
mod popularity;
mod record;
pub mod schema;
mod struct_fields;
mod tables;
mod value;

pub use content::{build_content_dimension, ContentDimensionRow};
pub use error::NormalizeError;
pub use list_fields::{normalize_list, BridgeRow, ValueDimRow};
pub use popularity::{
    build_popularity_facts, dense_rank_desc, parse_metric, PopularityFactRow, PopularitySample,
};
pub use record::{ensure_required_columns, ContentRecord};
pub use struct_fields::{normalize_struct, StructBridgeRow, StructDimRow, StructDimension};
pub use tables::{
    bridge_table, content_dimension_table, list_dimension_table, popularity_fact_table,
    struct_bridge_table, struct_dimension_table,
};
pub use value::coerce;
