//! HTTP clients for the two catalog APIs and the paced batch-fetch layer.
//!
//! The IMDb-style metadata API (RapidAPI-hosted) supplies full title records
//! and the IMDb→TMDB identifier mapping; TMDB supplies the popularity
//! metric. Both clients sit behind [`fetch_batches`], which applies bounded
//! per-item retry and randomized inter-batch pacing, and degrades failures
//! to absent entries instead of aborting the batch.

mod batch;
mod error;
mod imdb;
mod retry;
mod tmdb;

pub use batch::{fetch_batches, BatchConfig};
pub use error::CatalogError;
pub use imdb::ImdbClient;
pub use tmdb::TmdbClient;
