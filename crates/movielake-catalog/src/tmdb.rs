//! Client for the TMDB API, used only to read the popularity metric.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::error::CatalogError;

pub struct TmdbClient {
    client: Client,
    base_url: Url,
}

impl TmdbClient {
    /// Creates a bearer-token client for the TMDB v3 API.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidBaseUrl`] if `base_url` does not
    /// parse, or [`CatalogError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_token: &str, base_url: &str, timeout_secs: u64) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_token}"))
                .map_err(|_| CatalogError::InvalidBaseUrl("unusable api token".to_owned()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .default_headers(headers)
            .user_agent("movielake/0.1 (catalog-ingest)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| CatalogError::InvalidBaseUrl(format!("{base_url}: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Fetches a TMDB movie record and returns its raw `popularity` field
    /// (`Null` when the record has none). Sentinel filtering is left to the
    /// normalization core so all metric rules live in one place.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] on HTTP 404.
    /// - [`CatalogError::UnexpectedStatus`] on other non-2xx statuses.
    /// - [`CatalogError::Http`] on network failure.
    /// - [`CatalogError::Deserialize`] if the body is not valid JSON.
    pub async fn get_popularity(&self, tmdb_id: &str) -> Result<Value, CatalogError> {
        let url = self
            .base_url
            .join(&format!("movie/{tmdb_id}"))
            .map_err(|e| CatalogError::InvalidBaseUrl(format!("{tmdb_id}: {e}")))?;

        let response = self.client.get(url.clone()).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => return Err(CatalogError::NotFound(tmdb_id.to_owned())),
            status if !status.is_success() => {
                return Err(CatalogError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                })
            }
            _ => {}
        }

        let body = response.text().await?;
        let json: Value = serde_json::from_str(&body).map_err(|e| CatalogError::Deserialize {
            context: url.to_string(),
            source: e,
        })?;
        Ok(json.get("popularity").cloned().unwrap_or(Value::Null))
    }
}
