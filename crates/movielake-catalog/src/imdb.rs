//! Client for the RapidAPI-hosted IMDb metadata API.
//!
//! Two endpoints matter to the pipeline: `GET {base}/{id}` returns the full
//! nested title record, and `GET {base}/{id}/tmdb-id` maps an IMDb id to
//! its TMDB counterpart.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::error::CatalogError;

/// Client for the IMDb metadata API.
///
/// `base_url` comes from configuration; tests pass a wiremock URI.
pub struct ImdbClient {
    client: Client,
    base_url: Url,
}

impl ImdbClient {
    /// Creates a client sending the RapidAPI host/key headers on every
    /// request. `base_url` is configurable so tests can point at a mock
    /// server.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidBaseUrl`] if `base_url` does not
    /// parse, or [`CatalogError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        api_host: &str,
        base_url: &str,
        timeout_secs: u64,
    ) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-rapidapi-host",
            HeaderValue::from_str(api_host)
                .map_err(|_| CatalogError::InvalidBaseUrl(format!("bad api host: {api_host}")))?,
        );
        headers.insert(
            "x-rapidapi-key",
            HeaderValue::from_str(api_key)
                .map_err(|_| CatalogError::InvalidBaseUrl("unusable api key".to_owned()))?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .default_headers(headers)
            .user_agent("movielake/0.1 (catalog-ingest)")
            .build()?;

        // Ensure exactly one trailing slash so Url::join appends path
        // segments instead of replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| CatalogError::InvalidBaseUrl(format!("{base_url}: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Fetches the full nested title record for one content id.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] on HTTP 404 (terminal, never retried).
    /// - [`CatalogError::UnexpectedStatus`] on other non-2xx statuses.
    /// - [`CatalogError::Http`] on network failure.
    /// - [`CatalogError::Deserialize`] if the body is not valid JSON.
    pub async fn get_title(&self, content_id: &str) -> Result<Value, CatalogError> {
        let url = self.join(content_id)?;
        self.request_json(url, content_id).await
    }

    /// Resolves the TMDB id for one content id. An upstream record without
    /// a usable `tmdbId` field resolves to `None` — that is data, not an
    /// error, and the caller drops the id from the popularity run.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ImdbClient::get_title`].
    pub async fn get_tmdb_id(&self, content_id: &str) -> Result<Option<String>, CatalogError> {
        let url = self.join(&format!("{content_id}/tmdb-id"))?;
        let body = self.request_json(url, content_id).await?;
        // tmdbId arrives as a number or a string depending on the title.
        let tmdb_id = match body.get("tmdbId") {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_owned()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        Ok(tmdb_id)
    }

    fn join(&self, path: &str) -> Result<Url, CatalogError> {
        self.base_url
            .join(path)
            .map_err(|e| CatalogError::InvalidBaseUrl(format!("{path}: {e}")))
    }

    async fn request_json(&self, url: Url, content_id: &str) -> Result<Value, CatalogError> {
        let response = self.client.get(url.clone()).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => return Err(CatalogError::NotFound(content_id.to_owned())),
            status if !status.is_success() => {
                return Err(CatalogError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                })
            }
            _ => {}
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| CatalogError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}
