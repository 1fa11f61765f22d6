use thiserror::Error;

/// Errors returned by the catalog API clients.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned 404 for the requested identifier. Terminal: the
    /// title does not exist upstream and retrying cannot change that.
    #[error("not found: {0}")]
    NotFound(String),

    /// A non-2xx, non-404 HTTP status.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be parsed as JSON of the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL does not parse.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}
