#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,
    pub imdb_api_key: String,
    pub imdb_api_host: String,
    pub imdb_base_url: String,
    /// Required only by the popularity run; the content run never reads it.
    pub tmdb_api_token: Option<String>,
    pub tmdb_base_url: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
    pub content_batch_size: usize,
    pub popularity_batch_size: usize,
    pub fetch_max_retries: u32,
    pub fetch_backoff_base_ms: u64,
    pub batch_pause_min_ms: u64,
    pub batch_pause_max_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("imdb_api_key", &"[redacted]")
            .field("imdb_api_host", &self.imdb_api_host)
            .field("imdb_base_url", &self.imdb_base_url)
            .field(
                "tmdb_api_token",
                &self.tmdb_api_token.as_ref().map(|_| "[redacted]"),
            )
            .field("tmdb_base_url", &self.tmdb_base_url)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("content_batch_size", &self.content_batch_size)
            .field("popularity_batch_size", &self.popularity_batch_size)
            .field("fetch_max_retries", &self.fetch_max_retries)
            .field("fetch_backoff_base_ms", &self.fetch_backoff_base_ms)
            .field("batch_pause_min_ms", &self.batch_pause_min_ms)
            .field("batch_pause_max_ms", &self.batch_pause_max_ms)
            .finish()
    }
}
