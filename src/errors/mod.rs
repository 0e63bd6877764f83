use thiserror::Error;

/// Failures the report pipeline cannot recover from locally.
///
/// Transient service errors never surface here: the gateway logs them and
/// returns an absent payload so the report degrades field by field.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service rejected the credential. Retrying cannot succeed.
    #[error("the statistics service rejected the api key (HTTP 401), check your credentials")]
    InvalidKey,
    /// The cache storage failed, which is distinct from a cache miss.
    #[error("cache storage failure: {0:#}")]
    Cache(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Cache(err)
    }
}

/// Add context to fetch errors
pub fn fetch_context(url: &str) -> String {
    format!("Failed to fetch from: {}", url)
}

/// Add context to parse errors
pub fn parse_context(data_type: &str) -> String {
    format!("Failed to parse {}", data_type)
}

/// Add context to cache errors
pub fn cache_context(operation: &str, key: &str) -> String {
    format!("Failed to {} cache entry for key: {}", operation, key)
}
