use crate::core::errors::Result;

/// Port for downloading a key list over HTTP(S).
///
/// Implementations live in `adapters::fetch` (curl, wget, built-in client).
pub trait KeyFetcher: Send + Sync {
    /// Fetch `url` and return the body as text. Any non-success status is an error.
    fn fetch(&self, url: &str) -> Result<String>;

    /// Human-readable name of this fetcher (e.g. "curl", "http").
    fn name(&self) -> &str;
}
