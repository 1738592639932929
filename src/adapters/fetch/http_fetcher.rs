use std::time::Duration;

use crate::core::errors::{BootstrapError, Result};
use crate::core::traits::fetcher::KeyFetcher;

/// Timeout for a single key download.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

fn fetch_error(url: &str, detail: String) -> BootstrapError {
    BootstrapError::CommandFailed {
        program: format!("GET {url}"),
        detail,
    }
}

/// Downloads keys with the built-in HTTP client, for hosts without curl or wget.
pub struct HttpFetcher {
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            timeout: FETCH_TIMEOUT,
        }
    }

    fn build_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(format!("sshboot/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| fetch_error("", format!("failed to create HTTP client: {e}")))
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| fetch_error(url, format!("failed to create async runtime: {e}")))?;

        rt.block_on(async {
            let client = self.build_client()?;
            let resp = client
                .get(url)
                .send()
                .await
                .map_err(|e| fetch_error(url, format!("request failed: {e}")))?;

            if !resp.status().is_success() {
                return Err(fetch_error(url, format!("server returned {}", resp.status())));
            }

            resp.text()
                .await
                .map_err(|e| fetch_error(url, format!("failed to read body: {e}")))
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}
