pub mod command_fetcher;
pub mod http_fetcher;

use crate::core::errors::{BootstrapError, Result};
use crate::core::traits::fetcher::KeyFetcher;

use command_fetcher::{CommandFetcher, DownloadTool};
use http_fetcher::HttpFetcher;

/// Build the fetcher named by `tool` (`auto`, `curl`, `wget` or `http`).
///
/// `auto` prefers curl, then wget, and fails with `ToolMissing` when
/// neither is installed.
pub fn select(tool: &str) -> Result<Box<dyn KeyFetcher>> {
    match tool {
        "auto" => Ok(Box::new(CommandFetcher::detect()?)),
        "curl" => Ok(Box::new(CommandFetcher::require(DownloadTool::Curl)?)),
        "wget" => Ok(Box::new(CommandFetcher::require(DownloadTool::Wget)?)),
        "http" => Ok(Box::new(HttpFetcher::new())),
        other => Err(BootstrapError::InvalidConfig {
            detail: format!("unknown fetch tool '{other}' (expected auto, curl, wget or http)"),
        }),
    }
}
