use std::sync::OnceLock;

use regex::Regex;

use crate::core::errors::{BootstrapError, Result};
use crate::core::traits::fetcher::KeyFetcher;

/// A key list and the URL that served it.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedKeys {
    pub url: String,
    pub body: String,
}

fn github_blob() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^https?://github\.com/([^/]+)/([^/]+)/blob/(.+)$").expect("valid regex")
    })
}

/// Rewrite a code-host "blob view" URL into its raw-content form.
///
/// - `https://github.com/o/r/blob/main/keys` → `https://raw.githubusercontent.com/o/r/main/keys`
/// - `https://gitlab.example/o/r/-/blob/main/keys` → `https://gitlab.example/o/r/-/raw/main/keys`
pub fn raw_form(url: &str) -> Option<String> {
    if let Some(caps) = github_blob().captures(url) {
        return Some(format!(
            "https://raw.githubusercontent.com/{}/{}/{}",
            &caps[1], &caps[2], &caps[3]
        ));
    }
    if url.contains("/-/blob/") {
        return Some(url.replacen("/-/blob/", "/-/raw/", 1));
    }
    None
}

/// Append the `raw=true` query parameter code hosts understand.
pub fn with_raw_query(url: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}raw=true")
}

/// Ordered fetch candidates for `url`: raw rewrite, raw query, original.
///
/// Duplicates are dropped, keeping the first occurrence.
pub fn candidate_urls(url: &str) -> Vec<String> {
    let url = url.trim();
    let mut out: Vec<String> = Vec::with_capacity(3);
    let candidates = raw_form(url)
        .into_iter()
        .chain([with_raw_query(url), url.to_string()]);

    for candidate in candidates {
        if !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    out
}

/// Try each candidate in order and return the first successful body.
///
/// There is no retry within an attempt. When every attempt fails the
/// error lists each URL with its failure reason.
pub fn fetch_first(fetcher: &dyn KeyFetcher, urls: &[String]) -> Result<FetchedKeys> {
    let mut failures = Vec::with_capacity(urls.len());

    for url in urls {
        match fetcher.fetch(url) {
            Ok(body) => {
                return Ok(FetchedKeys {
                    url: url.clone(),
                    body,
                });
            }
            Err(e) => failures.push(format!("    → {url}: {}", first_line(&e.to_string()))),
        }
    }

    if failures.is_empty() {
        failures.push("    → no source URL configured".to_string());
    }

    Err(BootstrapError::FetchFailed {
        attempts: failures.join("\n"),
    })
}

fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or(s)
}
