use crate::adapters::fetch;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::{BootstrapError, Result};
use crate::core::models::authorized_keys::AuthorizedKeys;
use crate::core::services::key_merger::KeyMerger;
use crate::core::services::source_resolver;

/// Execute `sshboot sources`.
///
/// Lists the candidate URLs in the order a bootstrap tries them. With
/// `--probe`, fetches each one and reports how many keys it serves.
pub fn execute(config: &AppConfig, probe: bool) -> Result<()> {
    let urls = source_resolver::candidate_urls(&config.keys.url);

    output::header("Key sources");
    for (i, url) in urls.iter().enumerate() {
        output::item(&format!("{}. {url}", i + 1));
    }

    if !probe {
        return Ok(());
    }

    let fetcher = fetch::select(&config.fetch.tool)?;
    output::header(&format!("Probing with {}", fetcher.name()));

    let mut reachable = 0;
    let mut failures = Vec::new();
    for url in &urls {
        let sp = output::spinner(&format!("GET {url}"));
        match fetcher.fetch(url) {
            Ok(body) => {
                reachable += 1;
                let outcome = KeyMerger.merge(&body, AuthorizedKeys::default());
                output::finish_spinner(
                    sp,
                    &format!(
                        "{url}: {} key(s), {} rejected line(s)",
                        outcome.added.len(),
                        outcome.rejected
                    ),
                );
            }
            Err(e) => {
                sp.finish_and_clear();
                let reason = e.to_string();
                let reason = reason.lines().next().unwrap_or_default().to_string();
                output::failure(&format!("{url}: {reason}"));
                failures.push(format!("    → {url}: {reason}"));
            }
        }
    }

    if reachable == 0 {
        return Err(BootstrapError::FetchFailed {
            attempts: failures.join("\n"),
        });
    }
    Ok(())
}
