use std::path::Path;

use crate::adapters::key_stores::authorized_keys_file::AuthorizedKeysFile;
use crate::cli::commands::report_helpers;
use crate::cli::output;
use crate::core::errors::{BootstrapError, Result};
use crate::core::models::provision_report::KeysReport;
use crate::core::services::key_merger::KeyMerger;
use crate::core::traits::key_store::KeyStore;

/// Execute `sshboot merge <keys-file> <target>`.
///
/// Offline merge of a local key list into any authorized_keys file. No
/// account changes and no ownership changes, so it needs no root.
pub fn execute(keys_file: &Path, target: &Path) -> Result<()> {
    if !keys_file.exists() {
        return Err(BootstrapError::FileNotFound {
            path: keys_file.to_path_buf(),
        });
    }
    let fetched = std::fs::read_to_string(keys_file)?;

    output::header(&format!("Merging {}", keys_file.display()));

    let store = AuthorizedKeysFile::new(target.to_path_buf());
    let outcome = KeyMerger.merge(&fetched, store.load()?);
    if outcome.any_added() {
        store.save(&outcome.store)?;
    }
    output::detail(&format!(
        "{} now holds {} key(s)",
        target.display(),
        outcome.store.keys().count()
    ));

    report_helpers::print_keys(&KeysReport {
        source_url: keys_file.display().to_string(),
        added: outcome.added,
        already_present: outcome.already_present,
        rejected: outcome.rejected,
        store_path: target.to_path_buf(),
        ..KeysReport::default()
    });

    Ok(())
}
