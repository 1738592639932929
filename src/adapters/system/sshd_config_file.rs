use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::core::errors::{BootstrapError, Result};
use crate::core::services::sshd_hardener;
use crate::core::traits::config_patcher::ConfigPatcher;

/// Prefix of backup directories created under the backup root.
const BACKUP_PREFIX: &str = "sshboot-backup-";

/// Patches an `sshd_config` file in place.
pub struct SshdConfigFile {
    path: PathBuf,
}

impl SshdConfigFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn ensure_exists(&self) -> Result<()> {
        if !self.path.exists() {
            return Err(BootstrapError::FileNotFound {
                path: self.path.clone(),
            });
        }
        Ok(())
    }

    fn read(&self) -> Result<String> {
        self.ensure_exists()?;
        Ok(fs::read_to_string(&self.path)?)
    }
}

/// Pick `<root>/sshboot-backup-<stamp>`, suffixed with a counter if a run
/// in the same second already used it.
fn backup_dir(root: &Path, stamp: &str) -> PathBuf {
    let base = root.join(format!("{BACKUP_PREFIX}{stamp}"));
    if !base.exists() {
        return base;
    }
    (1..)
        .map(|n| root.join(format!("{BACKUP_PREFIX}{stamp}-{n}")))
        .find(|p| !p.exists())
        .unwrap_or(base)
}

impl ConfigPatcher for SshdConfigFile {
    fn backup(&self, backup_root: &Path) -> Result<PathBuf> {
        self.ensure_exists()?;

        let stamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
        let dir = backup_dir(backup_root, &stamp);
        fs::create_dir_all(&dir)?;

        let file_name = self
            .path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("sshd_config"));
        let target = dir.join(file_name);
        fs::copy(&self.path, &target)?;
        Ok(target)
    }

    fn apply(&self, directives: &[(String, String)]) -> Result<()> {
        let current = self.read()?;
        let patched = sshd_hardener::apply_all(&current, directives);
        if patched != current {
            fs::write(&self.path, patched)?;
        }
        Ok(())
    }
}
