use std::path::{Path, PathBuf};

use crate::core::errors::Result;

/// Port for editing the SSH daemon configuration in place.
pub trait ConfigPatcher: Send + Sync {
    /// Copy the current config into a fresh timestamped directory under
    /// `backup_root` and return the path of the copy.
    fn backup(&self, backup_root: &Path) -> Result<PathBuf>;

    /// Upsert each `(option, value)` pair. Re-applying is a no-op.
    fn apply(&self, directives: &[(String, String)]) -> Result<()>;
}
