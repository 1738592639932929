use std::path::Path;

use crate::core::errors::Result;

/// Port for local user account management.
pub trait AccountManager: Send + Sync {
    fn user_exists(&self, user: &str) -> Result<bool>;

    /// Create `user` with a home directory and the given login shell.
    fn create_user(&self, user: &str, shell: &str) -> Result<()>;

    /// Interactively set the password of `user`. Blocks on the terminal.
    fn set_password(&self, user: &str) -> Result<()>;

    fn is_in_group(&self, user: &str, group: &str) -> Result<bool>;

    /// Add `user` to the supplementary `group`, keeping existing groups.
    fn add_to_group(&self, user: &str, group: &str) -> Result<()>;

    /// Disable password login for `user`.
    fn lock_password(&self, user: &str) -> Result<()>;

    /// Give ownership of `path` to `user` and its login group.
    fn set_owner(&self, path: &Path, user: &str) -> Result<()>;
}
