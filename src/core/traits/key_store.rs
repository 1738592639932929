use std::path::Path;

use crate::core::errors::Result;
use crate::core::models::authorized_keys::AuthorizedKeys;

/// Port for reading and persisting an `authorized_keys` file.
pub trait KeyStore: Send + Sync {
    /// Read the current entries. A missing file is an empty store.
    fn load(&self) -> Result<AuthorizedKeys>;

    /// Write the entries back with the restricted permissions sshd expects.
    fn save(&self, keys: &AuthorizedKeys) -> Result<()>;

    /// Create the store if it is missing and tighten the modes of the
    /// file and its directory, without touching the contents.
    fn ensure_permissions(&self) -> Result<()>;

    /// Location of the backing file.
    fn path(&self) -> &Path;
}
