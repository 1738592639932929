use std::fs;
use std::path::{Path, PathBuf};

use crate::core::errors::Result;
use crate::core::models::authorized_keys::AuthorizedKeys;
use crate::core::traits::key_store::KeyStore;

/// Mode sshd requires on `~/.ssh` under `StrictModes`.
const SSH_DIR_MODE: u32 = 0o700;
/// Mode sshd requires on `authorized_keys` under `StrictModes`.
const KEYS_FILE_MODE: u32 = 0o600;

/// Key store backed by an OpenSSH `authorized_keys` file.
///
/// Format: one key per line, `#` comments and blank lines allowed.
/// Lines are written back exactly as read.
///
/// Example:
/// ```text
/// # ops team
/// ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIHk7 alice@laptop
/// ssh-rsa AAAAB3NzaC1yc2EAAAADAQABAAABAQC9 bob@desktop
/// ```
#[derive(Clone)]
pub struct AuthorizedKeysFile {
    path: PathBuf,
}

impl AuthorizedKeysFile {
    /// Create a key store backed by the given file path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    /// Create the parent directory as 0700. An existing directory is only
    /// tightened when it is an `.ssh` directory.
    fn ensure_parent_dir(&self) -> Result<()> {
        let dir = self.parent_dir();
        if !dir.exists() {
            fs::create_dir_all(dir)?;
            return set_mode(dir, SSH_DIR_MODE);
        }
        if dir.file_name().is_some_and(|n| n == ".ssh") {
            set_mode(dir, SSH_DIR_MODE)?;
        }
        Ok(())
    }
}

fn set_mode(path: &Path, mode: u32) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = (path, mode);
    Ok(())
}

impl KeyStore for AuthorizedKeysFile {
    fn load(&self) -> Result<AuthorizedKeys> {
        if !self.path.exists() {
            return Ok(AuthorizedKeys::default());
        }

        let content = fs::read_to_string(&self.path)?;
        Ok(AuthorizedKeys::parse(&content))
    }

    fn save(&self, keys: &AuthorizedKeys) -> Result<()> {
        self.ensure_parent_dir()?;

        // Write beside the target and rename so sshd never reads a half-written file.
        let mut tmp = tempfile::NamedTempFile::new_in(self.parent_dir())?;
        std::io::Write::write_all(&mut tmp, keys.render().as_bytes())?;
        set_mode(tmp.path(), KEYS_FILE_MODE)?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn ensure_permissions(&self) -> Result<()> {
        self.ensure_parent_dir()?;
        if !self.path.exists() {
            fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&self.path)?;
        }
        set_mode(&self.path, KEYS_FILE_MODE)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
