use crate::adapters::system::command;
use crate::core::errors::{BootstrapError, Result};

/// Effective uid of this process, as reported by `id -u`.
pub fn effective_uid() -> Result<u32> {
    let output = command::run("id", &["-u"])?;
    let text = String::from_utf8_lossy(&output.stdout);
    text.trim()
        .parse()
        .map_err(|_| BootstrapError::CommandFailed {
            program: "id -u".into(),
            detail: format!("unexpected output '{}'", text.trim()),
        })
}

/// Fail with `PrivilegeRequired` unless running as root.
pub fn ensure_root() -> Result<()> {
    if effective_uid()? != 0 {
        return Err(BootstrapError::PrivilegeRequired);
    }
    Ok(())
}
