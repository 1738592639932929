use std::path::PathBuf;

/// All domain errors for sshboot.
///
/// Each variant provides enough context to diagnose the issue
/// without needing a debugger.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(
        "This command must be run as root\n\n  \
         sshboot creates users, writes into /home and /etc/ssh and restarts sshd.\n  \
         Re-run it with elevated privileges: sudo sshboot"
    )]
    PrivilegeRequired,

    #[error(
        "No download tool found: {tool}\n\n  \
         Solutions:\n    \
         → Install curl or wget with the system package manager\n    \
         → Or use the built-in client: sshboot --fetcher http"
    )]
    ToolMissing { tool: String },

    #[error(
        "Could not fetch SSH keys, every source failed:\n{attempts}\n\n  \
         The key store was not modified.\n  \
         Check the key URL and the network, then run sshboot again."
    )]
    FetchFailed { attempts: String },

    #[error("Command '{program}' failed: {detail}")]
    CommandFailed { program: String, detail: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(
        "Invalid configuration: {detail}\n\n  \
         Check the file passed with --config or /etc/sshboot/config.toml."
    )]
    InvalidConfig { detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BootstrapError>;
