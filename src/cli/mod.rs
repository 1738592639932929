pub mod commands;
pub mod context;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Bootstrap a fresh Linux host: admin user, SSH keys from a URL, hardened sshd.
#[derive(Parser, Debug)]
#[command(name = "sshboot", version, about, long_about = None)]
pub struct Cli {
    /// What to do (default: run)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to a TOML config file (default: /etc/sshboot/config.toml if present)
    #[arg(long, global = true, env = "SSHBOOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Account to create and install keys for
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// URL of the public key list
    #[arg(long, global = true)]
    pub key_url: Option<String>,

    /// Download tool: auto, curl, wget or http
    #[arg(long, global = true)]
    pub fetcher: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Full bootstrap: user, keys, sshd hardening, restart
    Run,

    /// Create the user and install keys only
    Keys,

    /// Back up and harden sshd_config, lock root, restart sshd
    Harden,

    /// Show the URLs that would be tried for the key list
    Sources {
        /// Also try each URL and report which ones answer
        #[arg(long)]
        probe: bool,
    },

    /// Merge a local key list into an authorized_keys file
    Merge {
        /// File with one public key per line
        keys_file: PathBuf,
        /// authorized_keys file to update (created if missing)
        target: PathBuf,
    },
}
