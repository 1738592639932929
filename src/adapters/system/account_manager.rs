use std::ffi::OsStr;
use std::path::Path;

use crate::adapters::system::command;
use crate::core::errors::Result;
use crate::core::traits::account::AccountManager;

/// Account management through the shadow-utils binaries
/// (`id`, `useradd`, `usermod`, `passwd`, `chown`).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAccountManager;

impl SystemAccountManager {
    pub fn new() -> Self {
        Self
    }
}

/// Parse the output of `id -nG <user>`.
fn parse_groups(stdout: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(stdout)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

impl AccountManager for SystemAccountManager {
    fn user_exists(&self, user: &str) -> Result<bool> {
        Ok(command::succeeds("id", &["-u", user]))
    }

    fn create_user(&self, user: &str, shell: &str) -> Result<()> {
        command::run("useradd", &["-m", "-s", shell, user])?;
        Ok(())
    }

    fn set_password(&self, user: &str) -> Result<()> {
        command::run_interactive("passwd", &[user])
    }

    fn is_in_group(&self, user: &str, group: &str) -> Result<bool> {
        let output = command::run("id", &["-nG", user])?;
        Ok(parse_groups(&output.stdout).iter().any(|g| g == group))
    }

    fn add_to_group(&self, user: &str, group: &str) -> Result<()> {
        command::run("usermod", &["-aG", group, user])?;
        Ok(())
    }

    fn lock_password(&self, user: &str) -> Result<()> {
        command::run("passwd", &["-l", user])?;
        Ok(())
    }

    fn set_owner(&self, path: &Path, user: &str) -> Result<()> {
        // `user:` means the user's login group.
        let owner = format!("{user}:");
        command::run("chown", &[OsStr::new(&owner), path.as_os_str()])?;
        Ok(())
    }
}
