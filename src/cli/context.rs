use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

use crate::adapters::fetch;
use crate::adapters::fetch::http_fetcher::HttpFetcher;
use crate::adapters::key_stores::authorized_keys_file::AuthorizedKeysFile;
use crate::adapters::system::account_manager::SystemAccountManager;
use crate::adapters::system::service_controller::SystemServiceController;
use crate::adapters::system::sshd_config_file::SshdConfigFile;
use crate::cli::Cli;
use crate::config::app_config::AppConfig;
use crate::core::errors::{BootstrapError, Result};
use crate::core::services::provisioner::{Collaborators, Provisioner};
use crate::core::traits::fetcher::KeyFetcher;

/// Maximum length `useradd` accepts for a login name.
const MAX_NAME_LEN: usize = 32;

fn account_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z_][a-z0-9_-]*$").expect("valid regex"))
}

fn validate_account_name(name: &str, what: &str) -> Result<()> {
    if name.len() > MAX_NAME_LEN || !account_name().is_match(name) {
        return Err(BootstrapError::InvalidConfig {
            detail: format!(
                "invalid {what} '{name}': use lowercase letters, digits, '_' or '-', \
                 starting with a letter or '_' (max {MAX_NAME_LEN} chars)"
            ),
        });
    }
    Ok(())
}

/// Validate a login name before it reaches `useradd`.
pub fn validate_username(name: &str) -> Result<()> {
    validate_account_name(name, "user name")
}

/// Validate a group name before it reaches `usermod`.
pub fn validate_group(name: &str) -> Result<()> {
    validate_account_name(name, "group name")
}

/// Only http(s) URLs without whitespace are accepted as key sources.
pub fn validate_key_url(url: &str) -> Result<()> {
    let ok = (url.starts_with("https://") || url.starts_with("http://"))
        && !url.contains(char::is_whitespace);
    if !ok {
        return Err(BootstrapError::InvalidConfig {
            detail: format!("key URL must be an http(s) URL, got '{url}'"),
        });
    }
    Ok(())
}

/// Load the config file and apply command-line overrides on top.
pub fn load_config(args: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(args.config.as_deref())?;

    if let Some(user) = &args.user {
        config.user.name = user.clone();
    }
    if let Some(url) = &args.key_url {
        config.keys.url = url.clone();
    }
    if let Some(tool) = &args.fetcher {
        config.fetch.tool = tool.clone();
    }

    config.validate()?;
    Ok(config)
}

/// The real system behind the provisioner's ports.
pub struct LiveSystem {
    accounts: SystemAccountManager,
    fetcher: Box<dyn KeyFetcher>,
    store: AuthorizedKeysFile,
    sshd: SshdConfigFile,
    service: SystemServiceController,
}

impl LiveSystem {
    /// Wire up adapters for `config`.
    ///
    /// The download tool is only resolved when `needs_fetcher` is set, so
    /// `harden` works on hosts without curl or wget.
    pub fn new(config: &AppConfig, needs_fetcher: bool) -> Result<Self> {
        let fetcher: Box<dyn KeyFetcher> = if needs_fetcher {
            fetch::select(&config.fetch.tool)?
        } else {
            Box::new(HttpFetcher::new())
        };

        Ok(Self {
            accounts: SystemAccountManager::new(),
            fetcher,
            store: AuthorizedKeysFile::new(config.authorized_keys_path()),
            sshd: SshdConfigFile::new(PathBuf::from(&config.sshd.config_path)),
            service: SystemServiceController::new(),
        })
    }

    pub fn fetcher_name(&self) -> &str {
        self.fetcher.name()
    }

    pub fn provisioner<'a>(&'a self, config: &'a AppConfig) -> Provisioner<'a> {
        Provisioner::new(
            config,
            Collaborators {
                accounts: &self.accounts,
                fetcher: self.fetcher.as_ref(),
                store: &self.store,
                sshd: &self.sshd,
                service: &self.service,
            },
        )
    }
}
