use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::errors::{BootstrapError, Result};
use crate::core::services::sshd_hardener::DEFAULT_DIRECTIVES;

/// Location read when `--config` is not given. Optional.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/sshboot/config.toml";

pub const DEFAULT_USER: &str = "admin";
pub const DEFAULT_SHELL: &str = "/bin/bash";
pub const DEFAULT_ADMIN_GROUP: &str = "sudo";
pub const DEFAULT_HOME_ROOT: &str = "/home";
pub const DEFAULT_KEY_URL: &str =
    "https://github.com/sshboot/keys/blob/main/authorized_keys";
pub const DEFAULT_SSHD_CONFIG: &str = "/etc/ssh/sshd_config";
pub const DEFAULT_BACKUP_ROOT: &str = "/root";

/// Top-level sshboot configuration.
///
/// Every section and field is optional; the built-in constants above
/// describe a complete bootstrap on their own.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub user: UserSection,
    pub keys: KeysSection,
    pub fetch: FetchSection,
    pub sshd: SshdSection,
}

impl AppConfig {
    /// Load the configuration.
    ///
    /// An explicit path must exist. Without one, `/etc/sshboot/config.toml`
    /// is used when present and the built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => {
                if !p.exists() {
                    return Err(BootstrapError::InvalidConfig {
                        detail: format!("config file {} not found", p.display()),
                    });
                }
                p.to_path_buf()
            }
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = std::fs::read_to_string(&path)?;
        Self::parse(&content).map_err(|e| match e {
            BootstrapError::InvalidConfig { detail } => BootstrapError::InvalidConfig {
                detail: format!("{}: {detail}", path.display()),
            },
            other => other,
        })
    }

    /// Parse and validate TOML content.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| BootstrapError::InvalidConfig {
            detail: format!("failed to parse TOML: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would be unsafe to hand to system utilities.
    pub fn validate(&self) -> Result<()> {
        crate::cli::context::validate_username(&self.user.name)?;
        crate::cli::context::validate_group(&self.user.admin_group)?;
        crate::cli::context::validate_key_url(&self.keys.url)?;

        for (name, value) in &self.sshd.directives {
            if name.is_empty() || name.contains(char::is_whitespace) || name.starts_with('#') {
                return Err(BootstrapError::InvalidConfig {
                    detail: format!("invalid sshd directive name '{name}'"),
                });
            }
            if value.trim().is_empty() || value.contains('\n') {
                return Err(BootstrapError::InvalidConfig {
                    detail: format!("invalid value for sshd directive {name}"),
                });
            }
        }

        if self.sshd.services.is_empty() {
            return Err(BootstrapError::InvalidConfig {
                detail: "sshd.services must name at least one unit".into(),
            });
        }
        Ok(())
    }

    /// `<home_root>/<user>`.
    pub fn home_dir(&self) -> PathBuf {
        Path::new(&self.user.home_root).join(&self.user.name)
    }

    /// `<home>/.ssh`.
    pub fn ssh_dir(&self) -> PathBuf {
        self.home_dir().join(".ssh")
    }

    /// `<home>/.ssh/authorized_keys`.
    pub fn authorized_keys_path(&self) -> PathBuf {
        self.ssh_dir().join("authorized_keys")
    }
}

/// The `[user]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserSection {
    pub name: String,
    pub shell: String,
    pub admin_group: String,
    pub home_root: String,
    /// Run `passwd` interactively after creating the user.
    pub prompt_password: bool,
}

impl Default for UserSection {
    fn default() -> Self {
        Self {
            name: DEFAULT_USER.into(),
            shell: DEFAULT_SHELL.into(),
            admin_group: DEFAULT_ADMIN_GROUP.into(),
            home_root: DEFAULT_HOME_ROOT.into(),
            prompt_password: true,
        }
    }
}

/// The `[keys]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeysSection {
    pub url: String,
}

impl Default for KeysSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_KEY_URL.into(),
        }
    }
}

/// The `[fetch]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchSection {
    /// One of `auto`, `curl`, `wget`, `http`.
    pub tool: String,
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            tool: "auto".into(),
        }
    }
}

/// The `[sshd]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SshdSection {
    pub config_path: String,
    pub backup_root: String,
    /// Units tried in order when restarting the daemon.
    pub services: Vec<String>,
    pub lock_root_password: bool,
    /// Ordered `[name, value]` pairs applied to `config_path`.
    pub directives: Vec<(String, String)>,
}

impl Default for SshdSection {
    fn default() -> Self {
        Self {
            config_path: DEFAULT_SSHD_CONFIG.into(),
            backup_root: DEFAULT_BACKUP_ROOT.into(),
            services: vec!["ssh.service".into(), "sshd.service".into()],
            lock_root_password: true,
            directives: DEFAULT_DIRECTIVES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.user.name, DEFAULT_USER);
        assert_eq!(config.keys.url, DEFAULT_KEY_URL);
        assert_eq!(config.sshd.directives.len(), 5);
        assert_eq!(
            config.authorized_keys_path(),
            PathBuf::from("/home/admin/.ssh/authorized_keys")
        );
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::parse(
            r#"
[user]
name = "deploy"
admin_group = "wheel"

[sshd]
directives = [["PermitRootLogin", "no"], ["X11Forwarding", "no"]]
"#,
        )
        .unwrap();

        assert_eq!(config.user.name, "deploy");
        assert_eq!(config.user.shell, DEFAULT_SHELL);
        assert_eq!(config.user.admin_group, "wheel");
        assert_eq!(config.sshd.config_path, DEFAULT_SSHD_CONFIG);
        assert_eq!(
            config.sshd.directives[1],
            ("X11Forwarding".to_string(), "no".to_string())
        );
    }

    #[test]
    fn unknown_field_is_rejected() {
        let result = AppConfig::parse("[user]\nnmae = \"x\"\n");
        assert!(matches!(result, Err(BootstrapError::InvalidConfig { .. })));
    }

    #[test]
    fn bad_username_is_rejected() {
        let result = AppConfig::parse("[user]\nname = \"root; rm -rf /\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn non_http_url_is_rejected() {
        let result = AppConfig::parse("[keys]\nurl = \"file:///etc/passwd\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn directive_name_with_space_is_rejected() {
        let result = AppConfig::parse("[sshd]\ndirectives = [[\"Permit Root\", \"no\"]]\n");
        assert!(result.is_err());
    }

    #[test]
    fn explicit_missing_path_fails() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/sshboot.toml")));
        assert!(matches!(result, Err(BootstrapError::InvalidConfig { .. })));
    }

    #[test]
    fn load_reads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[keys]\nurl = \"https://keys.example.com/a.pub\"\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.keys.url, "https://keys.example.com/a.pub");
    }
}
