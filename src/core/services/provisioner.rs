use std::path::Path;

use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::models::provision_report::{
    AccountReport, HardenReport, KeysReport, ProvisionReport,
};
use crate::core::services::key_merger::KeyMerger;
use crate::core::services::source_resolver::{self, FetchedKeys};
use crate::core::traits::account::AccountManager;
use crate::core::traits::config_patcher::ConfigPatcher;
use crate::core::traits::fetcher::KeyFetcher;
use crate::core::traits::key_store::KeyStore;
use crate::core::traits::service::ServiceController;

/// Collaborators a bootstrap run drives, in the order they are used.
pub struct Collaborators<'a> {
    pub accounts: &'a dyn AccountManager,
    pub fetcher: &'a dyn KeyFetcher,
    pub store: &'a dyn KeyStore,
    pub sshd: &'a dyn ConfigPatcher,
    pub service: &'a dyn ServiceController,
}

/// Runs the bootstrap sequence against a set of collaborators.
///
/// Every step checks before it acts, so a second run on the same host
/// only re-applies the sshd directives and restarts the daemon.
pub struct Provisioner<'a> {
    config: &'a AppConfig,
    deps: Collaborators<'a>,
}

impl<'a> Provisioner<'a> {
    pub fn new(config: &'a AppConfig, deps: Collaborators<'a>) -> Self {
        Self { config, deps }
    }

    /// Full bootstrap: account, keys, then sshd.
    pub fn run(&self) -> Result<ProvisionReport> {
        let keys = self.provision_keys()?;
        let harden = self.harden()?;
        Ok(ProvisionReport { keys, harden })
    }

    /// Ensure the account exists and its `authorized_keys` holds every
    /// key served by the configured URL.
    pub fn provision_keys(&self) -> Result<KeysReport> {
        let account = self.ensure_account()?;
        let mut report = self.install_keys()?;
        report.account = account;
        Ok(report)
    }

    /// Create the user when missing and put it in the admin group.
    pub fn ensure_account(&self) -> Result<AccountReport> {
        let user = &self.config.user;
        let accounts = self.deps.accounts;

        let user_created = if accounts.user_exists(&user.name)? {
            false
        } else {
            accounts.create_user(&user.name, &user.shell)?;
            if user.prompt_password {
                accounts.set_password(&user.name)?;
            }
            true
        };

        let group_added = if accounts.is_in_group(&user.name, &user.admin_group)? {
            false
        } else {
            accounts.add_to_group(&user.name, &user.admin_group)?;
            true
        };

        Ok(AccountReport {
            user_created,
            group_added,
        })
    }

    /// Fetch the key list and merge it into the user's key store.
    ///
    /// Keys are fetched before the key store is opened: a fetch failure
    /// leaves `~/.ssh` untouched. Otherwise the store exists afterwards
    /// with sshd's modes and the user as owner, even when nothing was added.
    pub fn install_keys(&self) -> Result<KeysReport> {
        let user = &self.config.user;
        let accounts = self.deps.accounts;

        let FetchedKeys { url, body } = self.fetch_keys()?;

        let existing = self.deps.store.load()?;
        let outcome = KeyMerger.merge(&body, existing);
        if outcome.any_added() {
            self.deps.store.save(&outcome.store)?;
        }
        self.deps.store.ensure_permissions()?;

        let store_path = self.deps.store.path().to_path_buf();
        if let Some(ssh_dir) = store_path.parent() {
            accounts.set_owner(ssh_dir, &user.name)?;
        }
        accounts.set_owner(&store_path, &user.name)?;

        Ok(KeysReport {
            account: AccountReport::default(),
            source_url: url,
            added: outcome.added,
            already_present: outcome.already_present,
            rejected: outcome.rejected,
            store_path,
        })
    }

    /// Try each candidate URL for the configured key source.
    pub fn fetch_keys(&self) -> Result<FetchedKeys> {
        let urls = source_resolver::candidate_urls(&self.config.keys.url);
        source_resolver::fetch_first(self.deps.fetcher, &urls)
    }

    /// Back up and patch sshd_config, lock root, restart the daemon.
    pub fn harden(&self) -> Result<HardenReport> {
        let sshd = &self.config.sshd;

        let backup_path = self.deps.sshd.backup(Path::new(&sshd.backup_root))?;
        self.deps.sshd.apply(&sshd.directives)?;

        if sshd.lock_root_password {
            self.deps.accounts.lock_password("root")?;
        }

        let restarted = self.deps.service.restart(&sshd.services)?;

        Ok(HardenReport {
            backup_path,
            directives: sshd.directives.clone(),
            root_locked: sshd.lock_root_password,
            restarted,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use super::*;
    use crate::adapters::key_stores::authorized_keys_file::AuthorizedKeysFile;
    use crate::core::errors::BootstrapError;

    const KEY: &str = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIHk7 user@host";

    /// Records every call so tests can assert on ordering.
    #[derive(Default)]
    struct Journal(Mutex<Vec<String>>);

    impl Journal {
        fn push(&self, entry: impl Into<String>) {
            self.0.lock().unwrap().push(entry.into());
        }

        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    struct FakeAccounts<'j> {
        journal: &'j Journal,
        users: Mutex<HashSet<String>>,
        groups: Mutex<HashSet<(String, String)>>,
    }

    impl<'j> FakeAccounts<'j> {
        fn new(journal: &'j Journal) -> Self {
            Self {
                journal,
                users: Mutex::new(HashSet::new()),
                groups: Mutex::new(HashSet::new()),
            }
        }
    }

    impl AccountManager for FakeAccounts<'_> {
        fn user_exists(&self, user: &str) -> Result<bool> {
            Ok(self.users.lock().unwrap().contains(user))
        }

        fn create_user(&self, user: &str, shell: &str) -> Result<()> {
            self.journal.push(format!("useradd {user} {shell}"));
            self.users.lock().unwrap().insert(user.to_string());
            Ok(())
        }

        fn set_password(&self, user: &str) -> Result<()> {
            self.journal.push(format!("passwd {user}"));
            Ok(())
        }

        fn is_in_group(&self, user: &str, group: &str) -> Result<bool> {
            Ok(self
                .groups
                .lock()
                .unwrap()
                .contains(&(user.to_string(), group.to_string())))
        }

        fn add_to_group(&self, user: &str, group: &str) -> Result<()> {
            self.journal.push(format!("usermod {user} {group}"));
            self.groups
                .lock()
                .unwrap()
                .insert((user.to_string(), group.to_string()));
            Ok(())
        }

        fn lock_password(&self, user: &str) -> Result<()> {
            self.journal.push(format!("lock {user}"));
            Ok(())
        }

        fn set_owner(&self, path: &Path, user: &str) -> Result<()> {
            let name = path.file_name().unwrap().to_string_lossy();
            self.journal.push(format!("chown {user} {name}"));
            Ok(())
        }
    }

    struct FakeFetcher<'j> {
        journal: &'j Journal,
        body: Option<String>,
    }

    impl KeyFetcher for FakeFetcher<'_> {
        fn fetch(&self, url: &str) -> Result<String> {
            self.journal.push(format!("fetch {url}"));
            self.body.clone().ok_or_else(|| BootstrapError::CommandFailed {
                program: "fake".into(),
                detail: "connection refused".into(),
            })
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    struct FakeSshd<'j> {
        journal: &'j Journal,
    }

    impl ConfigPatcher for FakeSshd<'_> {
        fn backup(&self, backup_root: &Path) -> Result<PathBuf> {
            self.journal.push("backup");
            Ok(backup_root.join("sshboot-backup-test/sshd_config"))
        }

        fn apply(&self, directives: &[(String, String)]) -> Result<()> {
            self.journal.push(format!("apply {}", directives.len()));
            Ok(())
        }
    }

    struct FakeService<'j> {
        journal: &'j Journal,
    }

    impl ServiceController for FakeService<'_> {
        fn restart(&self, units: &[String]) -> Result<String> {
            self.journal.push(format!("restart {}", units.join(",")));
            Ok(units[0].clone())
        }
    }

    struct Harness {
        _dir: tempfile::TempDir,
        config: AppConfig,
        store: AuthorizedKeysFile,
        journal: Journal,
    }

    impl Harness {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let mut config = AppConfig::default();
            config.user.home_root = dir.path().to_string_lossy().into_owned();
            config.keys.url = "https://github.com/acme/keys/blob/main/admins".into();
            let store = AuthorizedKeysFile::new(config.authorized_keys_path());
            Self {
                _dir: dir,
                config,
                store,
                journal: Journal::default(),
            }
        }

        fn run_keys(&self, accounts: &FakeAccounts, body: Option<&str>) -> Result<KeysReport> {
            let fetcher = FakeFetcher {
                journal: &self.journal,
                body: body.map(str::to_string),
            };
            let sshd = FakeSshd {
                journal: &self.journal,
            };
            let service = FakeService {
                journal: &self.journal,
            };
            let provisioner = Provisioner::new(
                &self.config,
                Collaborators {
                    accounts,
                    fetcher: &fetcher,
                    store: &self.store,
                    sshd: &sshd,
                    service: &service,
                },
            );
            provisioner.provision_keys()
        }
    }

    #[test]
    fn fresh_host_creates_user_and_installs_key() {
        let h = Harness::new();
        let accounts = FakeAccounts::new(&h.journal);

        let report = h.run_keys(&accounts, Some(&format!("{KEY}\n"))).unwrap();

        assert!(report.account.user_created);
        assert!(report.account.group_added);
        assert!(report.any_added());
        assert_eq!(
            report.source_url,
            "https://raw.githubusercontent.com/acme/keys/main/admins"
        );
        assert_eq!(
            std::fs::read_to_string(h.config.authorized_keys_path()).unwrap(),
            format!("{KEY}\n")
        );

        let journal = h.journal.entries();
        assert_eq!(journal[0], "useradd admin /bin/bash");
        assert_eq!(journal[1], "passwd admin");
        assert_eq!(journal[2], "usermod admin sudo");
        assert!(journal.contains(&"chown admin .ssh".to_string()));
        assert!(journal.contains(&"chown admin authorized_keys".to_string()));
    }

    #[test]
    fn second_run_changes_nothing() {
        let h = Harness::new();
        let accounts = FakeAccounts::new(&h.journal);
        let body = format!("{KEY}\n");

        h.run_keys(&accounts, Some(&body)).unwrap();
        let report = h.run_keys(&accounts, Some(&body)).unwrap();

        assert!(!report.account.user_created);
        assert!(!report.account.group_added);
        assert!(!report.any_added());
        assert_eq!(report.already_present, 1);
        assert_eq!(
            std::fs::read_to_string(h.config.authorized_keys_path()).unwrap(),
            body
        );
        let creates = h
            .journal
            .entries()
            .iter()
            .filter(|e| e.starts_with("useradd"))
            .count();
        assert_eq!(creates, 1);
    }

    #[cfg(unix)]
    #[test]
    fn rerun_tightens_loose_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let h = Harness::new();
        let accounts = FakeAccounts::new(&h.journal);
        let ssh_dir = h.config.ssh_dir();
        let keys_path = h.config.authorized_keys_path();
        std::fs::create_dir_all(&ssh_dir).unwrap();
        std::fs::set_permissions(&ssh_dir, std::fs::Permissions::from_mode(0o755)).unwrap();
        std::fs::write(&keys_path, format!("{KEY}\n")).unwrap();
        std::fs::set_permissions(&keys_path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let report = h.run_keys(&accounts, Some(KEY)).unwrap();

        assert!(!report.any_added());
        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(keys_path.as_path()), 0o600);
        assert_eq!(mode(ssh_dir.as_path()), 0o700);
        assert!(h.journal.entries().contains(&"chown admin authorized_keys".to_string()));
    }

    #[test]
    fn no_valid_keys_still_creates_store() {
        let h = Harness::new();
        let accounts = FakeAccounts::new(&h.journal);

        let report = h.run_keys(&accounts, Some("# nothing yet\n")).unwrap();

        assert!(!report.any_added());
        assert_eq!(
            std::fs::read_to_string(h.config.authorized_keys_path()).unwrap(),
            ""
        );
        assert!(h.journal.entries().contains(&"chown admin .ssh".to_string()));
    }

    #[test]
    fn password_prompt_can_be_disabled() {
        let mut h = Harness::new();
        h.config.user.prompt_password = false;
        let accounts = FakeAccounts::new(&h.journal);

        h.run_keys(&accounts, Some(KEY)).unwrap();
        assert!(!h.journal.entries().iter().any(|e| e.starts_with("passwd")));
    }

    #[test]
    fn fetch_failure_leaves_key_store_untouched() {
        let h = Harness::new();
        let accounts = FakeAccounts::new(&h.journal);

        let err = h.run_keys(&accounts, None).unwrap_err();

        assert!(matches!(err, BootstrapError::FetchFailed { .. }));
        assert!(!h.config.ssh_dir().exists());
        let fetches = h
            .journal
            .entries()
            .iter()
            .filter(|e| e.starts_with("fetch "))
            .count();
        assert_eq!(fetches, 3);
        assert!(!h.journal.entries().iter().any(|e| e.starts_with("chown")));
    }

    #[test]
    fn rejected_lines_are_counted_not_added() {
        let h = Harness::new();
        let accounts = FakeAccounts::new(&h.journal);
        let body = format!("# admins\n\ncommand=\"/bin/true\" {KEY}\n{KEY}\n");

        let report = h.run_keys(&accounts, Some(&body)).unwrap();
        assert_eq!(report.added, vec![KEY.to_string()]);
        assert_eq!(report.rejected, 1);
    }

    #[test]
    fn harden_runs_steps_in_order() {
        let h = Harness::new();
        let accounts = FakeAccounts::new(&h.journal);
        let fetcher = FakeFetcher {
            journal: &h.journal,
            body: Some(KEY.into()),
        };
        let sshd = FakeSshd {
            journal: &h.journal,
        };
        let service = FakeService {
            journal: &h.journal,
        };
        let provisioner = Provisioner::new(
            &h.config,
            Collaborators {
                accounts: &accounts,
                fetcher: &fetcher,
                store: &h.store,
                sshd: &sshd,
                service: &service,
            },
        );

        let report = provisioner.run().unwrap();

        assert!(report.keys.any_added());
        assert!(report.harden.root_locked);
        assert_eq!(report.harden.restarted, "ssh.service");

        let journal = h.journal.entries();
        let tail: Vec<&str> = journal.iter().rev().take(4).rev().map(|s| s.as_str()).collect();
        assert_eq!(
            tail,
            vec![
                "backup",
                "apply 5",
                "lock root",
                "restart ssh.service,sshd.service"
            ]
        );
    }

    #[test]
    fn root_lock_can_be_disabled() {
        let mut h = Harness::new();
        h.config.sshd.lock_root_password = false;
        let accounts = FakeAccounts::new(&h.journal);
        let fetcher = FakeFetcher {
            journal: &h.journal,
            body: None,
        };
        let sshd = FakeSshd {
            journal: &h.journal,
        };
        let service = FakeService {
            journal: &h.journal,
        };
        let provisioner = Provisioner::new(
            &h.config,
            Collaborators {
                accounts: &accounts,
                fetcher: &fetcher,
                store: &h.store,
                sshd: &sshd,
                service: &service,
            },
        );

        let report = provisioner.harden().unwrap();
        assert!(!report.root_locked);
        assert!(!h.journal.entries().contains(&"lock root".to_string()));
    }
}
