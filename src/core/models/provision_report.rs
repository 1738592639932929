use std::path::PathBuf;

/// Changes made to the local account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountReport {
    pub user_created: bool,
    pub group_added: bool,
}

/// What the key half of a bootstrap run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeysReport {
    pub account: AccountReport,
    /// URL that actually served the key list.
    pub source_url: String,
    /// Key lines appended to `authorized_keys`, in order.
    pub added: Vec<String>,
    pub already_present: usize,
    /// Non-comment lines that were not an accepted key.
    pub rejected: usize,
    pub store_path: PathBuf,
}

impl KeysReport {
    pub fn any_added(&self) -> bool {
        !self.added.is_empty()
    }
}

/// What the sshd half of a bootstrap run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HardenReport {
    pub backup_path: PathBuf,
    pub directives: Vec<(String, String)>,
    pub root_locked: bool,
    /// Description of the unit or command that was restarted.
    pub restarted: String,
}

/// Summary of a full `sshboot run`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProvisionReport {
    pub keys: KeysReport,
    pub harden: HardenReport,
}
