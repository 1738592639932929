use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::models::authorized_keys::PublicKey;
use crate::core::models::provision_report::{AccountReport, HardenReport, KeysReport};

/// Print what happened to the account.
pub fn print_account(config: &AppConfig, report: &AccountReport) {
    let user = &config.user.name;
    if report.user_created {
        output::success(&format!("Created user {user} (shell {})", config.user.shell));
    } else {
        output::success(&format!("User {user} already exists"));
    }

    let group = &config.user.admin_group;
    if report.group_added {
        output::success(&format!("Added {user} to group {group}"));
    } else {
        output::success(&format!("{user} is already in group {group}"));
    }
}

/// Print the key merge result, including the rejected-line warning.
pub fn print_keys(report: &KeysReport) {
    output::detail(&format!("keys served by {}", report.source_url));

    for key in &report.added {
        output::detail(&format!("+ {}", abbreviate_key(key)));
    }

    if report.any_added() {
        output::success(&format!(
            "Added {} key(s) to {}",
            report.added.len(),
            report.store_path.display()
        ));
    } else {
        output::success(&format!(
            "No new keys: {} already present in {}",
            report.already_present,
            report.store_path.display()
        ));
    }

    if report.rejected > 0 {
        output::warning(&format!(
            "Ignored {} line(s) that are not plain ssh-rsa, ssh-ed25519 or ecdsa-sha2-nistp* keys",
            report.rejected
        ));
    }
}

/// Print the sshd hardening result.
pub fn print_harden(report: &HardenReport) {
    output::success(&format!(
        "Backed up sshd config to {}",
        report.backup_path.display()
    ));
    for (name, value) in &report.directives {
        output::detail(&format!("{name} {value}"));
    }
    output::success(&format!("Applied {} sshd directive(s)", report.directives.len()));
    if report.root_locked {
        output::success("Locked root password");
    }
    output::success(&format!("Restarted sshd ({})", report.restarted));
}

/// Shorten the base64 payload so a key fits on one terminal line.
pub fn abbreviate_key(line: &str) -> String {
    let Some(key) = PublicKey::parse(line) else {
        return line.to_string();
    };
    let payload = match key.payload() {
        Some(p) if p.len() > 20 && p.is_ascii() => {
            format!("{}…{}", &p[..10], &p[p.len() - 6..])
        }
        Some(p) => p.to_string(),
        None => String::new(),
    };
    match key.comment() {
        Some(comment) => format!("{} {payload} {comment}", key.key_type),
        None => format!("{} {payload}", key.key_type).trim_end().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviate_long_payload() {
        let key = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIHk7abcdef alice@laptop";
        assert_eq!(abbreviate_key(key), "ssh-ed25519 AAAAC3NzaC…abcdef alice@laptop");
    }

    #[test]
    fn short_key_is_unchanged() {
        assert_eq!(abbreviate_key("ssh-rsa AAAA"), "ssh-rsa AAAA");
    }
}
