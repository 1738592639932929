use crate::adapters::system::privilege;
use crate::cli::commands::report_helpers;
use crate::cli::context::LiveSystem;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;

/// Execute `sshboot keys`: account and key installation, sshd untouched.
pub fn execute(config: &AppConfig) -> Result<()> {
    privilege::ensure_root()?;
    let system = LiveSystem::new(config, true)?;
    let provisioner = system.provisioner(config);

    output::header(&format!("Installing keys for {}", config.user.name));
    let account = provisioner.ensure_account()?;
    report_helpers::print_account(config, &account);

    let sp = output::spinner(&format!("Fetching keys with {}...", system.fetcher_name()));
    let keys = provisioner.install_keys();
    sp.finish_and_clear();
    report_helpers::print_keys(&keys?);

    Ok(())
}
