use crate::adapters::system::privilege;
use crate::cli::commands::report_helpers;
use crate::cli::context::LiveSystem;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;

/// Execute `sshboot harden`: back up and patch sshd_config, lock root,
/// restart the daemon. No network access.
pub fn execute(config: &AppConfig) -> Result<()> {
    privilege::ensure_root()?;
    let system = LiveSystem::new(config, false)?;

    output::header("Hardening sshd");
    let report = system.provisioner(config).harden()?;
    report_helpers::print_harden(&report);

    Ok(())
}
