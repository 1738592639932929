use crate::adapters::system::privilege;
use crate::cli::commands::report_helpers;
use crate::cli::context::LiveSystem;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;

/// Execute `sshboot run` (also the default with no subcommand).
///
/// Creates the admin user, installs keys from the configured URL, then
/// hardens sshd and restarts it. Steps stop at the first failure.
pub fn execute(config: &AppConfig) -> Result<()> {
    privilege::ensure_root()?;
    let system = LiveSystem::new(config, true)?;

    output::header(&format!("sshboot — Bootstrapping {}", config.user.name));
    output::detail(&format!("key source: {}", config.keys.url));
    output::detail(&format!("download tool: {}", system.fetcher_name()));

    let report = system.provisioner(config).run()?;

    report_helpers::print_account(config, &report.keys.account);
    report_helpers::print_keys(&report.keys);

    output::header("Hardening sshd");
    report_helpers::print_harden(&report.harden);

    output::success("Host bootstrapped.\n");
    if !output::is_quiet() {
        println!("  Test a new session before closing this one:");
        println!("     ssh {}@<this-host>", config.user.name);
    }
    Ok(())
}
