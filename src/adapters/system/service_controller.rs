use crate::adapters::system::command;
use crate::core::errors::{BootstrapError, Result};
use crate::core::traits::service::ServiceController;

/// One restart attempt: program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub program: &'static str,
    pub args: Vec<String>,
}

impl Attempt {
    fn describe(&self) -> String {
        format!("{} {}", self.program, self.args.join(" "))
    }
}

/// Ordered restart attempts for `units`.
///
/// systemd units first (`ssh.service` is the Debian name, `sshd.service`
/// everything else), then the SysV `service` wrapper with the same names.
pub fn restart_plan(units: &[String]) -> Vec<Attempt> {
    let systemd = units.iter().map(|unit| Attempt {
        program: "systemctl",
        args: vec!["restart".into(), unit.clone()],
    });
    let sysv = units.iter().map(|unit| Attempt {
        program: "service",
        args: vec![
            unit.strip_suffix(".service").unwrap_or(unit).to_string(),
            "restart".into(),
        ],
    });
    systemd.chain(sysv).collect()
}

/// Run `plan` in order and return the first attempt that succeeds.
///
/// Every failure is kept for the error when no attempt works.
fn first_success<F>(plan: &[Attempt], mut run: F) -> Result<String>
where
    F: FnMut(&Attempt) -> Result<()>,
{
    let mut failures = Vec::with_capacity(plan.len());

    for attempt in plan {
        match run(attempt) {
            Ok(()) => return Ok(attempt.describe()),
            Err(e) => failures.push(e.to_string()),
        }
    }

    Err(BootstrapError::CommandFailed {
        program: "restart sshd".into(),
        detail: format!(
            "no restart method worked ({} tried): {}",
            plan.len(),
            failures.join("; ")
        ),
    })
}

/// Restarts sshd through systemctl, falling back to `service`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemServiceController;

impl SystemServiceController {
    pub fn new() -> Self {
        Self
    }
}

impl ServiceController for SystemServiceController {
    fn restart(&self, units: &[String]) -> Result<String> {
        first_success(&restart_plan(units), |attempt| {
            command::run(attempt.program, &attempt.args).map(|_| ())
        })
    }
}
