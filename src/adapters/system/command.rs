use std::ffi::OsStr;
use std::process::{Command, Output, Stdio};

use crate::core::errors::{BootstrapError, Result};

fn display(program: &str, args: &[&OsStr]) -> String {
    let mut s = program.to_string();
    for arg in args {
        s.push(' ');
        s.push_str(&arg.to_string_lossy());
    }
    s
}

/// Run a system utility and return its output on success.
///
/// A non-zero exit becomes `CommandFailed` carrying the first line of stderr.
pub fn run<S: AsRef<OsStr>>(program: &str, args: &[S]) -> Result<Output> {
    let args: Vec<&OsStr> = args.iter().map(AsRef::as_ref).collect();
    let output = Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| BootstrapError::CommandFailed {
            program: display(program, &args),
            detail: format!("could not start: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = stderr.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
        return Err(BootstrapError::CommandFailed {
            program: display(program, &args),
            detail: format!("{} {}", output.status, reason).trim_end().to_string(),
        });
    }

    Ok(output)
}

/// Run a utility attached to the terminal, for interactive prompts.
pub fn run_interactive(program: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(program).args(args).status().map_err(|e| {
        BootstrapError::CommandFailed {
            program: program.to_string(),
            detail: format!("could not start: {e}"),
        }
    })?;

    if !status.success() {
        return Err(BootstrapError::CommandFailed {
            program: format!("{program} {}", args.join(" ")),
            detail: status.to_string(),
        });
    }
    Ok(())
}

/// True if the utility ran and exited zero. Output is discarded.
pub fn succeeds(program: &str, args: &[&str]) -> bool {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

/// Check whether `tool` is installed by starting it.
///
/// Any exit status counts: BusyBox `wget` rejects `--version`.
pub fn is_available(tool: &str) -> bool {
    Command::new(tool)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}
