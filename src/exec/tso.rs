//! TSO command execution.
//!
//! - **Unauthorized** commands run through the `tso` program.
//! - **Authorized** commands are fed on stdin to the TSO terminal monitor
//!   program (IKJEFT01) started by `mvscmdauth`.

use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use thiserror::Error;

pub const SUCCEEDED: &str = "The TSO command execution succeeded.";
pub const FAILED: &str = "The TSO command execution failed.";

#[derive(Debug, Error)]
pub enum TsoError {
    #[error("The \"command\" provided was null or an empty string.")]
    EmptyCommand,

    #[error("An unexpected error occurred: {0}")]
    Spawn(#[from] io::Error),
}

/// Parameters for one TSO command, echoed back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct TsoRequest {
    pub command: String,
    pub auth: bool,
}

/// Programs used to reach TSO.
#[derive(Debug, Clone)]
pub struct TsoPrograms {
    pub tso: PathBuf,
    pub mvscmdauth: PathBuf,
}

/// Normalized result of a TSO command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsoOutcome {
    pub stdout: String,
    pub stderr: String,
    pub rc: i32,
    /// `stdout` split into lines.
    pub content: Vec<String>,
}

impl TsoOutcome {
    pub fn new(stdout: String, stderr: String, rc: i32) -> Self {
        let content = stdout.lines().map(str::to_string).collect();
        Self {
            stdout,
            stderr,
            rc,
            content,
        }
    }

    fn from_output(output: Output) -> Self {
        Self::new(
            String::from_utf8_lossy(&output.stdout).into_owned(),
            String::from_utf8_lossy(&output.stderr).into_owned(),
            output.status.code().unwrap_or(-1),
        )
    }

    pub fn succeeded(&self) -> bool {
        self.rc == 0
    }

    pub fn message(&self) -> &'static str {
        if self.succeeded() { SUCCEEDED } else { FAILED }
    }
}

/// Run a TSO command and collect its output.
///
/// A nonzero return code is not an error here; callers inspect
/// [`TsoOutcome::succeeded`].
pub fn run_tso_command(
    request: &TsoRequest,
    programs: &TsoPrograms,
) -> Result<TsoOutcome, TsoError> {
    let command = request.command.trim();
    if command.is_empty() {
        return Err(TsoError::EmptyCommand);
    }

    tracing::info!(command, auth = request.auth, "running TSO command");

    let output = if request.auth {
        run_authorized(command, programs)?
    } else {
        Command::new(&programs.tso).arg(command).output()?
    };

    let outcome = TsoOutcome::from_output(output);
    if !outcome.succeeded() {
        tracing::warn!(command, rc = outcome.rc, "TSO command failed");
    }
    Ok(outcome)
}

fn run_authorized(command: &str, programs: &TsoPrograms) -> io::Result<Output> {
    let mut child = Command::new(&programs.mvscmdauth)
        .args([
            "--pgm=IKJEFT01",
            "--sysprint=*",
            "--systsprt=*",
            "--systsin=stdin",
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Dropping stdin closes SYSTSIN so IKJEFT01 sees end of input. A wrapper
    // that exits without reading it still reports through its rc and stderr.
    if let Some(mut stdin) = child.stdin.take() {
        match writeln!(stdin, "{}", command) {
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e),
            _ => {}
        }
    }
    child.wait_with_output()
}
