//! Console command execution.
//!
//! The query issues display commands through a [`ConsoleExecutor`]. On a
//! z/OS host that is `opercmd` from Z Open Automation Utilities; offline,
//! captured console output can be replayed from files instead.

pub mod tso;

use crate::error::{QueryError, Result};
use anyhow::Context;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::Command;

/// Raw result of one console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    pub status_code: i32,
    pub output_text: String,
}

pub trait ConsoleExecutor {
    fn execute(&self, command: &str) -> io::Result<CommandResponse>;
}

/// Issue `command` and return its output, failing on a nonzero status.
///
/// No retry: a single failure ends the query.
pub fn issue_command(executor: &dyn ConsoleExecutor, command: &str) -> Result<String> {
    tracing::info!(command, "issuing operator command");
    let response = executor.execute(command)?;

    if response.status_code != 0 {
        tracing::warn!(
            command,
            status = response.status_code,
            "operator command failed"
        );
        return Err(QueryError::OperatorCommand(response.output_text));
    }
    Ok(response.output_text)
}

/// Runs console commands through the `opercmd` program.
#[derive(Debug, Clone)]
pub struct OpercmdConsole {
    program: PathBuf,
}

impl OpercmdConsole {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ConsoleExecutor for OpercmdConsole {
    fn execute(&self, command: &str) -> io::Result<CommandResponse> {
        let output = Command::new(&self.program).arg(command).output()?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let output_text = if stdout.trim().is_empty() { stderr } else { stdout };

        Ok(CommandResponse {
            // Killed by a signal: no exit code, still a failure.
            status_code: output.status.code().unwrap_or(-1),
            output_text,
        })
    }
}

/// Serves captured console output keyed by command text.
#[derive(Debug, Clone, Default)]
pub struct ReplayConsole {
    responses: BTreeMap<String, String>,
}

impl ReplayConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, command: &str, output: impl Into<String>) -> Self {
        self.responses.insert(normalize(command), output.into());
        self
    }

    pub fn with_file(self, command: &str, path: &str) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read captured output for {} from {}", command, path))?;
        Ok(self.with_response(command, text))
    }
}

impl ConsoleExecutor for ReplayConsole {
    fn execute(&self, command: &str) -> io::Result<CommandResponse> {
        Ok(match self.responses.get(&normalize(command)) {
            Some(text) => CommandResponse {
                status_code: 0,
                output_text: text.clone(),
            },
            None => CommandResponse {
                status_code: 8,
                output_text: format!("no captured output for command {}", command),
            },
        })
    }
}

fn normalize(command: &str) -> String {
    command.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_uppercase()
}
