//! External tool invocation.
//!
//! Runs a scanner binary to completion, capturing stdout and stderr. The
//! child is killed if the run times out or its future is dropped.

use crate::error::{ScanError, ScanResult};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// A fully built external command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
}

impl ToolCommand {
    /// Create a command from a program and its arguments.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The command as the user would type it.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the command and return its combined stdout and stderr.
    ///
    /// A non-zero exit status is an error carrying the captured output.
    pub async fn run(&self, timeout: Option<Duration>) -> ScanResult<String> {
        debug!("Spawning: {}", self.command_line());

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ScanError::Spawn {
                tool: self.program.clone(),
                source,
            })?;

        let output = tokio::select! {
            result = child.wait_with_output() => result?,
            elapsed = deadline(timeout) => return Err(ScanError::TimedOut(elapsed)),
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(ScanError::ToolFailed {
                tool: self.program.clone(),
                status: output.status.to_string(),
                output: combined,
            });
        }

        debug!(
            "{} exited successfully ({} bytes of output)",
            self.program,
            combined.len()
        );
        Ok(combined)
    }
}

/// Resolves after `timeout`, or never when there is none.
async fn deadline(timeout: Option<Duration>) -> Duration {
    match timeout {
        Some(limit) => {
            tokio::time::sleep(limit).await;
            limit
        }
        None => std::future::pending().await,
    }
}
