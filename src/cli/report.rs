//! Report subcommand implementation.
//!
//! Handles `reconnoiter report <xml>` for rendering a saved scan report.

use super::{AppContext, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::output::format_report;
use crate::report::NmapRun;
use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Render a saved XML scan report.
#[derive(Parser, Debug)]
pub struct ReportCommand {
    /// XML report written by nmap or masscan
    #[arg(value_name = "XML")]
    pub input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,

    /// Output file path (prints to stdout if not specified)
    #[arg(short = 'o', long = "output")]
    pub output_file: Option<PathBuf>,
}

impl ReportCommand {
    /// Execute the report command.
    pub fn execute(&self, ctx: &AppContext) -> CliResult<()> {
        let run = NmapRun::load(&self.input)?;

        match &self.output_file {
            Some(path) => {
                let mut content = Vec::new();
                format_report(&mut content, &run, self.format, false)?;
                fs::write(path, content).map_err(|e| {
                    CliError::Other(format!("failed to write {}: {}", path.display(), e))
                })?;
                ctx.console.success(format_args!(
                    "Exported {} report to {}",
                    self.format,
                    path.display()
                ));
            }
            None => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                format_report(&mut out, &run, self.format, ctx.console.color())?;
                out.flush()?;
            }
        }

        Ok(())
    }
}
