//! CLI subcommand definitions and handlers.
//!
//! Implements a git-like subcommand architecture:
//! - `reconnoiter hostdiscovery -t <targets>` - Find live hosts
//! - `reconnoiter portscan -t <targets>` - Scan ports on known hosts
//! - `reconnoiter recon -t <targets>` - Host discovery followed by a port scan
//! - `reconnoiter report <xml>` - Render a saved scan report

mod discovery;
mod portscan;
mod recon;
mod report;

pub use discovery::HostDiscoveryCommand;
pub use portscan::PortScanCommand;
pub use recon::ReconCommand;
pub use report::ReportCommand;

use crate::config::AppSettings;
use crate::error::{CliResult, ScanError};
use crate::output::Console;
use crate::scanner::ToolConfig;
use clap::{Parser, Subcommand};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

/// Reconnoiter - network reconnaissance orchestrator.
///
/// Drives nmap and masscan through host discovery and port scanning,
/// keeping every tool report on disk and a reusable list of live hosts.
#[derive(Parser, Debug)]
#[command(name = "reconnoiter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Recon orchestration around nmap and masscan", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress the banner and configuration panels
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a JSON or TOML settings file
    #[arg(long, global = true, env = "RECONNOITER_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Kill external tools after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find live hosts with a ping sweep
    #[command(name = "hostdiscovery", alias = "hd")]
    HostDiscovery(HostDiscoveryCommand),

    /// Scan ports on one or more hosts
    #[command(name = "portscan", alias = "ps")]
    PortScan(PortScanCommand),

    /// Host discovery followed by a port scan of every live host
    #[command(alias = "r")]
    Recon(ReconCommand),

    /// Render a saved XML scan report
    Report(ReportCommand),
}

impl Cli {
    /// Apply command-line overrides on top of loaded settings.
    pub fn apply_overrides(&self, settings: &mut AppSettings) {
        if self.verbose {
            settings.verbose = true;
        }
        if let Some(secs) = self.timeout {
            settings.timeout_secs = Some(secs);
        }
    }

    /// Dispatch the selected subcommand.
    pub async fn run(&self, ctx: &AppContext) -> CliResult<()> {
        match &self.command {
            Commands::HostDiscovery(cmd) => cmd.execute(ctx).await.map(|_| ()),
            Commands::PortScan(cmd) => cmd.execute(ctx).await.map(|_| ()),
            Commands::Recon(cmd) => cmd.execute(ctx).await,
            Commands::Report(cmd) => cmd.execute(ctx),
        }
    }

    /// Dispatch the selected subcommand until `interrupt` resolves.
    ///
    /// An interrupt drops the running command, which kills any external tool
    /// it started, and fails with [`ScanError::Cancelled`].
    pub async fn run_until<F>(&self, ctx: &AppContext, interrupt: F) -> CliResult<()>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = self.run(ctx) => result,
            () = interrupt => Err(ScanError::Cancelled.into()),
        }
    }
}

/// Everything a subcommand needs besides its own arguments.
pub struct AppContext {
    pub settings: AppSettings,
    pub console: Arc<Console>,
    pub quiet: bool,
}

impl AppContext {
    pub fn new(settings: AppSettings, console: Console, quiet: bool) -> Self {
        Self {
            settings,
            console: Arc::new(console),
            quiet,
        }
    }

    /// Tool configuration for strategies.
    pub fn tool_config(&self) -> ToolConfig {
        self.settings.tool_config()
    }
}

/// Output format for rendered reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Split a custom options string into tool arguments.
pub fn split_options(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

/// Check if running with root/admin privileges.
pub fn is_root() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}

/// Text shown for an empty panel value.
fn or_none(value: &str) -> String {
    if value.trim().is_empty() {
        "none".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::AppContext;
    use crate::config::AppSettings;
    use crate::output::{Console, SharedBuffer};
    use std::path::Path;

    /// Context writing under `root` and capturing console output.
    pub fn context(root: &Path, nmap: Option<&Path>) -> (AppContext, SharedBuffer) {
        let mut settings = AppSettings {
            output_root: root.to_path_buf(),
            ..AppSettings::default()
        };
        if let Some(nmap) = nmap {
            settings.nmap_path = nmap.display().to_string();
        }
        let (console, buffer) = Console::buffered();
        (AppContext::new(settings, console, false), buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScanMode;

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "reconnoiter",
            "--timeout",
            "30",
            "-v",
            "hostdiscovery",
            "-t",
            "10.0.0.0/24",
        ])
        .unwrap();
        assert!(cli.verbose);

        let mut settings = AppSettings::default();
        cli.apply_overrides(&mut settings);
        assert!(settings.verbose);
        assert_eq!(settings.timeout_secs, Some(30));
    }

    #[test]
    fn test_hostdiscovery_defaults() {
        let cli = Cli::try_parse_from(["reconnoiter", "hostdiscovery", "-t", "10.0.0.1"]).unwrap();
        match cli.command {
            Commands::HostDiscovery(cmd) => {
                assert_eq!(cmd.output, "targets");
                assert_eq!(cmd.mode, ScanMode::Normal);
                assert!(cmd.custom.is_empty());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_portscan_flags() {
        let cli = Cli::try_parse_from([
            "reconnoiter",
            "portscan",
            "-p",
            "22,80",
            "-c",
            "web",
            "-s",
            "-m",
            "3",
            "-x",
            "-Pn --max-retries 1",
        ])
        .unwrap();
        match cli.command {
            Commands::PortScan(cmd) => {
                assert!(cmd.target.is_none());
                assert_eq!(cmd.output, "portscan");
                assert_eq!(cmd.ports, "22,80");
                assert_eq!(cmd.category, "web");
                assert!(cmd.simple);
                assert!(!cmd.all_ports);
                assert_eq!(cmd.mode, ScanMode::Aggressive);
                assert_eq!(split_options(&cmd.custom), ["-Pn", "--max-retries", "1"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let result = Cli::try_parse_from([
            "reconnoiter",
            "hostdiscovery",
            "-t",
            "10.0.0.1",
            "-m",
            "ludicrous",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_report_format() {
        let cli =
            Cli::try_parse_from(["reconnoiter", "report", "scan.xml", "--format", "csv"]).unwrap();
        match cli.command {
            Commands::Report(cmd) => assert_eq!(cmd.format, OutputFormat::Csv),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_split_options() {
        assert!(split_options("  ").is_empty());
        assert_eq!(split_options("--reason  -n"), ["--reason", "-n"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_interrupt_stops_running_tool() {
        use std::os::unix::fs::PermissionsExt;
        use std::time::{Duration, Instant};

        let dir = tempfile::tempdir().unwrap();
        let nmap = dir.path().join("nmap");
        std::fs::write(&nmap, "#!/bin/sh\nsleep 5\n").unwrap();
        std::fs::set_permissions(&nmap, std::fs::Permissions::from_mode(0o755)).unwrap();
        let (ctx, _) = testing::context(dir.path(), Some(&nmap));

        let cli = Cli::try_parse_from(["reconnoiter", "hd", "-t", "10.0.0.1"]).unwrap();
        let started = Instant::now();
        let err = cli
            .run_until(&ctx, tokio::time::sleep(Duration::from_millis(100)))
            .await
            .unwrap_err();

        assert!(matches!(err, crate::error::CliError::Scan(ScanError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_or_none() {
        assert_eq!(or_none(""), "none");
        assert_eq!(or_none("-Pn"), "-Pn");
    }
}
