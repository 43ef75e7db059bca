//! Full recon subcommand implementation.
//!
//! Handles `reconnoiter recon -t <targets>`: host discovery, then a port scan
//! of every live host it found.

use super::discovery::run_discovery;
use super::portscan::run_port_scan;
use super::{split_options, AppContext};
use crate::error::CliResult;
use crate::scanner::{DiscoveryEngine, DiscoveryParams, PortScanParams};
use crate::types::{ScanMode, TargetInput};
use clap::Parser;
use std::path::PathBuf;
use tracing::warn;

/// Discover live hosts, then scan their ports.
#[derive(Parser, Debug)]
pub struct ReconCommand {
    /// Targets: comma-separated IPv4 addresses and CIDR blocks, or a file
    #[arg(short, long, value_name = "TARGETS")]
    pub target: String,

    /// Base name for the host discovery output files
    #[arg(long, default_value = "targets")]
    pub discovery_output: String,

    /// Base name for the port scan output files
    #[arg(short, long = "outfile", default_value = "portscan")]
    pub output: String,

    /// Ports to scan (e.g., "80", "80,443", "1-1000")
    #[arg(short = 'p', long = "ports", default_value = "")]
    pub ports: String,

    /// Port categories to add
    #[arg(short = 'c', long = "category", default_value = "")]
    pub category: String,

    /// Scan all 65535 ports
    #[arg(short = 'a', long = "allports")]
    pub all_ports: bool,

    /// Simple SYN scan (-sS) instead of service detection; needs root
    #[arg(short = 's', long)]
    pub simple: bool,

    /// Scan mode for both stages: 1/stealth, 2/normal or 3/aggressive
    #[arg(short, long, default_value = "normal")]
    pub mode: ScanMode,

    /// Discovery engine
    #[arg(short, long, value_enum, default_value = "nmap")]
    pub engine: DiscoveryEngine,

    /// Extra options passed through to the port scan
    #[arg(short = 'x', long = "custom", default_value = "", allow_hyphen_values = true)]
    pub custom: String,
}

impl ReconCommand {
    /// Execute both stages.
    pub async fn execute(&self, ctx: &AppContext) -> CliResult<()> {
        let input = TargetInput::parse(&self.target)?.require_targets()?;
        ctx.console.timestamp("Starting recon");

        let discovery = DiscoveryParams::new(input, self.discovery_output.as_str())
            .with_mode(self.mode);
        let discovered = run_discovery(ctx, discovery, self.engine).await?;

        if discovered.hosts.is_empty() {
            ctx.console.warning("Skipping port scan: no live hosts");
            return Ok(());
        }

        let scan_input = port_scan_input(discovered.hosts, discovered.targets_file);
        let params = PortScanParams::new(scan_input, self.output.as_str())
            .with_mode(self.mode)
            .with_options(split_options(&self.custom))
            .with_ports(self.ports.as_str())
            .with_categories(self.category.as_str())
            .with_all_ports(self.all_ports)
            .with_simple_scan(self.simple);
        run_port_scan(ctx, params).await?;

        ctx.console.timestamp("Recon finished");
        Ok(())
    }
}

/// Targets for the port scan stage.
///
/// The targets file is used only when this discovery run wrote it. Otherwise
/// the hosts are passed inline.
fn port_scan_input(hosts: Vec<String>, targets_file: Option<PathBuf>) -> TargetInput {
    match targets_file {
        Some(file) => TargetInput {
            targets: vec![file.display().to_string()],
            file_mode: true,
        },
        None => {
            warn!(
                "Targets file not written, passing {} host(s) directly",
                hosts.len()
            );
            TargetInput {
                targets: hosts,
                file_mode: false,
            }
        }
    }
}
