//! Host discovery subcommand implementation.
//!
//! Handles `reconnoiter hostdiscovery -t <targets>`.

use super::{or_none, split_options, AppContext};
use crate::error::CliResult;
use crate::scanner::{
    host_discovery_strategy, DiscoveryEngine, DiscoveryParams, HostDiscoveryOrchestrator,
    ScanStrategy,
};
use crate::types::{ScanMode, TargetInput};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// Find live hosts.
#[derive(Parser, Debug)]
pub struct HostDiscoveryCommand {
    /// Targets: comma-separated IPv4 addresses and CIDR blocks, or a file
    ///
    /// Examples:
    ///   192.168.1.1                  Single address
    ///   192.168.1.0/24,10.0.0.5      Several targets
    ///   scope.txt                    One target per line
    #[arg(short, long, value_name = "TARGETS")]
    pub target: String,

    /// Base name for the output files
    #[arg(short, long = "outfile", default_value = "targets")]
    pub output: String,

    /// Scan mode: 1/stealth, 2/normal or 3/aggressive
    #[arg(short, long, default_value = "normal")]
    pub mode: ScanMode,

    /// Extra options passed through to the tool
    #[arg(short = 'c', long = "custom", default_value = "", allow_hyphen_values = true)]
    pub custom: String,

    /// Discovery engine
    #[arg(short, long, value_enum, default_value = "nmap")]
    pub engine: DiscoveryEngine,
}

impl HostDiscoveryCommand {
    /// Execute the host discovery command.
    pub async fn execute(&self, ctx: &AppContext) -> CliResult<Vec<String>> {
        let input = TargetInput::parse(&self.target)?.require_targets()?;
        let params = DiscoveryParams::new(input, self.output.as_str())
            .with_mode(self.mode)
            .with_options(split_options(&self.custom));

        Ok(run_discovery(ctx, params, self.engine).await?.hosts)
    }
}

/// Live hosts found by a discovery run.
#[derive(Debug)]
pub(super) struct Discovered {
    pub hosts: Vec<String>,
    /// Targets file written by this run, if the write succeeded.
    pub targets_file: Option<PathBuf>,
}

/// Run host discovery and report the live hosts.
pub(super) async fn run_discovery(
    ctx: &AppContext,
    params: DiscoveryParams,
    engine: DiscoveryEngine,
) -> CliResult<Discovered> {
    let console = &ctx.console;
    console.section("Host Discovery");

    if !ctx.quiet {
        console.panel(&[
            ("Target", params.targets.join(", ")),
            ("Output", params.output_file.clone()),
            ("Mode", params.mode.to_string()),
            ("Engine", engine.to_string()),
            ("Options", or_none(&params.options.join(" "))),
        ]);
    }
    console.timestamp("Starting host discovery");

    let strategy = host_discovery_strategy(engine, ctx.tool_config());
    let mut orchestrator =
        HostDiscoveryOrchestrator::new(strategy, params, Arc::clone(&ctx.console));
    let hosts = orchestrator.run().await?;

    if hosts.is_empty() {
        console.warning("No live hosts found");
    } else {
        console.success(format_args!("Found {} live host(s)", hosts.len()));
        for host in &hosts {
            console.line(format_args!("    {}", host));
        }
    }
    console.timestamp("Host discovery finished");

    Ok(Discovered {
        hosts,
        targets_file: orchestrator.strategy().written_targets().map(PathBuf::from),
    })
}
