//! Port scan subcommand implementation.
//!
//! Handles `reconnoiter portscan [-t <targets>]`. Without a target the scan
//! reads the targets file written by host discovery.

use super::{is_root, or_none, split_options, AppContext};
use crate::error::CliResult;
use crate::report::OpenPort;
use crate::scanner::{
    NmapPortScanner, PortScanOrchestrator, PortScanParams, HOST_DISCOVERY_DIR,
};
use crate::storage::TARGETS_FILE_NAME;
use crate::types::{ScanMode, TargetInput};
use clap::Parser;
use std::sync::Arc;

/// Scan ports on known hosts.
#[derive(Parser, Debug)]
pub struct PortScanCommand {
    /// Targets: comma-separated IPv4 addresses and CIDR blocks, or a file
    /// [default: ./hostDiscovery/targets.txt]
    #[arg(short, long, value_name = "TARGETS")]
    pub target: Option<String>,

    /// Base name for the output files
    #[arg(short, long = "outfile", default_value = "portscan")]
    pub output: String,

    /// Ports to scan (e.g., "80", "80,443", "1-1000")
    #[arg(short = 'p', long = "ports", default_value = "")]
    pub ports: String,

    /// Port categories to add (top12, database, web, network, firewall, windows, vpn, all)
    #[arg(short = 'c', long = "category", default_value = "")]
    pub category: String,

    /// Scan all 65535 ports
    #[arg(short = 'a', long = "allports")]
    pub all_ports: bool,

    /// Simple SYN scan (-sS) instead of service detection; needs root
    #[arg(short = 's', long)]
    pub simple: bool,

    /// Scan mode: 1/stealth, 2/normal or 3/aggressive
    #[arg(short, long, default_value = "normal")]
    pub mode: ScanMode,

    /// Extra options passed through to nmap
    #[arg(short = 'x', long = "custom", default_value = "", allow_hyphen_values = true)]
    pub custom: String,
}

impl PortScanCommand {
    /// Execute the port scan command.
    pub async fn execute(&self, ctx: &AppContext) -> CliResult<Vec<OpenPort>> {
        let raw_target = match &self.target {
            Some(target) => target.clone(),
            None => ctx
                .settings
                .output_root
                .join(HOST_DISCOVERY_DIR)
                .join(TARGETS_FILE_NAME)
                .display()
                .to_string(),
        };
        let input = TargetInput::parse(&raw_target)?.require_targets()?;

        let params = PortScanParams::new(input, self.output.as_str())
            .with_mode(self.mode)
            .with_options(split_options(&self.custom))
            .with_ports(self.ports.as_str())
            .with_categories(self.category.as_str())
            .with_all_ports(self.all_ports)
            .with_simple_scan(self.simple);

        run_port_scan(ctx, params).await
    }
}

/// Run an nmap port scan and report the open ports.
pub(super) async fn run_port_scan(
    ctx: &AppContext,
    params: PortScanParams,
) -> CliResult<Vec<OpenPort>> {
    let console = &ctx.console;
    console.section("Port Scan");

    if params.simple_scan && !is_root() {
        console.warning("SYN scan (-sS) requires root/sudo privileges.");
        console.warning("nmap may refuse to run or fall back to a connect scan.");
    }

    if !ctx.quiet {
        let ports = if params.all_ports {
            "all".to_string()
        } else {
            or_none(&params.port_list)
        };
        console.panel(&[
            ("Target", params.targets.join(", ")),
            ("Output", params.output_file.clone()),
            ("Ports", ports),
            ("Categories", or_none(&params.categories)),
            ("Mode", params.mode.to_string()),
            ("Scan", if params.simple_scan { "simple" } else { "detailed" }.to_string()),
            ("Options", or_none(&params.options.join(" "))),
        ]);
    }
    console.timestamp("Starting port scan");

    let mut orchestrator = PortScanOrchestrator::new(
        Box::new(NmapPortScanner::new(ctx.tool_config())),
        params,
        Arc::clone(&ctx.console),
    );
    let results = orchestrator.run().await?;

    if results.is_empty() {
        console.warning("No open ports found");
    } else {
        console.success(format_args!("Found {} open port(s)", results.len()));
        for entry in &results {
            console.line(format_args!("    {}", entry));
        }
    }
    console.timestamp("Port scan finished");

    Ok(orchestrator.strategy().open_ports().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::testing::context;
    use crate::error::CliError;
    use crate::types::TargetError;

    fn command(target: Option<&str>) -> PortScanCommand {
        PortScanCommand {
            target: target.map(str::to_string),
            output: "portscan".to_string(),
            ports: "22,80".to_string(),
            category: String::new(),
            all_ports: false,
            simple: false,
            mode: ScanMode::Normal,
            custom: String::new(),
        }
    }

    #[tokio::test]
    async fn test_missing_default_targets_file() {
        let dir = tempfile::tempdir().unwrap();
        let (ctx, _) = context(dir.path(), None);
        let err = command(None).execute(&ctx).await.unwrap_err();
        assert!(matches!(err, CliError::Target(TargetError::InvalidTarget(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_default_target_is_discovery_file() {
        use crate::report::fixtures::PORT_SCAN_XML;
        use crate::scanner::testing::fake_tool;

        let dir = tempfile::tempdir().unwrap();
        let nmap = fake_tool(dir.path(), "nmap", PORT_SCAN_XML);
        let discovery = dir.path().join("hostDiscovery");
        std::fs::create_dir_all(&discovery).unwrap();
        std::fs::write(discovery.join("targets.txt"), "10.0.0.7\n10.0.0.9\n").unwrap();

        let (ctx, buffer) = context(dir.path(), Some(&nmap));
        let open = command(None).execute(&ctx).await.unwrap();
        assert_eq!(open.len(), 3);

        let args = std::fs::read_to_string(dir.path().join("nmap.args")).unwrap();
        assert!(args.contains("-iL"));
        assert!(args.contains("hostDiscovery/targets.txt"));
        assert!(args.contains("-p 22,80"));

        let out = buffer.contents();
        assert!(out.contains("[+] Found 3 open port(s)"));
        assert!(out.contains("    10.0.0.7:22/tcp ssh"));
    }
}
