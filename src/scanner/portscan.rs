//! nmap port scanning.
//!
//! Default scans run service and script detection (`-sV -sC`); the simple
//! scan is a bare SYN scan (`-sS`), which needs root.

use super::command::ToolCommand;
use super::discovery::{push_targets, read_artifact};
use super::traits::{artifact_path, PortScanParams, ScanStrategy, StrategyState, ToolConfig};
use crate::error::{ScanError, ScanKind, ScanResult};
use crate::output::Console;
use crate::report::{NmapRun, OpenPort};
use crate::storage::ensure_dir;
use crate::types::combine_port_lists;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Subdirectory of the output root holding port scan artifacts.
pub const PORT_SCAN_DIR: &str = "portScan";

/// Port scanner backed by nmap.
#[derive(Debug)]
pub struct NmapPortScanner {
    tool: ToolConfig,
    params: PortScanParams,
    ports: String,
    output_base: PathBuf,
    open_ports: Vec<OpenPort>,
    state: StrategyState,
}

impl NmapPortScanner {
    pub fn new(tool: ToolConfig) -> Self {
        Self {
            tool,
            params: PortScanParams::default(),
            ports: String::new(),
            output_base: PathBuf::new(),
            open_ports: Vec::new(),
            state: StrategyState::Unconfigured,
        }
    }

    /// Directory receiving the scan artifacts.
    pub fn output_dir(&self) -> PathBuf {
        self.tool.output_root.join(PORT_SCAN_DIR)
    }

    /// Base path passed to `-oA`.
    pub fn output_base(&self) -> &Path {
        &self.output_base
    }

    /// Canonical port list derived at configure time. Empty when scanning
    /// all ports or when nothing was requested.
    pub fn ports(&self) -> &str {
        &self.ports
    }

    /// Structured open ports found by the last `parse`.
    pub fn open_ports(&self) -> &[OpenPort] {
        &self.open_ports
    }

    /// Build the nmap command line for the configured parameters.
    pub fn build_command(&self) -> ToolCommand {
        let mut args: Vec<String> = if self.params.simple_scan {
            vec!["-sS".to_string()]
        } else {
            vec!["-sV".to_string(), "-sC".to_string()]
        };
        args.extend(self.params.options.iter().cloned());

        if self.params.all_ports {
            args.push("-p-".to_string());
        } else if !self.ports.is_empty() {
            args.push("-p".to_string());
            args.push(self.ports.clone());
        }

        args.push("--open".to_string());
        if let Some(flag) = self.params.mode.timing_flag() {
            args.push(flag.to_string());
        }
        push_targets(&mut args, &self.params.targets, self.params.file_mode);
        args.push("-oA".to_string());
        args.push(self.output_base.display().to_string());

        ToolCommand::new(self.tool.nmap_path.clone(), args)
    }
}

#[async_trait]
impl ScanStrategy for NmapPortScanner {
    type Params = PortScanParams;

    fn kind(&self) -> ScanKind {
        ScanKind::PortScan
    }

    fn tool_name(&self) -> &'static str {
        "nmap"
    }

    fn state(&self) -> StrategyState {
        self.state
    }

    fn configure(&mut self, params: &PortScanParams) -> ScanResult<()> {
        self.params = params.clone();
        self.ports = if params.all_ports {
            String::new()
        } else {
            combine_port_lists(&params.port_list, &params.categories)
        };
        self.output_base = self.output_dir().join(&params.output_file);
        self.open_ports.clear();
        self.state = StrategyState::Configured;

        if !params.all_ports && self.ports.is_empty() {
            warn!("No ports requested, nmap will use its default port set");
        }
        debug!(
            "Configured nmap port scan: {} target(s), ports [{}], mode {}",
            params.targets.len(),
            if params.all_ports { "all" } else { self.ports.as_str() },
            params.mode
        );
        Ok(())
    }

    async fn execute(&mut self, console: &Console) -> ScanResult<String> {
        self.state.require(StrategyState::Configured, "execute")?;

        let dir = self.output_dir();
        ensure_dir(&dir).map_err(|source| ScanError::OutputDir { path: dir, source })?;

        let command = self.build_command();
        info!("Executing port scan: {}", command.command_line());
        console.running(&command.command_line());

        let spinner = console.spinner("Scanning ports...");
        let result = command.run(self.tool.timeout).await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        result?;

        let raw = read_artifact(&artifact_path(&self.output_base, ".xml"))?;
        self.state = StrategyState::Executed;
        Ok(raw)
    }

    fn parse(&mut self, raw_output: &str, console: &Console) -> ScanResult<Vec<String>> {
        self.state.require(StrategyState::Executed, "parse")?;

        self.open_ports = NmapRun::parse(raw_output)?.open_ports();
        info!("Port scan found {} open port(s)", self.open_ports.len());
        console.created(artifact_path(&self.output_base, ".xml").display());

        self.state = StrategyState::Parsed;
        Ok(self.open_ports.iter().map(ToString::to_string).collect())
    }
}
