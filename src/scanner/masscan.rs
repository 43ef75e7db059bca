//! masscan-based host discovery.
//!
//! Sweeps every port with masscan and treats any host with an open port as
//! live. masscan has no timing templates, so the scan mode is ignored.

use super::command::ToolCommand;
use super::discovery::{discovery_dir, persist_hosts, push_targets, read_artifact};
use super::traits::{artifact_path, DiscoveryParams, ScanStrategy, StrategyState, ToolConfig};
use crate::error::{ScanError, ScanKind, ScanResult};
use crate::output::Console;
use crate::report::NmapRun;
use crate::storage::{ensure_dir, TARGETS_FILE_NAME};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Host discovery backed by masscan.
#[derive(Debug)]
pub struct MasscanHostDiscovery {
    tool: ToolConfig,
    params: DiscoveryParams,
    report_path: PathBuf,
    written_targets: Option<PathBuf>,
    state: StrategyState,
}

impl MasscanHostDiscovery {
    pub fn new(tool: ToolConfig) -> Self {
        Self {
            tool,
            params: DiscoveryParams::default(),
            report_path: PathBuf::new(),
            written_targets: None,
            state: StrategyState::Unconfigured,
        }
    }

    /// XML report path passed to `-oX`.
    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Build the masscan command line for the configured parameters.
    pub fn build_command(&self) -> ToolCommand {
        let mut args = vec!["-p0-65535".to_string()];
        args.extend(self.params.options.iter().cloned());
        push_targets(&mut args, &self.params.targets, self.params.file_mode);
        args.push("-oX".to_string());
        args.push(self.report_path.display().to_string());

        ToolCommand::new(self.tool.masscan_path.clone(), args)
    }
}

#[async_trait]
impl ScanStrategy for MasscanHostDiscovery {
    type Params = DiscoveryParams;

    fn kind(&self) -> ScanKind {
        ScanKind::HostDiscovery
    }

    fn tool_name(&self) -> &'static str {
        "masscan"
    }

    fn state(&self) -> StrategyState {
        self.state
    }

    fn configure(&mut self, params: &DiscoveryParams) -> ScanResult<()> {
        self.params = params.clone();
        let base = discovery_dir(&self.tool).join(&params.output_file);
        self.report_path = artifact_path(&base, ".xml");
        self.written_targets = None;
        self.state = StrategyState::Configured;
        debug!(
            "Configured masscan host discovery: {} target(s), mode {} ignored",
            params.targets.len(),
            params.mode
        );
        Ok(())
    }

    async fn execute(&mut self, console: &Console) -> ScanResult<String> {
        self.state.require(StrategyState::Configured, "execute")?;

        let dir = discovery_dir(&self.tool);
        ensure_dir(&dir).map_err(|source| ScanError::OutputDir { path: dir, source })?;

        let command = self.build_command();
        info!("Executing masscan discovery: {}", command.command_line());
        console.running(&command.command_line());

        let spinner = console.spinner("Sweeping all ports...");
        let result = command.run(self.tool.timeout).await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        result?;

        let raw = read_artifact(&self.report_path)?;
        self.state = StrategyState::Executed;
        Ok(raw)
    }

    fn parse(&mut self, raw_output: &str, console: &Console) -> ScanResult<Vec<String>> {
        self.state.require(StrategyState::Executed, "parse")?;

        // masscan lists one host element per open port.
        let mut hosts = NmapRun::parse(raw_output)?.live_hosts();
        let mut seen = std::collections::HashSet::new();
        hosts.retain(|h| seen.insert(h.clone()));

        let path = discovery_dir(&self.tool).join(TARGETS_FILE_NAME);
        self.written_targets = persist_hosts(path, &hosts, console);
        self.state = StrategyState::Parsed;
        Ok(hosts)
    }

    fn written_targets(&self) -> Option<&Path> {
        self.written_targets.as_deref()
    }
}
