//! nmap ping-sweep host discovery.
//!
//! Runs `nmap -sn` with a TCP SYN probe against the requested targets and
//! records every responding IPv4 host in a reusable targets file.

use super::command::ToolCommand;
use super::traits::{artifact_path, DiscoveryParams, ScanStrategy, StrategyState, ToolConfig};
use crate::error::{ScanError, ScanKind, ScanResult};
use crate::output::Console;
use crate::report::NmapRun;
use crate::storage::{ensure_dir, write_targets, TARGETS_FILE_NAME};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Subdirectory of the output root holding host discovery artifacts.
pub const HOST_DISCOVERY_DIR: &str = "hostDiscovery";

/// TCP SYN ping probe used to decide whether a host is up.
pub const HOST_PROBE: &str = "-PS21,22,23,25,80,443,445,3389,8080";

/// Host discovery backed by nmap.
#[derive(Debug)]
pub struct NmapHostDiscovery {
    tool: ToolConfig,
    params: DiscoveryParams,
    output_base: PathBuf,
    written_targets: Option<PathBuf>,
    state: StrategyState,
}

impl NmapHostDiscovery {
    pub fn new(tool: ToolConfig) -> Self {
        Self {
            tool,
            params: DiscoveryParams::default(),
            output_base: PathBuf::new(),
            written_targets: None,
            state: StrategyState::Unconfigured,
        }
    }

    /// Directory receiving the scan artifacts.
    pub fn output_dir(&self) -> PathBuf {
        discovery_dir(&self.tool)
    }

    /// Base path passed to `-oA`.
    pub fn output_base(&self) -> &Path {
        &self.output_base
    }

    /// Path of the targets file written by `parse`.
    pub fn targets_file(&self) -> PathBuf {
        self.output_dir().join(TARGETS_FILE_NAME)
    }

    /// Build the nmap command line for the configured parameters.
    pub fn build_command(&self) -> ToolCommand {
        let mut args = vec!["-sn".to_string(), HOST_PROBE.to_string()];
        args.extend(self.params.options.iter().cloned());
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
impl ScanStrategy for NmapHostDiscovery {
    type Params = DiscoveryParams;

    fn kind(&self) -> ScanKind {
        ScanKind::HostDiscovery
    }

    fn tool_name(&self) -> &'static str {
        "nmap"
    }

    fn state(&self) -> StrategyState {
        self.state
    }

    fn configure(&mut self, params: &DiscoveryParams) -> ScanResult<()> {
        self.params = params.clone();
        self.output_base = self.output_dir().join(&params.output_file);
        self.written_targets = None;
        self.state = StrategyState::Configured;
        debug!(
            "Configured nmap host discovery: {} target(s), mode {}",
            params.targets.len(),
            params.mode
        );
        Ok(())
    }

    async fn execute(&mut self, console: &Console) -> ScanResult<String> {
        self.state.require(StrategyState::Configured, "execute")?;

        let dir = self.output_dir();
        ensure_dir(&dir).map_err(|source| ScanError::OutputDir { path: dir, source })?;

        let command = self.build_command();
        info!("Executing host discovery: {}", command.command_line());
        console.running(&command.command_line());

        let spinner = console.spinner("Discovering live hosts...");
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

        let hosts = NmapRun::parse(raw_output)?.live_hosts();
        self.written_targets = persist_hosts(self.targets_file(), &hosts, console);
        self.state = StrategyState::Parsed;
        Ok(hosts)
    }

    fn written_targets(&self) -> Option<&Path> {
        self.written_targets.as_deref()
    }
}

/// Host discovery output directory under the configured root.
pub(crate) fn discovery_dir(tool: &ToolConfig) -> PathBuf {
    tool.output_root.join(HOST_DISCOVERY_DIR)
}

/// Append `-iL <file>` in file mode, or each target otherwise.
pub(crate) fn push_targets(args: &mut Vec<String>, targets: &[String], file_mode: bool) {
    if file_mode {
        if let Some(file) = targets.first() {
            args.push("-iL".to_string());
            args.push(file.clone());
        }
    } else {
        args.extend(targets.iter().cloned());
    }
}

/// Read the XML report a tool left behind.
pub(crate) fn read_artifact(path: &Path) -> ScanResult<String> {
    std::fs::read_to_string(path).map_err(|source| ScanError::ArtifactRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Write discovered hosts to the targets file.
///
/// Failure is reported but does not fail the scan; the host list is still
/// returned to the caller. Returns the path only when the write succeeded.
pub(crate) fn persist_hosts(path: PathBuf, hosts: &[String], console: &Console) -> Option<PathBuf> {
    match write_targets(&path, hosts) {
        Ok(()) => {
            info!("Wrote {} host(s) to {}", hosts.len(), path.display());
            console.created(path.display());
            Some(path)
        }
        Err(e) => {
            error!("Failed to write targets file {}: {}", path.display(), e);
            console.warning(format_args!("Could not write {}: {}", path.display(), e));
            None
        }
    }
}
