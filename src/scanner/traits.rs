//! Scan strategy trait abstraction.
//!
//! A strategy knows how to turn a parameter bundle into external tool
//! arguments, run the tool, and decode its report. Orchestrators drive any
//! strategy through the same Configure, Execute, Parse sequence.

use crate::error::{ScanError, ScanKind, ScanResult};
use crate::output::Console;
use crate::types::{ScanMode, TargetInput};
use async_trait::async_trait;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Lifecycle of a strategy. Transitions only move forward one step at a time;
/// `configure` may be called again to start over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyState {
    #[default]
    Unconfigured,
    Configured,
    Executed,
    Parsed,
}

impl StrategyState {
    /// Fail unless the strategy is currently in `required`.
    pub fn require(self, required: StrategyState, operation: &'static str) -> ScanResult<()> {
        if self == required {
            Ok(())
        } else {
            Err(ScanError::OutOfOrder {
                operation,
                state: self,
            })
        }
    }
}

impl fmt::Display for StrategyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconfigured => write!(f, "unconfigured"),
            Self::Configured => write!(f, "configured"),
            Self::Executed => write!(f, "executed"),
            Self::Parsed => write!(f, "parsed"),
        }
    }
}

/// Where and how external tools are run.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// nmap binary.
    pub nmap_path: String,
    /// masscan binary.
    pub masscan_path: String,
    /// Directory under which per-scan output directories are created.
    pub output_root: PathBuf,
    /// Kill the tool if it runs longer than this.
    pub timeout: Option<Duration>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            nmap_path: "nmap".to_string(),
            masscan_path: "masscan".to_string(),
            output_root: PathBuf::from("."),
            timeout: None,
        }
    }
}

impl ToolConfig {
    /// Set the output root directory.
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    /// Set the nmap binary.
    pub fn with_nmap_path(mut self, path: impl Into<String>) -> Self {
        self.nmap_path = path.into();
        self
    }

    /// Set the masscan binary.
    pub fn with_masscan_path(mut self, path: impl Into<String>) -> Self {
        self.masscan_path = path.into();
        self
    }

    /// Set the tool timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Parameters for a host discovery scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryParams {
    /// Targets, or the target file path in file mode.
    pub targets: Vec<String>,
    /// Base name for the output artifacts.
    pub output_file: String,
    pub mode: ScanMode,
    /// Extra tool options, passed through in order.
    pub options: Vec<String>,
    pub file_mode: bool,
}

impl DiscoveryParams {
    /// Create parameters from parsed target input.
    pub fn new(input: TargetInput, output_file: impl Into<String>) -> Self {
        Self {
            targets: input.targets,
            output_file: output_file.into(),
            mode: ScanMode::default(),
            options: Vec::new(),
            file_mode: input.file_mode,
        }
    }

    /// Set the scan mode.
    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set extra tool options.
    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }
}

/// Parameters for a port scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortScanParams {
    /// Targets, or the target file path in file mode.
    pub targets: Vec<String>,
    /// Base name for the output artifacts.
    pub output_file: String,
    pub mode: ScanMode,
    /// Extra tool options, passed through in order.
    pub options: Vec<String>,
    /// Raw port specification, e.g. `"22,80,1000-1010"`.
    pub port_list: String,
    /// Comma-separated category names, e.g. `"web,database"`.
    pub categories: String,
    /// Scan every port; overrides `port_list` and `categories`.
    pub all_ports: bool,
    /// Plain SYN scan instead of service and script detection.
    pub simple_scan: bool,
    pub file_mode: bool,
}

impl PortScanParams {
    /// Create parameters from parsed target input.
    pub fn new(input: TargetInput, output_file: impl Into<String>) -> Self {
        Self {
            targets: input.targets,
            output_file: output_file.into(),
            file_mode: input.file_mode,
            ..Self::default()
        }
    }

    /// Set the scan mode.
    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set extra tool options.
    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    /// Set the explicit port specification.
    pub fn with_ports(mut self, ports: impl Into<String>) -> Self {
        self.port_list = ports.into();
        self
    }

    /// Set the port categories.
    pub fn with_categories(mut self, categories: impl Into<String>) -> Self {
        self.categories = categories.into();
        self
    }

    /// Scan all ports.
    pub fn with_all_ports(mut self, all_ports: bool) -> Self {
        self.all_ports = all_ports;
        self
    }

    /// Use the simple SYN scan.
    pub fn with_simple_scan(mut self, simple_scan: bool) -> Self {
        self.simple_scan = simple_scan;
        self
    }
}

/// Trait for scan strategy implementations.
///
/// This trait abstracts the backend tool, allowing orchestrators to run
/// nmap, masscan, or any future backend interchangeably.
///
/// # Example
///
/// ```ignore
/// use reconnoiter::scanner::{NmapHostDiscovery, ScanStrategy, ToolConfig};
///
/// let mut strategy = NmapHostDiscovery::new(ToolConfig::default());
/// strategy.configure(&params)?;
/// let raw = strategy.execute(&console).await?;
/// let hosts = strategy.parse(&raw, &console)?;
/// ```
#[async_trait]
pub trait ScanStrategy: Send {
    /// Parameter bundle this strategy is configured with.
    type Params: Send + Sync;

    /// The kind of scan performed.
    fn kind(&self) -> ScanKind;

    /// Name of the backend tool.
    fn tool_name(&self) -> &'static str;

    /// Current lifecycle state.
    fn state(&self) -> StrategyState;

    /// Copy parameters into the strategy and derive its working state.
    fn configure(&mut self, params: &Self::Params) -> ScanResult<()>;

    /// Run the external tool and return the raw structured report.
    async fn execute(&mut self, console: &Console) -> ScanResult<String>;

    /// Decode a raw report into result identifiers.
    fn parse(&mut self, raw_output: &str, console: &Console) -> ScanResult<Vec<String>>;

    /// Target list written by the last `parse`, if the write succeeded.
    fn written_targets(&self) -> Option<&Path> {
        None
    }
}

/// Append an artifact suffix (`.xml`) to an output base path.
///
/// Base names may contain dots, so this never replaces an existing extension.
pub fn artifact_path(base: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(suffix);
    PathBuf::from(path)
}
