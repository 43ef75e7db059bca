//! Error types for Reconnoiter.
//!
//! Uses `thiserror` for ergonomic error definitions.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::scanner::StrategyState;
use crate::types::TargetError;

/// Errors raised by a scan strategy while configuring, running the external
/// tool, or decoding its report.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} execution failed ({status})")]
    ToolFailed {
        tool: String,
        status: String,
        /// Combined stdout and stderr of the tool, kept for diagnostics.
        output: String,
    },

    #[error("failed to read XML file {path}: {source}")]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode scan report: {0}")]
    Decode(String),

    #[error("cannot {operation} while strategy is {state}")]
    OutOfOrder {
        operation: &'static str,
        state: StrategyState,
    },

    #[error("external tool timed out after {0:?}")]
    TimedOut(Duration),

    #[error("scan cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for strategy operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Pipeline stage an orchestrator was running when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configure,
    Execute,
    Parse,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configure => write!(f, "configure"),
            Self::Execute => write!(f, "execute"),
            Self::Parse => write!(f, "parse"),
        }
    }
}

/// The kind of scan a strategy performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    HostDiscovery,
    PortScan,
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HostDiscovery => write!(f, "host discovery"),
            Self::PortScan => write!(f, "port scan"),
        }
    }
}

/// A strategy failure tagged with the stage that produced it.
#[derive(Debug)]
pub struct PipelineError {
    pub stage: Stage,
    pub kind: ScanKind,
    pub source: ScanError,
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stage {
            Stage::Parse => write!(
                f,
                "failed to parse {} output: {}",
                self.kind, self.source
            ),
            stage => write!(f, "failed to {} {}: {}", stage, self.kind, self.source),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl PipelineError {
    pub fn new(stage: Stage, kind: ScanKind, source: ScanError) -> Self {
        Self {
            stage,
            kind,
            source,
        }
    }
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine the user configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid configuration format: {0}")]
    InvalidFormat(String),

    #[error("failed to open log file {path}: {reason}")]
    LogFile { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidFormat(e.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::InvalidFormat(e.to_string())
    }
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors surfaced at the command-line boundary.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<csv::Error> for CliError {
    fn from(e: csv::Error) -> Self {
        Self::Other(format!("CSV error: {}", e))
    }
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
