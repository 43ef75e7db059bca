//! # Reconnoiter - Network Reconnaissance Orchestrator
//!
//! Reconnoiter drives external scanners (nmap, masscan) through a fixed
//! recon workflow: find live hosts, then scan their ports. It owns input
//! validation, port list construction, tool invocation, and result
//! extraction; the packet work belongs to the tools.
//!
//! ## Features
//!
//! - **Target Parsing**: IPv4 addresses, CIDR blocks, or a file of targets
//! - **Port Categories**: Named port groups merged with explicit lists
//! - **Pluggable Strategies**: nmap or masscan host discovery, nmap port scans
//! - **Staged Errors**: Every failure names the stage and scan that produced it
//! - **Reports**: Saved XML rendered as plain text, JSON, or CSV
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use reconnoiter::output::Console;
//! use reconnoiter::scanner::{
//!     host_discovery_strategy, DiscoveryEngine, DiscoveryParams, Orchestrator, ToolConfig,
//! };
//! use reconnoiter::types::TargetInput;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let input = TargetInput::parse("192.168.1.0/24").unwrap();
//!     let params = DiscoveryParams::new(input, "targets");
//!     let strategy = host_discovery_strategy(DiscoveryEngine::Nmap, ToolConfig::default());
//!
//!     let mut orchestrator = Orchestrator::new(strategy, params, Arc::new(Console::default()));
//!     for host in orchestrator.run().await.unwrap() {
//!         println!("{host} is up");
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`types`] - Target input, scan modes, and port lists
//! - [`categories`] - The named port category table
//! - [`scanner`] - Scan strategies, tool invocation, and the orchestrator
//! - [`report`] - Decoding of nmap-style XML reports
//! - [`storage`] - The discovered-hosts targets file
//! - [`config`] - Settings files and logging setup
//! - [`output`] - Console messages and report formatting
//! - [`error`] - Error types

pub mod categories;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod report;
pub mod scanner;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, PipelineError, ScanError, ScanKind, Stage};
pub use scanner::{
    HostDiscoveryOrchestrator, Orchestrator, PortScanOrchestrator, ScanStrategy, StrategyState,
};
pub use types::{combine_port_lists, parse_target_input, PortList, ScanMode, TargetInput};
