//! Scanner module - runs external scanning tools.
//!
//! Each backend is a [`ScanStrategy`]; an [`Orchestrator`] drives it through
//! configure, execute and parse. Host discovery can run on nmap or masscan,
//! port scanning runs on nmap.

mod command;
mod discovery;
mod masscan;
mod orchestrator;
mod portscan;
mod traits;

pub use command::ToolCommand;
pub use discovery::{NmapHostDiscovery, HOST_DISCOVERY_DIR, HOST_PROBE};
pub use masscan::MasscanHostDiscovery;
pub use orchestrator::{HostDiscoveryOrchestrator, Orchestrator, PortScanOrchestrator};
pub use portscan::{NmapPortScanner, PORT_SCAN_DIR};
pub use traits::{
    artifact_path, DiscoveryParams, PortScanParams, ScanStrategy, StrategyState, ToolConfig,
};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend used for host discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryEngine {
    /// nmap ping sweep
    #[default]
    Nmap,
    /// masscan full port sweep
    Masscan,
}

impl fmt::Display for DiscoveryEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nmap => write!(f, "nmap"),
            Self::Masscan => write!(f, "masscan"),
        }
    }
}

/// Create the host discovery strategy for an engine.
pub fn host_discovery_strategy(
    engine: DiscoveryEngine,
    tool: ToolConfig,
) -> Box<dyn ScanStrategy<Params = DiscoveryParams>> {
    match engine {
        DiscoveryEngine::Nmap => Box::new(NmapHostDiscovery::new(tool)),
        DiscoveryEngine::Masscan => Box::new(MasscanHostDiscovery::new(tool)),
    }
}

#[cfg(all(test, unix))]
pub(crate) mod testing {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// Write an executable stand-in for a scanner.
    ///
    /// The script records its arguments in `<dir>/<name>.args` and writes
    /// `report` to the path given after `-oA` (plus `.xml`) or `-oX`.
    pub fn fake_tool(dir: &Path, name: &str, report: &str) -> PathBuf {
        let path = dir.join(name);
        let script = format!(
            r#"#!/bin/sh
echo "$@" > "$(dirname "$0")/{name}.args"
out=""
while [ $# -gt 0 ]; do
  case "$1" in
    -oA) out="$2.xml"; shift ;;
    -oX) out="$2"; shift ;;
  esac
  shift
done
cat > "$out" <<'REPORT'
{report}
REPORT
"#
        );
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }
}
