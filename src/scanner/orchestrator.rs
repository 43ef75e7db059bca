//! Drives a strategy through Configure, Execute and Parse.
//!
//! The orchestrator never looks at strategy internals. The first failing
//! stage aborts the run, and its error is wrapped with the stage and scan kind.

use super::portscan::NmapPortScanner;
use super::traits::{DiscoveryParams, ScanStrategy};
use crate::error::{PipelineError, Stage};
use crate::output::Console;
use std::sync::Arc;
use tracing::{debug, info};

/// Runs one scan strategy with a fixed parameter bundle.
pub struct Orchestrator<S: ScanStrategy + ?Sized> {
    strategy: Box<S>,
    params: S::Params,
    console: Arc<Console>,
}

/// Host discovery over any backend.
pub type HostDiscoveryOrchestrator = Orchestrator<dyn ScanStrategy<Params = DiscoveryParams>>;

/// Port scanning over nmap, with typed access to the decoded ports.
pub type PortScanOrchestrator = Orchestrator<NmapPortScanner>;

impl<S: ScanStrategy + ?Sized> Orchestrator<S> {
    pub fn new(strategy: Box<S>, params: S::Params, console: Arc<Console>) -> Self {
        Self {
            strategy,
            params,
            console,
        }
    }

    /// The strategy, e.g. to read structured results after a run.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn params(&self) -> &S::Params {
        &self.params
    }

    /// Run the full pipeline and return the strategy's result identifiers.
    pub async fn run(&mut self) -> Result<Vec<String>, PipelineError> {
        let kind = self.strategy.kind();
        info!("Starting {} with {}", kind, self.strategy.tool_name());

        self.strategy
            .configure(&self.params)
            .map_err(|e| PipelineError::new(Stage::Configure, kind, e))?;

        let raw = self
            .strategy
            .execute(&self.console)
            .await
            .map_err(|e| PipelineError::new(Stage::Execute, kind, e))?;
        debug!("{} produced {} bytes of report", kind, raw.len());

        let results = self
            .strategy
            .parse(&raw, &self.console)
            .map_err(|e| PipelineError::new(Stage::Parse, kind, e))?;

        info!("{} finished with {} result(s)", kind, results.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ScanError, ScanKind, ScanResult};
    use crate::scanner::traits::StrategyState;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records which stages ran and fails on request.
    struct ScriptedStrategy {
        calls: Arc<Mutex<Vec<&'static str>>>,
        fail_at: Option<Stage>,
        state: StrategyState,
    }

    impl ScriptedStrategy {
        fn new(fail_at: Option<Stage>) -> (Self, Arc<Mutex<Vec<&'static str>>>) {
            let calls = Arc::new(Mutex::new(Vec::new()));
            let strategy = Self {
                calls: Arc::clone(&calls),
                fail_at,
                state: StrategyState::Unconfigured,
            };
            (strategy, calls)
        }

        fn record(&self, stage: Stage, name: &'static str) -> ScanResult<()> {
            self.calls.lock().unwrap().push(name);
            if self.fail_at == Some(stage) {
                Err(ScanError::Decode(format!("{name} exploded")))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ScanStrategy for ScriptedStrategy {
        type Params = DiscoveryParams;

        fn kind(&self) -> ScanKind {
            ScanKind::HostDiscovery
        }

        fn tool_name(&self) -> &'static str {
            "scripted"
        }

        fn state(&self) -> StrategyState {
            self.state
        }

        fn configure(&mut self, _params: &DiscoveryParams) -> ScanResult<()> {
            self.record(Stage::Configure, "configure")?;
            self.state = StrategyState::Configured;
            Ok(())
        }

        async fn execute(&mut self, _console: &Console) -> ScanResult<String> {
            self.record(Stage::Execute, "execute")?;
            self.state = StrategyState::Executed;
            Ok("raw".to_string())
        }

        fn parse(&mut self, raw_output: &str, _console: &Console) -> ScanResult<Vec<String>> {
            self.record(Stage::Parse, "parse")?;
            self.state = StrategyState::Parsed;
            Ok(vec![raw_output.to_string()])
        }
    }

    fn orchestrator(
        fail_at: Option<Stage>,
    ) -> (HostDiscoveryOrchestrator, Arc<Mutex<Vec<&'static str>>>) {
        let (strategy, calls) = ScriptedStrategy::new(fail_at);
        let (console, _) = Console::buffered();
        let orchestrator = Orchestrator::new(
            Box::new(strategy) as Box<dyn ScanStrategy<Params = DiscoveryParams>>,
            DiscoveryParams::default(),
            Arc::new(console),
        );
        (orchestrator, calls)
    }

    #[tokio::test]
    async fn test_runs_all_stages_in_order() {
        let (mut orchestrator, calls) = orchestrator(None);
        let results = orchestrator.run().await.unwrap();
        assert_eq!(results, vec!["raw"]);
        assert_eq!(*calls.lock().unwrap(), vec!["configure", "execute", "parse"]);
        assert_eq!(orchestrator.strategy().state(), StrategyState::Parsed);
    }

    #[tokio::test]
    async fn test_execute_failure_skips_parse() {
        let (mut orchestrator, calls) = orchestrator(Some(Stage::Execute));
        let err = orchestrator.run().await.unwrap_err();

        assert_eq!(err.stage, Stage::Execute);
        assert_eq!(err.kind, ScanKind::HostDiscovery);
        assert_eq!(
            err.to_string(),
            "failed to execute host discovery: failed to decode scan report: execute exploded"
        );
        assert_eq!(*calls.lock().unwrap(), vec!["configure", "execute"]);
    }

    #[tokio::test]
    async fn test_configure_failure_stops_immediately() {
        let (mut orchestrator, calls) = orchestrator(Some(Stage::Configure));
        let err = orchestrator.run().await.unwrap_err();
        assert_eq!(err.stage, Stage::Configure);
        assert_eq!(*calls.lock().unwrap(), vec!["configure"]);
    }

    #[tokio::test]
    async fn test_parse_failure_message() {
        let (mut orchestrator, _) = orchestrator(Some(Stage::Parse));
        let err = orchestrator.run().await.unwrap_err();
        assert_eq!(err.stage, Stage::Parse);
        assert!(err
            .to_string()
            .starts_with("failed to parse host discovery output: "));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_port_scan_against_fake_nmap() {
        use crate::report::fixtures::PORT_SCAN_XML;
        use crate::scanner::testing::fake_tool;
        use crate::scanner::{PortScanParams, ToolConfig};
        use crate::types::TargetInput;

        let dir = tempfile::tempdir().unwrap();
        let nmap = fake_tool(dir.path(), "nmap", PORT_SCAN_XML);
        let tool = ToolConfig::default()
            .with_output_root(dir.path())
            .with_nmap_path(nmap.display().to_string());
        let params = PortScanParams::new(TargetInput::parse("10.0.0.7").unwrap(), "portscan")
            .with_categories("web");

        let (console, buffer) = Console::buffered();
        let mut orchestrator = PortScanOrchestrator::new(
            Box::new(NmapPortScanner::new(tool)),
            params,
            Arc::new(console),
        );
        let results = orchestrator.run().await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(orchestrator.strategy().open_ports()[1].port, 80);
        assert!(buffer.contents().contains("-p 80,443,1313,"));

        let args = std::fs::read_to_string(dir.path().join("nmap.args")).unwrap();
        assert!(args.contains("--open"));
        assert!(args.contains("portScan/portscan"));
    }
}
