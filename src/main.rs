use anyhow::Result;
use clap::Parser;
use reconnoiter::cli::{AppContext, Cli};
use reconnoiter::config::{init_logging, AppSettings};
use reconnoiter::output::Console;
use std::process::ExitCode;
use tracing::{error, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let color = !cli.no_color;

    match run(cli, Console::stdout(color)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            Console::stdout(color).error(e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, console: Console) -> Result<()> {
    let (mut settings, config_error) = AppSettings::load_or_default(cli.config.as_deref());
    cli.apply_overrides(&mut settings);

    if let Some(e) = init_logging(&settings) {
        warn!("{}; logging to the console only", e);
    }
    if let Some(e) = config_error {
        warn!("{}; using default settings", e);
    }

    if !cli.quiet {
        console.banner();
    }

    let ctx = AppContext::new(settings, console, cli.quiet);
    cli.run_until(&ctx, interrupted()).await?;
    Ok(())
}

/// Resolves on the first Ctrl-C. Never resolves if the handler can't be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
