//! API smoke runner - Main Entry Point
//!
//! Registers a throwaway account against the configured API, checks the
//! profile endpoint with and without a user id, and prints every response.

use std::process::ExitCode;
use std::sync::Arc;

use smoke_application::SmokeRunner;
use smoke_infrastructure::{ConsoleReporter, ReqwestHttpClient, SmokeConfig, SystemClock};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the transcript
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "smoke run aborted");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = SmokeConfig::from_env()?;
    let target = config.target()?;

    tracing::info!(
        base_url = target.base_url(),
        "Starting api-smoke v{}",
        env!("CARGO_PKG_VERSION")
    );

    let runner = SmokeRunner::new(
        Arc::new(ReqwestHttpClient::new()?),
        Arc::new(SystemClock::new()),
        Arc::new(ConsoleReporter::stdout()),
        &target,
        config.run_options(),
    );
    let report = runner.run().await?;

    if config.strict
        && let Err(e) = report.ensure_passed()
    {
        eprintln!("check failed: {e}");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
