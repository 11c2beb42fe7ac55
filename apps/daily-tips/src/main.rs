mod clock;
mod config;
mod errors;
mod generation;
mod llm_client;
mod output;

use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::clock::SystemClock;
use crate::config::Config;
use crate::errors::{GenerationError, RunPhase};
use crate::generation::generator::{run, RunConfig};
use crate::llm_client::LlmClient;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Logging is not up yet; the filter comes from this config.
            eprintln!("Configuration error: {e:#}");
            return GenerationError::Config(e).exit_code();
        }
    };

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting daily-tips v{}", env!("CARGO_PKG_VERSION"));

    match generate(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(
                kind = e.kind(),
                phase = %e.phase(),
                "Run phase {} -> {}: {}",
                e.phase(),
                RunPhase::Failed,
                e
            );
            e.exit_code()
        }
    }
}

async fn generate(config: &Config) -> Result<(), GenerationError> {
    let client = LlmClient::new(config.api_url.clone()).context("failed to build HTTP client")?;
    info!("LLM client initialized (endpoint: {})", client.endpoint());

    let clock = SystemClock::new(config.utc_offset);
    let summary = run(&RunConfig::from_config(config), &clock, &client).await?;

    info!(
        "Wrote health tips for {} to {} ({} bytes)",
        summary.date,
        summary.output_path.display(),
        summary.bytes_written
    );
    Ok(())
}
