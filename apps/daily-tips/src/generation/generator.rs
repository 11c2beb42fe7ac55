//! Daily record generation — the whole run, start to finish.
//!
//! Flow: check credential → compute canonical date → build prompt →
//!       one completion call → extract/validate reply → atomic write.
//!
//! Nothing touches the output file until the reply has been validated in
//! memory, so a failed run leaves the previous file as it was.

use std::path::PathBuf;

use anyhow::anyhow;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::{Config, API_KEY_VAR};
use crate::errors::{GenerationError, RunPhase};
use crate::generation::prompts::build_health_tips_prompt;
use crate::generation::record::parse_reply;
use crate::llm_client::{CompletionRequest, CompletionTransport, MODEL, TEMPERATURE};
use crate::output::write_json_atomic;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Everything a run needs besides the clock and the transport.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub api_key: Option<String>,
    pub output_path: PathBuf,
    pub model: String,
    pub temperature: f32,
}

impl RunConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.api_key.clone(),
            output_path: config.output_path.clone(),
            model: MODEL.to_string(),
            temperature: TEMPERATURE,
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub date: String,
    pub output_path: PathBuf,
    pub bytes_written: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Run
// ────────────────────────────────────────────────────────────────────────────

/// Generates today's record and writes it to `config.output_path`.
///
/// Makes at most one call on `transport`, and none at all when the
/// credential is missing or blank.
pub async fn run(
    config: &RunConfig,
    clock: &dyn Clock,
    transport: &dyn CompletionTransport,
) -> Result<RunSummary, GenerationError> {
    let phase = RunPhase::Init;

    let api_key = config
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| GenerationError::Config(anyhow!("{API_KEY_VAR} is not set or is empty")))?;

    let date = clock.today_string();
    let prompt = build_health_tips_prompt(&date);
    let request = CompletionRequest::user(&config.model, prompt, config.temperature);
    let phase = advance(phase, RunPhase::PromptBuilt);

    info!(
        "Requesting health tips for {} (model: {})",
        date, config.model
    );
    let raw_reply = transport.complete(api_key, &request).await?;
    let phase = advance(phase, RunPhase::ApiCalled);
    debug!("Reply received: {} chars", raw_reply.len());

    let record = parse_reply(&raw_reply, &date)?;
    let phase = advance(phase, RunPhase::ReplyValidated);

    let bytes_written = write_json_atomic(&config.output_path, &record)?;
    let phase = advance(phase, RunPhase::Written);

    advance(phase, RunPhase::Done);

    Ok(RunSummary {
        date,
        output_path: config.output_path.clone(),
        bytes_written,
    })
}

fn advance(from: RunPhase, to: RunPhase) -> RunPhase {
    debug!("Run phase {} -> {}", from, to);
    to
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
