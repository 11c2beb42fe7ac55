use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::FixedOffset;

use crate::llm_client::DEFAULT_API_URL;
use crate::output::DEFAULT_OUTPUT_PATH;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;

/// Configuration loaded from environment variables.
///
/// The credential is kept optional here; the run itself rejects a missing or
/// blank key before any network call.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_url: String,
    pub output_path: PathBuf,
    pub utc_offset: FixedOffset,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let utc_offset = match lookup("DAILY_TIPS_UTC_OFFSET_HOURS") {
            Some(raw) => {
                let hours = raw
                    .trim()
                    .parse::<i32>()
                    .context("DAILY_TIPS_UTC_OFFSET_HOURS must be a whole number of hours")?;
                offset_from_hours(hours)?
            }
            None => offset_from_hours(DEFAULT_UTC_OFFSET_HOURS)?,
        };

        Ok(Config {
            api_key: lookup(API_KEY_VAR),
            api_url: lookup("COMPLETION_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            output_path: lookup("DAILY_TIPS_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            utc_offset,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn offset_from_hours(hours: i32) -> Result<FixedOffset> {
    if !(-12..=14).contains(&hours) {
        bail!("UTC offset {hours}h is outside -12..=14");
    }
    FixedOffset::east_opt(hours * 3600).with_context(|| format!("invalid UTC offset {hours}h"))
}
