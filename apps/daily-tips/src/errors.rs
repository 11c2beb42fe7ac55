use std::fmt;
use std::process::ExitCode;

use thiserror::Error;

use crate::llm_client::LlmError;

/// Phases of a single generation run.
///
/// `Init → PromptBuilt → ApiCalled → ReplyValidated → Written → Done`;
/// any phase may end in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    PromptBuilt,
    ApiCalled,
    ReplyValidated,
    Written,
    Done,
    Failed,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Init => "init",
            RunPhase::PromptBuilt => "prompt_built",
            RunPhase::ApiCalled => "api_called",
            RunPhase::ReplyValidated => "reply_validated",
            RunPhase::Written => "written",
            RunPhase::Done => "done",
            RunPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Every way a run can fail. All variants are terminal: nothing is retried.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Configuration error: {0:#}")]
    Config(#[from] anyhow::Error),

    #[error("Network error (no response received): {0}")]
    Network(String),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed reply: {0}")]
    MalformedReply(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),
}

impl GenerationError {
    /// The last phase that was entered before the failure.
    pub fn phase(&self) -> RunPhase {
        match self {
            GenerationError::Config(_) => RunPhase::Init,
            GenerationError::Network(_) | GenerationError::Api { .. } => RunPhase::PromptBuilt,
            GenerationError::MalformedReply(_) => RunPhase::ApiCalled,
            GenerationError::FileSystem(_) => RunPhase::ReplyValidated,
        }
    }

    /// Short stable label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Config(_) => "CONFIG_ERROR",
            GenerationError::Network(_) => "NETWORK_ERROR",
            GenerationError::Api { .. } => "API_ERROR",
            GenerationError::MalformedReply(_) => "MALFORMED_REPLY",
            GenerationError::FileSystem(_) => "FILE_SYSTEM_ERROR",
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    fn exit_status(&self) -> u8 {
        match self {
            GenerationError::Config(_) => 2,
            GenerationError::Network(_) => 3,
            GenerationError::Api { .. } => 4,
            GenerationError::MalformedReply(_) => 5,
            GenerationError::FileSystem(_) => 6,
        }
    }
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Http(e) => GenerationError::Network(e.to_string()),
            LlmError::Api { status, body } => GenerationError::Api { status, body },
            LlmError::Decode(msg) => GenerationError::MalformedReply(msg),
            LlmError::EmptyContent => {
                GenerationError::MalformedReply("completion carried no message content".into())
            }
        }
    }
}
