//! Error types for the sanitization core.

/// Host-boundary operation failures.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The platform cannot substitute an already-composed reply.
    ///
    /// Recovered locally: the orchestrator withholds delivery instead.
    #[error("platform {platform} does not support reply substitution")]
    Unsupported { platform: String },
}

/// Unexpected failure inside a filter stage.
///
/// Never reaches the host: the orchestrator logs it and lets the original
/// message through unmodified, without committing state.
#[derive(Debug, thiserror::Error)]
#[error("stage {stage} failed: {reason}")]
pub struct StageError {
    /// Name of the failing stage.
    pub stage: &'static str,
    /// What went wrong.
    pub reason: String,
}

impl StageError {
    pub fn new(stage: &'static str, reason: impl Into<String>) -> Self {
        Self {
            stage,
            reason: reason.into(),
        }
    }
}

/// Configuration rejected at pipeline construction.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid removal pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
