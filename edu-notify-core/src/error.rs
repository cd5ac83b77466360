//! Error types

use thiserror::Error;

/// Failure of an action effect.
///
/// Never propagated to the caller that invoked the action; it is logged and
/// reported back as an [`ActionOutcome`](crate::tasks::ActionOutcome).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("no handler registered for action `{0}`")]
    UnknownAction(String),

    #[error("action failed: {0}")]
    Failed(String),

    #[error("action task aborted")]
    Aborted,
}

impl ActionError {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}

/// Invalid configuration values or unreadable configuration input.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
