//! Error types for the onboarding and registration flows.

use thiserror::Error;

/// Result type alias for Streakly operations.
pub type StreaklyResult<T> = Result<T, StreaklyError>;

/// Errors that can occur while building or driving a flow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreaklyError {
    /// A step registry must contain at least one step.
    #[error("Step registry is empty")]
    EmptyRegistry,

    /// Two steps in a registry share the same id.
    #[error("Duplicate step id: {0}")]
    DuplicateStepId(String),

    /// Outcome tag not in the fixed set.
    #[error("Unknown outcome: {0}")]
    UnknownOutcome(String),

    /// Completion was requested from a step that is not the last one.
    #[error("Step {index} is not the terminal step")]
    NotTerminal { index: usize },

    /// The sequencer has not been started yet.
    #[error("Flow not started")]
    NotStarted,

    /// The flow already completed or was unmounted.
    #[error("Flow already finished")]
    FlowFinished,

    /// Configuration value out of range.
    #[error("Invalid config field '{field}': {message}")]
    InvalidConfig { field: String, message: String },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StreaklyError {
    /// Creates a DuplicateStepId error.
    pub fn duplicate_step_id(id: impl Into<String>) -> Self {
        Self::DuplicateStepId(id.into())
    }

    /// Creates an UnknownOutcome error.
    pub fn unknown_outcome(tag: impl Into<String>) -> Self {
        Self::UnknownOutcome(tag.into())
    }

    /// Creates a NotTerminal error.
    pub fn not_terminal(index: usize) -> Self {
        Self::NotTerminal { index }
    }

    /// Creates an InvalidConfig error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a Serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

impl From<serde_json::Error> for StreaklyError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
