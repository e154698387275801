//! Core types for the agent system.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::llm::{LlmError, Role};

/// Unique identifier for an agent, used to tag log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(Uuid);

impl AgentId {
    /// Create a new unique agent ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur in agent operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AgentError {
    /// The model call failed. Never retried.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// `step` was handed something other than a human message.
    #[error("Agent step expects a human message, got {0}")]
    UnexpectedRole(Role),
}
