//! Conversation agent - a system message plus an append-only history.
//!
//! # Invariants
//! - `history[0]` is always the system message
//! - `step()` grows the history by exactly two messages on success
//!   (the input and the reply) and by none on failure
//! - only `reset()` shrinks the history, and only back to `[system]`

use std::sync::Arc;

use crate::agents::{AgentError, AgentId};
use crate::llm::{ChatMessage, ChatOptions, LlmClient, Role};

/// A single role-playing participant.
///
/// Owned by whoever created it; usage is strictly sequential, which `step`
/// taking `&mut self` enforces.
pub struct ConversationAgent {
    id: AgentId,
    system_message: ChatMessage,
    history: Vec<ChatMessage>,
    llm: Arc<dyn LlmClient>,
    model: String,
    options: ChatOptions,
}

impl ConversationAgent {
    /// Create an agent whose history starts as `[system_message]`.
    pub fn new(
        system_message: ChatMessage,
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
        options: ChatOptions,
    ) -> Self {
        let history = vec![system_message.clone()];
        Self {
            id: AgentId::new(),
            system_message,
            history,
            llm,
            model: model.into(),
            options,
        }
    }

    pub fn id(&self) -> &AgentId {
        &self.id
    }

    pub fn system_message(&self) -> &ChatMessage {
        &self.system_message
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Truncate the history back to the system message.
    pub fn reset(&mut self) -> &[ChatMessage] {
        self.history.clear();
        self.history.push(self.system_message.clone());
        &self.history
    }

    /// Send `input` with the whole history and append the model's reply.
    ///
    /// On model failure the input is rolled back out of the history so the
    /// agent is left as it was before the call.
    pub async fn step(&mut self, input: ChatMessage) -> Result<ChatMessage, AgentError> {
        if input.role() != Role::User {
            return Err(AgentError::UnexpectedRole(input.role()));
        }

        self.history.push(input);

        let response = match self
            .llm
            .chat_completion(&self.model, &self.history, self.options)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                self.history.pop();
                tracing::error!("Agent {} step failed: {}", self.id, e);
                return Err(e.into());
            }
        };

        if let Some(usage) = response.usage {
            tracing::debug!(
                "Agent {} step used {} prompt + {} completion tokens",
                self.id,
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        let reply = response.into_message();
        self.history.push(reply.clone());
        Ok(reply)
    }
}
