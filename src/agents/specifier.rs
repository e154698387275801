//! Task specifier - one-shot rewrite of a coarse task into a specific one.

use std::sync::Arc;

use crate::agents::{AgentError, ConversationAgent};
use crate::llm::{ChatMessage, ChatOptions, LlmClient};
use crate::prompts::{task_specifier_prompt, TASK_SPECIFIER_SYSTEM};

/// Sampling temperature for the specifier; high to favor creative rewrites.
pub const SPECIFIER_TEMPERATURE: f64 = 1.0;

/// Default upper bound on the specified task's length, in words.
pub const DEFAULT_WORD_LIMIT: usize = 25;

/// Narrows a raw task description using a single model step.
pub struct TaskSpecifier {
    llm: Arc<dyn LlmClient>,
    model: String,
    word_limit: usize,
}

impl TaskSpecifier {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>, word_limit: usize) -> Self {
        Self {
            llm,
            model: model.into(),
            word_limit,
        }
    }

    /// Return the model's specified version of `task`.
    ///
    /// There is no fallback to the raw task: a failed call is an error.
    pub async fn specify(
        &self,
        assistant_role_name: &str,
        user_role_name: &str,
        task: &str,
    ) -> Result<String, AgentError> {
        let mut agent = ConversationAgent::new(
            ChatMessage::system(TASK_SPECIFIER_SYSTEM),
            Arc::clone(&self.llm),
            self.model.clone(),
            ChatOptions::with_temperature(SPECIFIER_TEMPERATURE),
        );

        let prompt = ChatMessage::human(task_specifier_prompt(
            assistant_role_name,
            user_role_name,
            task,
            self.word_limit,
        ));
        let reply = agent.step(prompt).await?;

        tracing::info!("Specified task: {}", reply.content());
        Ok(reply.content().to_string())
    }
}
