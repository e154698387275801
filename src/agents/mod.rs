//! Agents module - the conversational participants of a simulation.
//!
//! # Agent Types
//! - **ConversationAgent**: system message + append-only history, one model
//!   call per `step`
//! - **TaskSpecifier**: one-shot agent that narrows the raw task
//!
//! Both role-playing participants (instructor and executor) are plain
//! `ConversationAgent`s configured with different system messages.

mod conversation;
mod specifier;
mod types;

pub use conversation::ConversationAgent;
pub use specifier::{TaskSpecifier, DEFAULT_WORD_LIMIT, SPECIFIER_TEMPERATURE};
pub use types::{AgentError, AgentId};
