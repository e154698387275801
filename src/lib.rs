//! # camel_roleplay
//!
//! Two-agent role-playing simulation driver.
//!
//! Given a task and two role names, a model first rewrites the task into a
//! specific one, then an instructor agent and an executor agent take turns
//! until the instructor declares the task done or the turn budget runs out.
//!
//! ## Architecture
//!
//! ```text
//!   task ──► TaskSpecifier ──► RolePromptBuilder ──► SimulationLoop ──► OutputSink
//!                 │                                   │          │
//!                 ▼                                   ▼          ▼
//!          ConversationAgent                  instructor     executor
//!                 │                                   │          │
//!                 └──────────────► LlmClient ◄────────┴──────────┘
//! ```
//!
//! ## Modules
//! - `agents`: ConversationAgent and TaskSpecifier
//! - `llm`: message model, client trait and the OpenAI-compatible client
//! - `prompts`: fixed prompt templates
//! - `simulation`: the turn loop and its entry points
//! - `sink`: display surfaces for emitted messages
//! - `config`: environment configuration

pub mod agents;
pub mod config;
pub mod llm;
pub mod prompts;
pub mod simulation;
pub mod sink;

pub use config::Config;
pub use simulation::{
    run_simulation, run_simulation_with_client, SimulationError, SimulationInputs,
    SimulationReport, SimulationStatus,
};
