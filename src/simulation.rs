//! Role-playing simulation - the instructor/executor turn loop.
//!
//! # Flow
//! 1. Validate the four inputs (no model call happens if any is empty)
//! 2. Specify the task with a one-shot [`TaskSpecifier`]
//! 3. Build both role system messages and a [`ConversationAgent`] per role
//! 4. Seed the executor, then alternate instructor and executor steps for up
//!    to `turn_limit` rounds, stopping early on [`TASK_DONE_SENTINEL`]
//!
//! Every step is awaited before the next one starts; nothing runs in
//! parallel. A model failure aborts the run. Messages already emitted stay
//! emitted.

use std::sync::Arc;

use serde::Serialize;

use crate::agents::{AgentError, ConversationAgent, TaskSpecifier};
use crate::config::Config;
use crate::llm::{ChatMessage, ChatOptions, LlmClient, OpenAiClient};
use crate::prompts::{RolePromptBuilder, RoleSystemMessages, TASK_DONE_SENTINEL};
use crate::sink::OutputSink;

/// Sampling temperature for both role-playing agents.
pub const ROLE_TEMPERATURE: f64 = 0.2;

/// Default number of rounds before the simulation stops on its own.
pub const DEFAULT_TURN_LIMIT: usize = 5;

const INPUT_NONE: &str = "Input: None";
const INPUT_NONE_SENTENCE: &str = "Input: None.";

/// Banner emitted when the turn budget runs out.
pub const SIMULATION_COMPLETE_BANNER: &str = "<h2><b>Simulation complete!</b></h2>";

/// Notice emitted when the instructor declares the task done.
pub const TASK_COMPLETE_NOTICE: &str = "<h2><b>Task complete!</b></h2>";

/// One of the four required inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    AssistantRole,
    UserRole,
    Task,
    ApiKey,
}

impl std::fmt::Display for InputField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputField::AssistantRole => write!(f, "assistant role"),
            InputField::UserRole => write!(f, "user role"),
            InputField::Task => write!(f, "task"),
            InputField::ApiKey => write!(f, "API key"),
        }
    }
}

/// Errors that end a simulation run.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SimulationError {
    #[error("Please fill in all the input fields (missing: {0})")]
    MissingInput(InputField),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

/// What the user supplies to start a run.
#[derive(Clone)]
pub struct SimulationInputs {
    /// Executor role name (e.g. "Python Programmer").
    pub assistant_role_name: String,
    /// Instructor role name (e.g. "Stock Trader").
    pub user_role_name: String,
    pub task: String,
    pub api_key: String,
}

impl std::fmt::Debug for SimulationInputs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationInputs")
            .field("assistant_role_name", &self.assistant_role_name)
            .field("user_role_name", &self.user_role_name)
            .field("task", &self.task)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl SimulationInputs {
    /// Reject empty fields, checked in form order.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let fields = [
            (InputField::AssistantRole, &self.assistant_role_name),
            (InputField::UserRole, &self.user_role_name),
            (InputField::Task, &self.task),
            (InputField::ApiKey, &self.api_key),
        ];
        for (field, value) in fields {
            if value.is_empty() {
                tracing::warn!("Simulation not started: {} is empty", field);
                return Err(SimulationError::MissingInput(field));
            }
        }
        Ok(())
    }
}

/// Remove every `Input: None.` from an instruction and trim the result.
///
/// Applying it to already-cleaned text changes nothing.
pub fn clean_instruction(text: &str) -> String {
    let mut cleaned = text.to_string();
    while cleaned.contains(INPUT_NONE_SENTENCE) {
        cleaned = cleaned.replace(INPUT_NONE_SENTENCE, "");
    }
    cleaned.trim().to_string()
}

/// Cut an executor response at its first `Input: None`, if any.
pub fn truncate_response(text: &str) -> &str {
    match text.find(INPUT_NONE) {
        Some(idx) => &text[..idx],
        None => text,
    }
}

/// Where the loop is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStatus {
    Running,
    /// The instructor sent the completion sentinel.
    DoneSentinel,
    /// The turn budget ran out.
    DoneLimit,
}

/// Turn counter and termination state.
///
/// # Invariants
/// - `turn_count <= turn_limit`
/// - once `status` leaves `Running` it never changes again
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationState {
    turn_count: usize,
    turn_limit: usize,
    status: SimulationStatus,
}

impl SimulationState {
    pub fn new(turn_limit: usize) -> Self {
        let status = if turn_limit == 0 {
            SimulationStatus::DoneLimit
        } else {
            SimulationStatus::Running
        };
        Self {
            turn_count: 0,
            turn_limit,
            status,
        }
    }

    pub fn turn_count(&self) -> usize {
        self.turn_count
    }

    pub fn turn_limit(&self) -> usize {
        self.turn_limit
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn is_done(&self) -> bool {
        self.status != SimulationStatus::Running
    }

    /// Record a finished round. `sentinel_seen` wins over the turn limit.
    fn complete_round(&mut self, sentinel_seen: bool) {
        if self.is_done() {
            return;
        }
        self.turn_count += 1;
        if sentinel_seen {
            self.status = SimulationStatus::DoneSentinel;
        } else if self.turn_count >= self.turn_limit {
            self.status = SimulationStatus::DoneLimit;
        }
    }
}

/// Which side of the conversation produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Instructor,
    Executor,
}

/// One displayed agent message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    /// 1-based round number.
    pub round: usize,
    pub speaker: Speaker,
    pub role_name: String,
    /// Text after cleanup, as displayed.
    pub content: String,
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub original_task: String,
    pub specified_task: String,
    pub status: SimulationStatus,
    pub rounds: usize,
    pub turns: Vec<Turn>,
    /// Plain-text log of all turns.
    pub transcript: String,
    /// Every markup string sent to the sink, in order.
    pub emitted: Vec<String>,
}

/// Forwards to the sink and keeps a copy for the report.
struct Emitter<'a> {
    sink: &'a mut dyn OutputSink,
    emitted: Vec<String>,
}

impl Emitter<'_> {
    fn emit(&mut self, markup: String) {
        self.sink.emit(&markup);
        self.emitted.push(markup);
    }
}

/// Two role-playing agents and the state driving them.
pub struct SimulationLoop {
    instructor: ConversationAgent,
    executor: ConversationAgent,
    user_role_name: String,
    assistant_role_name: String,
    state: SimulationState,
}

impl SimulationLoop {
    pub fn new(
        messages: RoleSystemMessages,
        llm: Arc<dyn LlmClient>,
        model: &str,
        assistant_role_name: impl Into<String>,
        user_role_name: impl Into<String>,
        turn_limit: usize,
    ) -> Self {
        let options = ChatOptions::with_temperature(ROLE_TEMPERATURE);
        Self {
            instructor: ConversationAgent::new(messages.user, Arc::clone(&llm), model, options),
            executor: ConversationAgent::new(messages.assistant, llm, model, options),
            user_role_name: user_role_name.into(),
            assistant_role_name: assistant_role_name.into(),
            state: SimulationState::new(turn_limit),
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn instructor(&self) -> &ConversationAgent {
        &self.instructor
    }

    pub fn executor(&self) -> &ConversationAgent {
        &self.executor
    }

    /// Human message that opens the session: the instructor's own rules plus
    /// the request to start instructing.
    fn kickoff_message(&self) -> ChatMessage {
        ChatMessage::human(format!(
            "{}. Now start to give me instructions one by one. Only reply with Instruction and Input.",
            self.instructor.system_message().content()
        ))
    }

    /// Seed the executor and run rounds until the sentinel or the turn limit.
    async fn run(
        &mut self,
        out: &mut Emitter<'_>,
        turns: &mut Vec<Turn>,
        transcript: &mut String,
    ) -> Result<(), AgentError> {
        self.instructor.reset();
        self.executor.reset();

        let kickoff = self.kickoff_message();
        let seed = self.executor.step(kickoff).await?;
        let mut working = ChatMessage::human(seed.content());

        while !self.state.is_done() {
            let round = self.state.turn_count() + 1;
            tracing::info!("Round {}/{} started", round, self.state.turn_limit());

            let instruction = self.instructor.step(working).await?;
            let sentinel_seen = instruction.content().contains(TASK_DONE_SENTINEL);
            let cleaned = clean_instruction(instruction.content());

            out.emit(format!(
                "<b>AI User ({}):</b>\n\n{}\n\n",
                self.user_role_name, cleaned
            ));
            transcript.push_str(&format!("AI User ({}):\n\n{}\n\n", self.user_role_name, cleaned));
            turns.push(Turn {
                round,
                speaker: Speaker::Instructor,
                role_name: self.user_role_name.clone(),
                content: cleaned.clone(),
            });

            let response = self.executor.step(ChatMessage::human(cleaned)).await?;
            let shown = truncate_response(response.content()).to_string();

            out.emit(format!(
                "<b>AI Assistant ({}):</b>\n\n{}\n\n",
                self.assistant_role_name, shown
            ));
            transcript.push_str(&format!(
                "AI Assistant ({}):\n\n{}\n\n",
                self.assistant_role_name, shown
            ));
            turns.push(Turn {
                round,
                speaker: Speaker::Executor,
                role_name: self.assistant_role_name.clone(),
                content: shown.clone(),
            });

            working = ChatMessage::human(response.content());
            self.state.complete_round(sentinel_seen);
        }

        match self.state.status() {
            SimulationStatus::DoneSentinel => {
                tracing::info!("Task marked done after {} rounds", self.state.turn_count());
                out.emit(TASK_COMPLETE_NOTICE.to_string());
            }
            _ => {
                tracing::info!("Turn limit of {} rounds reached", self.state.turn_limit());
                out.emit(SIMULATION_COMPLETE_BANNER.to_string());
            }
        }
        Ok(())
    }
}

/// Run a full simulation against the configured OpenAI-compatible endpoint.
pub async fn run_simulation(
    inputs: &SimulationInputs,
    config: &Config,
    sink: &mut dyn OutputSink,
) -> Result<SimulationReport, SimulationError> {
    inputs.validate()?;
    let llm: Arc<dyn LlmClient> = Arc::new(OpenAiClient::with_base_url(
        inputs.api_key.clone(),
        config.base_url.clone(),
        Some(config.request_timeout),
    ));
    run_simulation_with_client(inputs, llm, config, sink).await
}

/// Run a full simulation with an injected model client.
pub async fn run_simulation_with_client(
    inputs: &SimulationInputs,
    llm: Arc<dyn LlmClient>,
    config: &Config,
    sink: &mut dyn OutputSink,
) -> Result<SimulationReport, SimulationError> {
    inputs.validate()?;

    tracing::info!(
        "Starting simulation: assistant={} user={} model={}",
        inputs.assistant_role_name,
        inputs.user_role_name,
        config.model
    );

    let mut out = Emitter {
        sink,
        emitted: Vec::new(),
    };

    let specifier = TaskSpecifier::new(Arc::clone(&llm), config.model.clone(), config.word_limit);
    let specified_task = specifier
        .specify(&inputs.assistant_role_name, &inputs.user_role_name, &inputs.task)
        .await?;
    out.emit(format!("<b>Specified task: </b>{}", specified_task));

    let messages = RolePromptBuilder::build(
        &inputs.assistant_role_name,
        &inputs.user_role_name,
        &specified_task,
    );
    let mut simulation = SimulationLoop::new(
        messages,
        llm,
        &config.model,
        inputs.assistant_role_name.clone(),
        inputs.user_role_name.clone(),
        config.turn_limit,
    );

    out.emit(format!("<b>Original task prompt:</b>\n{}\n", inputs.task));
    out.emit(format!("<b>Specified task prompt:</b>\n{}\n", specified_task));

    let mut turns = Vec::new();
    let mut transcript = String::new();
    simulation.run(&mut out, &mut turns, &mut transcript).await?;

    Ok(SimulationReport {
        original_task: inputs.task.clone(),
        specified_task,
        status: simulation.state().status(),
        rounds: simulation.state().turn_count(),
        turns,
        transcript,
        emitted: out.emitted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::scripted::ScriptedClient;
    use crate::llm::{LlmError, Role};
    use crate::sink::CollectingSink;

    const SPECIFIED: &str = "Write a Python bubble sort that ranks a stock trader's daily returns.";

    fn inputs() -> SimulationInputs {
        SimulationInputs {
            assistant_role_name: "Python Programmer".to_string(),
            user_role_name: "Stock Trader".to_string(),
            task: "write a bubble-sort function".to_string(),
            api_key: "sk-test".to_string(),
        }
    }

    /// Replies in call order: specifier, executor seed, then
    /// (instructor, executor) per round.
    fn script(instructions: &[&str]) -> Vec<String> {
        let mut replies = vec![SPECIFIED.to_string(), "Understood. Next request.".to_string()];
        for (i, instruction) in instructions.iter().enumerate() {
            replies.push(instruction.to_string());
            replies.push(format!("Solution: step {}. Next request.", i + 1));
        }
        replies
    }

    async fn run(client: Arc<ScriptedClient>) -> (Result<SimulationReport, SimulationError>, CollectingSink) {
        let mut sink = CollectingSink::new();
        let result = run_simulation_with_client(&inputs(), client, &Config::default(), &mut sink).await;
        (result, sink)
    }

    #[test]
    fn clean_instruction_strips_input_none_and_whitespace() {
        assert_eq!(
            clean_instruction("Instruction: Sort the list.\nInput: None.  \n"),
            "Instruction: Sort the list."
        );
        assert_eq!(clean_instruction("Instruction: x\nInput: [3, 1]"), "Instruction: x\nInput: [3, 1]");
    }

    #[test]
    fn clean_instruction_is_idempotent() {
        for raw in [
            "Instruction: Sort.\nInput: None.",
            "  Instruction: Plot.\nInput: prices.csv ",
            "Input: NInput: None.one.",
            "<CAMEL_TASK_DONE>",
        ] {
            let once = clean_instruction(raw);
            assert_eq!(clean_instruction(&once), once);
        }
    }

    #[test]
    fn truncate_response_cuts_before_first_marker() {
        assert_eq!(
            truncate_response("Solution: done. \nInput: None\nInput: None"),
            "Solution: done. \n"
        );
        assert_eq!(truncate_response("Solution: done."), "Solution: done.");
        assert_eq!(truncate_response("Input: None"), "");
    }

    #[test]
    fn state_stops_at_limit_and_sentinel_wins() {
        let mut state = SimulationState::new(2);
        state.complete_round(false);
        assert_eq!(state.status(), SimulationStatus::Running);
        state.complete_round(false);
        assert_eq!(state.status(), SimulationStatus::DoneLimit);
        state.complete_round(true);
        assert_eq!(state.turn_count(), 2);
        assert_eq!(state.status(), SimulationStatus::DoneLimit);

        let mut state = SimulationState::new(1);
        state.complete_round(true);
        assert_eq!(state.status(), SimulationStatus::DoneSentinel);
    }

    #[test]
    fn missing_input_is_reported_in_form_order() {
        let mut bad = inputs();
        bad.api_key = String::new();
        assert!(matches!(bad.validate(), Err(SimulationError::MissingInput(InputField::ApiKey))));

        bad.task = String::new();
        assert!(matches!(bad.validate(), Err(SimulationError::MissingInput(InputField::Task))));
        assert!(inputs().validate().is_ok());
    }

    #[test]
    fn whitespace_only_fields_are_not_missing() {
        let mut padded = inputs();
        padded.user_role_name = " ".to_string();
        padded.api_key = " ".to_string();
        assert!(padded.validate().is_ok());
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let rendered = format!("{:?}", inputs());
        assert!(!rendered.contains("sk-test"));
        assert!(rendered.contains("<redacted>"));
    }

    #[tokio::test]
    async fn empty_credential_makes_no_model_call() {
        let client = Arc::new(ScriptedClient::new(script(&[])));
        let mut sink = CollectingSink::new();
        let mut bad = inputs();
        bad.api_key = String::new();

        let err = run_simulation_with_client(&bad, client.clone(), &Config::default(), &mut sink)
            .await
            .unwrap_err();

        assert!(matches!(err, SimulationError::MissingInput(InputField::ApiKey)));
        assert_eq!(client.call_count(), 0);
        assert!(sink.messages().is_empty());
    }

    #[tokio::test]
    async fn specifier_runs_once_before_role_agents() {
        let instructions = ["Instruction: a\nInput: None."; 5];
        let client = Arc::new(ScriptedClient::new(script(&instructions)));
        let (result, _) = run(client.clone()).await;
        result.unwrap();

        let calls = client.calls();
        assert_eq!(calls[0].options.temperature, Some(1.0));
        assert_eq!(calls[0].messages[0].content(), "You can make a task more specific.");
        assert!(calls[1..]
            .iter()
            .all(|c| c.options.temperature == Some(ROLE_TEMPERATURE)
                && c.messages[0].content() != "You can make a task more specific."));
    }

    #[tokio::test]
    async fn runs_full_turn_limit_without_sentinel() {
        let instructions = ["Instruction: next\nInput: None."; 7];
        let client = Arc::new(ScriptedClient::new(script(&instructions)));
        let (result, sink) = run(client.clone()).await;
        let report = result.unwrap();

        assert_eq!(report.status, SimulationStatus::DoneLimit);
        assert_eq!(report.rounds, DEFAULT_TURN_LIMIT);
        assert_eq!(report.turns.len(), 2 * DEFAULT_TURN_LIMIT);
        // specifier + seed + 5 rounds of two calls
        assert_eq!(client.call_count(), 2 + 2 * DEFAULT_TURN_LIMIT);
        assert_eq!(sink.messages().last().map(String::as_str), Some(SIMULATION_COMPLETE_BANNER));
        assert_eq!(sink.messages(), report.emitted.as_slice());
    }

    #[tokio::test]
    async fn sentinel_on_round_three_stops_after_that_round() {
        let instructions = [
            "Instruction: Define the price list.\nInput: None.",
            "Instruction: Implement bubble sort.\nInput: prices",
            "<CAMEL_TASK_DONE>",
            "Instruction: never reached\nInput: None.",
        ];
        let client = Arc::new(ScriptedClient::new(script(&instructions)));
        let (result, sink) = run(client.clone()).await;
        let report = result.unwrap();

        assert_eq!(report.status, SimulationStatus::DoneSentinel);
        assert_eq!(report.rounds, 3);
        let instructor_turns = report.turns.iter().filter(|t| t.speaker == Speaker::Instructor).count();
        let executor_turns = report.turns.iter().filter(|t| t.speaker == Speaker::Executor).count();
        assert_eq!((instructor_turns, executor_turns), (3, 3));
        assert_eq!(client.call_count(), 2 + 2 * 3);
        assert_eq!(sink.messages().last().map(String::as_str), Some(TASK_COMPLETE_NOTICE));
        assert!(!sink.messages().iter().any(|m| m.contains("never reached")));
    }

    #[tokio::test]
    async fn sentinel_is_detected_alongside_input_none() {
        let instructions = [
            "Instruction: Define the list.\nInput: None.",
            "<CAMEL_TASK_DONE>\nInput: None.",
            "Instruction: never reached\nInput: None.",
        ];
        let client = Arc::new(ScriptedClient::new(script(&instructions)));
        let (result, sink) = run(client.clone()).await;
        let report = result.unwrap();

        assert_eq!(report.status, SimulationStatus::DoneSentinel);
        assert_eq!(report.rounds, 2);
        assert_eq!(report.turns[2].content, "<CAMEL_TASK_DONE>");
        assert_eq!(client.call_count(), 2 + 2 * 2);
        assert_eq!(sink.messages().last().map(String::as_str), Some(TASK_COMPLETE_NOTICE));
    }

    #[tokio::test]
    async fn emissions_follow_display_order_and_role_names() {
        let instructions = ["Instruction: Define the list.\nInput: None.", "<CAMEL_TASK_DONE>"];
        let client = Arc::new(ScriptedClient::new(script(&instructions)));
        let (result, sink) = run(client).await;
        result.unwrap();

        let messages = sink.messages();
        assert_eq!(messages[0], format!("<b>Specified task: </b>{}", SPECIFIED));
        assert_eq!(messages[1], "<b>Original task prompt:</b>\nwrite a bubble-sort function\n");
        assert_eq!(messages[2], format!("<b>Specified task prompt:</b>\n{}\n", SPECIFIED));
        assert_eq!(messages[3], "<b>AI User (Stock Trader):</b>\n\nInstruction: Define the list.\n\n");
        assert_eq!(
            messages[4],
            "<b>AI Assistant (Python Programmer):</b>\n\nSolution: step 1. Next request.\n\n"
        );
        // 3 headers + 2 rounds of two turns + completion notice
        assert_eq!(messages.len(), 3 + 4 + 1);
    }

    #[tokio::test]
    async fn role_agents_use_specified_task_and_cleaned_inputs() {
        let instructions = ["Instruction: Define the list.\nInput: None.", "<CAMEL_TASK_DONE>"];
        let client = Arc::new(ScriptedClient::new(script(&instructions)));
        let (result, _) = run(client.clone()).await;
        result.unwrap();

        let calls = client.calls();
        // Seed goes to the executor: its system message plus the kickoff.
        let seed = &calls[1];
        assert!(seed.messages[0]
            .content()
            .starts_with("Never forget you are a Python Programmer and I am a Stock Trader."));
        assert!(seed.messages[0].content().contains(SPECIFIED));
        assert!(seed.messages[1].content().starts_with("Never forget you are a Stock Trader"));
        assert!(seed.messages[1]
            .content()
            .ends_with("Now start to give me instructions one by one. Only reply with Instruction and Input."));

        // Instructor's first input is the executor's seed reply.
        let first_instruction = &calls[2];
        assert!(first_instruction.messages[0].content().starts_with("Never forget you are a Stock Trader"));
        assert_eq!(first_instruction.messages[1], ChatMessage::human("Understood. Next request."));

        // Executor receives the cleaned instruction as a human message.
        let first_response = &calls[3];
        let last = first_response.messages.last().unwrap();
        assert_eq!(last.role(), Role::User);
        assert_eq!(last.content(), "Instruction: Define the list.");
    }

    #[tokio::test]
    async fn executor_response_is_truncated_at_input_none() {
        let mut replies = script(&[]);
        replies.push("Instruction: Sum.\nInput: [1, 2]".to_string());
        replies.push("Solution: 3. Next request.\nInput: None\nextra".to_string());
        replies.push("<CAMEL_TASK_DONE>".to_string());
        replies.push("Great.".to_string());
        let client = Arc::new(ScriptedClient::new(replies));
        let (result, _) = run(client.clone()).await;
        let report = result.unwrap();

        assert_eq!(report.turns[1].content, "Solution: 3. Next request.\n");
        assert!(report
            .transcript
            .contains("AI Assistant (Python Programmer):\n\nSolution: 3. Next request.\n\n\n"));
        // The instructor sees the executor's full reply, not the displayed cut.
        assert_eq!(
            client.calls()[4].messages.last().unwrap().content(),
            "Solution: 3. Next request.\nInput: None\nextra"
        );
    }

    #[tokio::test]
    async fn model_failure_mid_loop_aborts_and_keeps_emitted_messages() {
        let mut replies = script(&["Instruction: a\nInput: None."]);
        replies.truncate(replies.len() - 1);
        let client = Arc::new(
            ScriptedClient::new(replies).then_fail(LlmError::network_error("connection reset".to_string())),
        );
        let (result, sink) = run(client.clone()).await;

        let err = result.unwrap_err();
        assert!(matches!(err, SimulationError::Agent(AgentError::Llm(_))));
        // headers + the instructor turn made it out before the failure
        assert_eq!(sink.messages().len(), 4);
        assert!(!sink.messages().iter().any(|m| m == SIMULATION_COMPLETE_BANNER));
    }

    #[tokio::test]
    async fn specifier_failure_emits_nothing() {
        let client = Arc::new(
            ScriptedClient::default().then_fail(LlmError::from_status(401, "invalid api key".to_string())),
        );
        let (result, sink) = run(client.clone()).await;

        assert!(matches!(result, Err(SimulationError::Agent(_))));
        assert_eq!(client.call_count(), 1);
        assert!(sink.messages().is_empty());
    }
}
