//! Prompt templates for the task specifier and the two role-playing agents.
//!
//! Templates are rendered with `format!` named arguments so a missing
//! substitution is a compile error rather than a runtime condition.

use crate::llm::ChatMessage;

/// Literal token the instructor sends once the task is solved.
pub const TASK_DONE_SENTINEL: &str = "<CAMEL_TASK_DONE>";

/// System message for the one-shot task specifier.
pub const TASK_SPECIFIER_SYSTEM: &str = "You can make a task more specific.";

/// Human prompt asking the specifier to narrow `task` to at most `word_limit` words.
pub fn task_specifier_prompt(
    assistant_role_name: &str,
    user_role_name: &str,
    task: &str,
    word_limit: usize,
) -> String {
    format!(
        "Here is a task that {assistant_role_name} will help {user_role_name} to complete: {task}. \
         Please make it more specific. Be creative and imaginative. \
         Please reply with the specified task in {word_limit} words or less. Do not add anything else."
    )
}

/// System prompt for the executor role (the one producing solutions).
pub fn assistant_inception_prompt(assistant_role_name: &str, user_role_name: &str, task: &str) -> String {
    format!(
        r#"Never forget you are a {assistant_role_name} and I am a {user_role_name}. Never flip roles! Never instruct me!
We share a common interest in collaborating to successfully complete a task.
You must help me to complete the task.
Here is the task: {task}. Never forget our task!
I must instruct you based on your expertise and my needs to complete the task.

I must give you one instruction at a time.
You must write a specific solution that appropriately completes the requested instruction.
You must decline my instruction honestly if you cannot perform the instruction due to physical reasons or your capability and explain the reasons.
Do not add anything else other than your solution to my instruction.
You are never supposed to ask me any questions you only answer questions.
You are never supposed to reply with a flake solution. Explain your solutions.
Your solution must be declarative sentences and simple present tense.
Unless I say the task is completed, you should always start with:

Solution: <YOUR_SOLUTION>

<YOUR_SOLUTION> should be specific and provide preferable implementations and examples for task-solving.
Always end <YOUR_SOLUTION> with: Next request."#
    )
}

/// System prompt for the instructor role (the one issuing instructions).
pub fn user_inception_prompt(assistant_role_name: &str, user_role_name: &str, task: &str) -> String {
    format!(
        r#"Never forget you are a {user_role_name} and I am a {assistant_role_name}. Never flip roles! You will always instruct me.
We share a common interest in collaborating to successfully complete a task.
I must help you to complete the task.
Here is the task: {task}. Never forget our task!
You must instruct me based on my expertise and your needs to complete the task ONLY in the following two ways:

1. Instruct with a necessary input:
Instruction: <YOUR_INSTRUCTION>
Input: <YOUR_INPUT>

2. Instruct without any input:
Instruction: <YOUR_INSTRUCTION>
Input: None

The "Instruction" describes a task or question. The paired "Input" provides further context or information for the requested "Instruction".

You must give me one instruction at a time.
I must write a response that appropriately completes the requested instruction.
I must decline your instruction honestly if I cannot perform the instruction due to physical reasons or my capability and I must explain the reasons.
You should instruct me not ask me questions.
Now you must start to instruct me using the two ways described above.
Do not add anything else other than your instruction and the optional corresponding input!
Keep giving me instructions and necessary inputs until you think the task is completed.
When the task is completed, you must only reply with a single word {TASK_DONE_SENTINEL}.
Never say {TASK_DONE_SENTINEL} unless my responses have solved your task."#
    )
}

/// The pair of system messages that set up a role-playing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSystemMessages {
    /// Executor (assistant role) system message.
    pub assistant: ChatMessage,
    /// Instructor (user role) system message.
    pub user: ChatMessage,
}

/// Builds both role system messages for a specified task.
pub struct RolePromptBuilder;

impl RolePromptBuilder {
    pub fn build(assistant_role_name: &str, user_role_name: &str, task: &str) -> RoleSystemMessages {
        RoleSystemMessages {
            assistant: ChatMessage::system(assistant_inception_prompt(
                assistant_role_name,
                user_role_name,
                task,
            )),
            user: ChatMessage::system(user_inception_prompt(assistant_role_name, user_role_name, task)),
        }
    }
}
