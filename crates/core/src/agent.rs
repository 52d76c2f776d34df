//! Agent definitions and the generation runtime seam.
//!
//! An [`AgentSpec`] is a named prompt template bound to a model. An
//! [`AgentRuntime`] takes an initiating agent, a message list, a turn
//! ceiling, and a set of delegate agents, and returns the messages the run
//! produced. The planner treats one `run` as a single opaque unit of work;
//! whatever delegation happens inside it is the runtime's business.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RuntimeError;
use crate::message::Message;

/// A named prompt template bound to a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    /// Display name (e.g., "Research Agent")
    pub name: String,

    /// Model the agent runs on
    pub model: String,

    /// System instructions
    pub instructions: String,
}

impl AgentSpec {
    pub fn new(
        name: impl Into<String>,
        model: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            instructions: instructions.into(),
        }
    }

    /// Machine-friendly handle derived from the name: "Research Agent" → "research_agent".
    pub fn handle(&self) -> String {
        let mut handle = String::with_capacity(self.name.len());
        for c in self.name.chars() {
            if c.is_ascii_alphanumeric() {
                handle.push(c.to_ascii_lowercase());
            } else if !handle.is_empty() && !handle.ends_with('_') {
                handle.push('_');
            }
        }
        handle.trim_end_matches('_').to_string()
    }
}

/// Input for one generation run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// The agent that starts (and finishes) the run
    pub agent: AgentSpec,

    /// Initial conversation
    pub messages: Vec<Message>,

    /// Ceiling on model calls for the whole run
    pub max_turns: u32,

    /// Agents the initiating agent may hand work to
    pub delegates: Vec<AgentSpec>,
}

/// Output of one generation run: the new messages, in order.
#[derive(Debug, Clone, Default)]
pub struct RunResponse {
    pub messages: Vec<Message>,
}

impl RunResponse {
    /// The final answer, if the run produced any message at all.
    pub fn final_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// The multi-step generation capability.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// A human-readable name for this runtime.
    fn name(&self) -> &str;

    /// Execute one run to completion.
    async fn run(&self, request: RunRequest) -> Result<RunResponse, RuntimeError>;
}
