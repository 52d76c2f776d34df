//! Handoff runtime: the generation capability the planner drives.
//!
//! The initiating agent sees every delegate as a `transfer_to_<handle>` tool.
//! Calling one runs that delegate once, with its own instructions, and feeds
//! its answer back as the tool result. The run ends when the initiating agent
//! replies without tool calls.
//!
//! Every model call, delegate calls included, counts against the turn
//! ceiling. Running out of turns is an error, never a truncated answer.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};
use tripweaver_core::agent::{AgentRuntime, AgentSpec, RunRequest, RunResponse};
use tripweaver_core::error::RuntimeError;
use tripweaver_core::message::{Message, MessageToolCall, Role};
use tripweaver_core::provider::{Provider, ProviderRequest, ToolDefinition};

const TRANSFER_PREFIX: &str = "transfer_to_";

/// Runs one agent with handoffs to its delegates over a single provider.
pub struct HandoffRuntime {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// Temperature setting
    temperature: f32,

    /// Default max tokens per response
    max_tokens: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct TransferArgs {
    #[serde(default)]
    task: String,
}

impl HandoffRuntime {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            temperature: 0.7,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the default max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Tool definition exposing `delegate` to the initiating agent.
    fn transfer_tool(delegate: &AgentSpec) -> ToolDefinition {
        ToolDefinition {
            name: format!("{TRANSFER_PREFIX}{}", delegate.handle()),
            description: format!(
                "Hand a task to the {} and receive its answer.",
                delegate.name
            ),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "task": {
                        "type": "string",
                        "description": "What the agent should work on"
                    }
                },
                "required": ["task"]
            }),
        }
    }

    fn resolve<'a>(
        delegates: &'a [AgentSpec],
        tool_name: &str,
    ) -> Result<&'a AgentSpec, RuntimeError> {
        tool_name
            .strip_prefix(TRANSFER_PREFIX)
            .and_then(|handle| delegates.iter().find(|d| d.handle() == handle))
            .ok_or_else(|| RuntimeError::UnknownDelegate(tool_name.to_string()))
    }

    async fn call(
        &self,
        agent: &AgentSpec,
        messages: Vec<Message>,
        tools: Vec<ToolDefinition>,
    ) -> Result<Message, RuntimeError> {
        let request = ProviderRequest {
            model: agent.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools,
            stop: vec![],
        };

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|source| RuntimeError::Provider {
                agent: agent.name.clone(),
                source,
            })?;

        if let Some(usage) = &response.usage {
            debug!(
                agent = %agent.name,
                model = %response.model,
                tokens = usage.total_tokens,
                "Model call finished"
            );
        }

        Ok(response.message.with_sender(&agent.name))
    }

    /// Run `delegate` once on behalf of `caller` and return its answer.
    async fn delegate(
        &self,
        caller: &AgentSpec,
        delegate: &AgentSpec,
        call: &MessageToolCall,
        brief: &str,
    ) -> Result<String, RuntimeError> {
        let args: TransferArgs = serde_json::from_str(&call.arguments).unwrap_or_default();
        info!(from = %caller.name, to = %delegate.name, "Handing off");

        let mut prompt = brief.to_string();
        if !args.task.trim().is_empty() {
            prompt.push_str(&format!("\n\nTask from {}: {}", caller.name, args.task));
        }

        let messages = vec![Message::system(&delegate.instructions), Message::user(prompt)];
        let answer = self.call(delegate, messages, vec![]).await?;
        Ok(answer.content)
    }
}

#[async_trait]
impl AgentRuntime for HandoffRuntime {
    fn name(&self) -> &str {
        "handoff"
    }

    async fn run(&self, request: RunRequest) -> Result<RunResponse, RuntimeError> {
        let RunRequest {
            agent,
            messages,
            max_turns,
            delegates,
        } = request;

        info!(
            agent = %agent.name,
            delegates = delegates.len(),
            max_turns,
            "Starting run"
        );

        // Delegates see the original request, not the supervisor's transcript.
        let brief = messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let tools: Vec<ToolDefinition> = delegates.iter().map(Self::transfer_tool).collect();

        let mut transcript = Vec::with_capacity(messages.len() + 1);
        transcript.push(Message::system(&agent.instructions));
        transcript.extend(messages);

        let mut produced = Vec::new();
        let mut turns = 0u32;

        loop {
            if turns >= max_turns {
                warn!(agent = %agent.name, max_turns, "Turn limit reached");
                return Err(RuntimeError::TurnLimitExceeded { max_turns });
            }
            turns += 1;
            debug!(agent = %agent.name, turn = turns, "Run turn");

            let reply = self.call(&agent, transcript.clone(), tools.clone()).await?;
            let tool_calls = reply.tool_calls.clone();
            transcript.push(reply.clone());
            produced.push(reply);

            if tool_calls.is_empty() {
                info!(agent = %agent.name, turns, messages = produced.len(), "Run finished");
                return Ok(RunResponse { messages: produced });
            }

            for call in &tool_calls {
                let result = match Self::resolve(&delegates, &call.name) {
                    Ok(delegate) => {
                        if turns >= max_turns {
                            warn!(agent = %agent.name, max_turns, "Turn limit reached");
                            return Err(RuntimeError::TurnLimitExceeded { max_turns });
                        }
                        turns += 1;
                        let answer = self.delegate(&agent, delegate, call, &brief).await?;
                        Message::tool_result(&call.id, answer).with_sender(&delegate.name)
                    }
                    Err(e) => {
                        // Let the model recover from a bad handoff.
                        warn!(tool = %call.name, error = %e, "Handoff failed");
                        Message::tool_result(&call.id, format!("Error: {e}"))
                    }
                };
                transcript.push(result.clone());
                produced.push(result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{SequentialMockProvider, handoff, text};
    use tripweaver_core::error::ProviderError;

    fn supervisor() -> AgentSpec {
        AgentSpec::new("Travel Planning Supervisor", "gpt-4o", "You supervise.")
    }

    fn delegates() -> Vec<AgentSpec> {
        vec![
            AgentSpec::new("Research Agent", "gpt-4o-mini", "You research."),
            AgentSpec::new("Budget Agent", "gpt-4o-mini", "You budget."),
        ]
    }

    fn request(max_turns: u32) -> RunRequest {
        RunRequest {
            agent: supervisor(),
            messages: vec![Message::user("Plan Paris")],
            max_turns,
            delegates: delegates(),
        }
    }

    #[tokio::test]
    async fn direct_answer_ends_run() {
        let provider = Arc::new(SequentialMockProvider::new(vec![text("All done")]));
        let runtime = HandoffRuntime::new(provider.clone());

        let response = runtime.run(request(20)).await.unwrap();
        assert_eq!(response.messages.len(), 1);
        let last = response.final_message().unwrap();
        assert_eq!(last.content, "All done");
        assert_eq!(last.sender.as_deref(), Some("Travel Planning Supervisor"));

        let sent = provider.requests();
        assert_eq!(sent[0].model, "gpt-4o");
        assert_eq!(sent[0].messages[0].role, Role::System);
        assert_eq!(sent[0].tools.len(), 2);
        assert_eq!(sent[0].tools[0].name, "transfer_to_research_agent");
    }

    #[tokio::test]
    async fn handoff_runs_delegate_and_returns_result() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            handoff(&[("research_agent", "Find attractions")]),
            text("Louvre, Eiffel Tower"),
            text("Final plan"),
        ]));
        let runtime = HandoffRuntime::new(provider.clone()).with_max_tokens(500);

        let response = runtime.run(request(20)).await.unwrap();
        assert_eq!(provider.call_count(), 3);
        assert_eq!(response.messages.len(), 3);

        let tool = &response.messages[1];
        assert_eq!(tool.role, Role::Tool);
        assert_eq!(tool.content, "Louvre, Eiffel Tower");
        assert_eq!(tool.sender.as_deref(), Some("Research Agent"));
        assert_eq!(tool.tool_call_id.as_deref(), Some("call_0_research_agent"));
        assert_eq!(response.final_message().unwrap().content, "Final plan");

        let sent = provider.requests();
        let delegate_call = &sent[1];
        assert_eq!(delegate_call.model, "gpt-4o-mini");
        assert_eq!(delegate_call.max_tokens, Some(500));
        assert!(delegate_call.tools.is_empty());
        assert_eq!(delegate_call.messages[0].content, "You research.");
        assert!(delegate_call.messages[1].content.starts_with("Plan Paris"));
        assert!(delegate_call.messages[1].content.contains("Find attractions"));

        // The supervisor sees the delegate's answer on its next turn.
        assert_eq!(sent[2].messages.last().unwrap().content, "Louvre, Eiffel Tower");
    }

    #[tokio::test]
    async fn unknown_delegate_reported_to_model() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            handoff(&[("weather_agent", "Forecast")]),
            text("Recovered"),
        ]));
        let runtime = HandoffRuntime::new(provider.clone());

        let response = runtime.run(request(20)).await.unwrap();
        assert_eq!(provider.call_count(), 2);
        assert!(response.messages[1].content.contains("Unknown delegate"));
        assert!(response.messages[1].sender.is_none());
    }

    #[tokio::test]
    async fn turn_ceiling_counts_delegate_calls() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            handoff(&[("research_agent", "a"), ("budget_agent", "b")]),
            text("research"),
        ]));
        let runtime = HandoffRuntime::new(provider.clone());

        let err = runtime.run(request(2)).await.unwrap_err();
        assert!(matches!(err, RuntimeError::TurnLimitExceeded { max_turns: 2 }));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn endless_handoffs_hit_the_ceiling() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            handoff(&[("research_agent", "a")]),
            text("r1"),
            handoff(&[("research_agent", "b")]),
            text("r2"),
        ]));
        let runtime = HandoffRuntime::new(provider);

        let err = runtime.run(request(4)).await.unwrap_err();
        assert!(matches!(err, RuntimeError::TurnLimitExceeded { max_turns: 4 }));
    }

    #[tokio::test]
    async fn provider_error_names_the_agent() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            handoff(&[("budget_agent", "costs")]),
            Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            }),
        ]));
        let runtime = HandoffRuntime::new(provider);

        match runtime.run(request(20)).await.unwrap_err() {
            RuntimeError::Provider { agent, source } => {
                assert_eq!(agent, "Budget Agent");
                assert!(matches!(source, ProviderError::RateLimited { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn resolve_requires_prefix() {
        let delegates = delegates();
        assert!(HandoffRuntime::resolve(&delegates, "transfer_to_budget_agent").is_ok());
        assert!(matches!(
            HandoffRuntime::resolve(&delegates, "budget_agent"),
            Err(RuntimeError::UnknownDelegate(_))
        ));
    }
}
