//! Shared test helpers for runtime tests.

use std::sync::Mutex;

use tripweaver_core::error::ProviderError;
use tripweaver_core::message::{Message, MessageToolCall};
use tripweaver_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};

/// A mock provider that returns a sequence of scripted responses and keeps
/// every request it saw.
///
/// Panics if more calls are made than responses provided.
pub struct SequentialMockProvider {
    responses: Mutex<Vec<Result<ProviderResponse, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let responses = self.responses.lock().unwrap();
        let index = requests.len();

        if index >= responses.len() {
            panic!(
                "SequentialMockProvider: no more responses (call #{}, have {})",
                index,
                responses.len()
            );
        }

        requests.push(request);
        responses[index].clone()
    }
}

/// Create a simple text response (no tool calls).
pub fn text(content: &str) -> Result<ProviderResponse, ProviderError> {
    Ok(ProviderResponse {
        message: Message::assistant(content),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    })
}

/// Create a response that hands off to the given delegates.
pub fn handoff(calls: &[(&str, &str)]) -> Result<ProviderResponse, ProviderError> {
    let mut message = Message::assistant("");
    message.tool_calls = calls
        .iter()
        .enumerate()
        .map(|(i, (handle, task))| MessageToolCall {
            id: format!("call_{i}_{handle}"),
            name: format!("transfer_to_{handle}"),
            arguments: serde_json::json!({ "task": task }).to_string(),
        })
        .collect();
    Ok(ProviderResponse {
        message,
        usage: None,
        model: "mock-model".into(),
    })
}
