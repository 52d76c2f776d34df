//! LLM Provider implementations for TripWeaver.
//!
//! All providers implement the `tripweaver_core::Provider` trait. Every
//! supported backend speaks the OpenAI chat-completions dialect, so one
//! implementation covers them all.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use std::sync::Arc;

use tripweaver_config::{AppConfig, ConfigError};
use tripweaver_core::provider::Provider;

/// Build the configured provider.
///
/// Fails with [`ConfigError::MissingApiKey`] when a hosted provider has no
/// key. Local Ollama needs none.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ConfigError> {
    let base_url = config.base_url();

    let provider: Arc<dyn Provider> = if config.provider == "ollama" {
        Arc::new(OpenAiCompatProvider::ollama(Some(&base_url)))
    } else {
        let api_key = config.require_api_key()?;
        Arc::new(OpenAiCompatProvider::new(
            config.provider.as_str(),
            base_url,
            api_key,
        ))
    };

    tracing::debug!(provider = %provider.name(), model = %config.model, "Provider ready");
    Ok(provider)
}
