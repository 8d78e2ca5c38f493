pub mod config;
#[cfg(test)]
pub mod mock;
pub mod ollama;
pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;

pub use config::{BackendKind, LlmConfig};
pub use ollama::OllamaLlmClient;
pub use openai::OpenAiLlmClient;

pub type SharedLlmClient = Arc<dyn LlmClient>;

/// A text-generation backend addressed with one system prompt and one user message.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        system_prompt: &str,
        input: &str,
    ) -> anyhow::Result<String>;
}

/// Offline backend that hands the user text straight back.
#[derive(Debug, Default, Clone)]
pub struct EchoLlmClient;

#[async_trait]
impl LlmClient for EchoLlmClient {
    async fn complete(
        &self,
        _model: &str,
        _system_prompt: &str,
        input: &str,
    ) -> anyhow::Result<String> {
        Ok(input.to_string())
    }
}

impl EchoLlmClient {
    pub fn shared() -> SharedLlmClient {
        Arc::new(Self)
    }
}

pub fn build_llm_client(config: &LlmConfig) -> anyhow::Result<SharedLlmClient> {
    let client: SharedLlmClient = match config.backend {
        BackendKind::Ollama => Arc::new(OllamaLlmClient::new(&config.ollama_host)?),
        BackendKind::OpenAi => Arc::new(OpenAiLlmClient::from_config(config)?),
        BackendKind::Echo => EchoLlmClient::shared(),
    };

    tracing::debug!(backend = %config.backend, model = %config.model, "LLM client ready");
    Ok(client)
}
