use anyhow::Context;
use async_openai::types::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::{config::OpenAIConfig, Client as AsyncOpenAiClient};
use async_trait::async_trait;
use tracing::instrument;

use super::{LlmClient, LlmConfig};

/// OpenAI-compatible client that can point at OpenAI, vLLM, or Ollama's `/v1` endpoint.
pub struct OpenAiLlmClient {
    client: AsyncOpenAiClient<OpenAIConfig>,
}

impl OpenAiLlmClient {
    pub fn from_config(config: &LlmConfig) -> anyhow::Result<Self> {
        let api_key = config
            .openai_api_key
            .clone()
            .context("Set OPENAI_API_KEY (or AIE_OPENAI_API_KEY) to use the openai backend")?;

        let mut openai_config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base_url) = &config.openai_base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        Ok(Self {
            client: AsyncOpenAiClient::with_config(openai_config),
        })
    }

    #[instrument(level = "debug", skip(self, system_prompt, input))]
    async fn chat(&self, model: &str, system_prompt: &str, input: &str) -> anyhow::Result<String> {
        let system_message = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_prompt)
            .build()?;
        let user_message = ChatCompletionRequestUserMessageArgs::default()
            .content(input)
            .build()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(vec![system_message.into(), user_message.into()])
            .build()?;

        let response = self.client.chat().create(request).await?;
        let choice = response
            .choices
            .first()
            .context("LLM response did not contain any choices")?;

        let output = choice
            .message
            .content
            .clone()
            .unwrap_or_else(|| String::from("[empty LLM response]"));

        Ok(output)
    }
}

#[async_trait]
impl LlmClient for OpenAiLlmClient {
    async fn complete(
        &self,
        model: &str,
        system_prompt: &str,
        input: &str,
    ) -> anyhow::Result<String> {
        self.chat(model, system_prompt, input).await
    }
}
