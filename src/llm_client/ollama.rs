use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::LlmClient;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for a local Ollama daemon's non-streaming `/api/chat` endpoint.
pub struct OllamaLlmClient {
    http: HttpClient,
    chat_url: String,
}

impl OllamaLlmClient {
    pub fn new(host: &str) -> anyhow::Result<Self> {
        let http = HttpClient::builder()
            .build()
            .context("Failed to build HTTP client for Ollama")?;

        Ok(Self {
            http,
            chat_url: format!("{}/api/chat", host.trim_end_matches('/')),
        })
    }

    fn build_request<'a>(
        model: &'a str,
        system_prompt: &'a str,
        input: &'a str,
    ) -> ChatRequest<'a> {
        ChatRequest {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: input,
                },
            ],
            stream: false,
        }
    }

    #[instrument(level = "debug", skip(self, system_prompt, input), fields(url = %self.chat_url))]
    async fn chat(&self, model: &str, system_prompt: &str, input: &str) -> anyhow::Result<String> {
        let request = Self::build_request(model, system_prompt, input);

        let response = self
            .http
            .post(&self.chat_url)
            .json(&request)
            .send()
            .await
            .with_context(|| {
                format!("Failed to call Ollama at {}. Is Ollama running?", self.chat_url)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read Ollama response body")?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map(|parsed| parsed.error)
                .unwrap_or(body);
            bail!("Ollama returned {status}: {detail}");
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).context("Failed to parse Ollama chat response")?;

        Ok(parsed.message.content)
    }
}

#[async_trait]
impl LlmClient for OllamaLlmClient {
    async fn complete(
        &self,
        model: &str,
        system_prompt: &str,
        input: &str,
    ) -> anyhow::Result<String> {
        self.chat(model, system_prompt, input).await
    }
}
