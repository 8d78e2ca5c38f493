use std::fmt;

use tracing::{error, info, instrument};

use crate::llm_client::SharedLlmClient;

use super::roster::AgentRole;
use super::types::AgentResponse;

/// A named, fixed-prompt wrapper around a single text-generation call.
pub struct Agent {
    name: String,
    system_prompt: String,
    model: String,
    llm_client: SharedLlmClient,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        system_prompt: impl Into<String>,
        model: impl Into<String>,
        llm_client: SharedLlmClient,
    ) -> Self {
        Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
            model: model.into(),
            llm_client,
        }
    }

    pub fn from_role(
        role: &AgentRole,
        model: impl Into<String>,
        llm_client: SharedLlmClient,
    ) -> Self {
        Self::new(role.name, role.system_prompt, model, llm_client)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// One backend call, one attempt. Never fails: a backend error comes back as
    /// `Error: ...` content under this agent's name.
    #[instrument(skip_all, fields(agent = %self.name, model = %self.model))]
    pub async fn think(&self, input: &str) -> AgentResponse {
        match self
            .llm_client
            .complete(&self.model, &self.system_prompt, input)
            .await
        {
            Ok(content) => {
                info!(chars = content.len(), "Agent responded");
                AgentResponse::new(content, self.name.as_str())
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "Error in {}", self.name);
                AgentResponse::from_error(self.name.as_str(), &err)
            }
        }
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::ROSTER;
    use crate::llm_client::mock::{FailingLlmClient, RecordingLlmClient, UppercaseLlmClient};
    use std::sync::Arc;

    #[tokio::test]
    async fn think_wraps_completion_with_agent_name() {
        let agent = Agent::new("O2", "builder", "llama3.2:3b", UppercaseLlmClient::shared());
        let response = agent.think("build it").await;

        assert_eq!(response, AgentResponse::new("BUILD IT", "O2"));
    }

    #[tokio::test]
    async fn think_sends_fixed_prompt_and_model() {
        let backend = Arc::new(RecordingLlmClient::default());
        let agent = Agent::from_role(&ROSTER[0], "qwen2.5:0.5b", backend.clone());

        agent.think("plan a blog").await;

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "qwen2.5:0.5b");
        assert_eq!(calls[0].system_prompt, ROSTER[0].system_prompt);
        assert_eq!(calls[0].input, "plan a blog");
    }

    #[tokio::test]
    async fn think_converts_backend_failure_into_error_text() {
        let backend = Arc::new(FailingLlmClient::default());
        let agent = Agent::new("CEO", "coordinator", "llama3.2:3b", backend.clone());

        let response = agent.think("anything").await;

        assert_eq!(response.agent_name, "CEO");
        assert!(response.is_error());
        assert!(response.content.contains("connection refused"));
        assert_eq!(backend.calls(), 1, "no retry on failure");
    }
}
