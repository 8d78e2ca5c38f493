use serde::{Deserialize, Serialize};

/// What one agent said for one call. Failures are folded in as `Error: ...` text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub content: String,
    pub agent_name: String,
}

impl AgentResponse {
    pub const ERROR_PREFIX: &'static str = "Error:";

    pub fn new(content: impl Into<String>, agent_name: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            agent_name: agent_name.into(),
        }
    }

    pub fn from_error(agent_name: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::new(format!("{} {err:#}", Self::ERROR_PREFIX), agent_name)
    }

    pub fn is_error(&self) -> bool {
        self.content.starts_with(Self::ERROR_PREFIX)
    }
}
