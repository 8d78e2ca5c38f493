use std::env;
use std::fmt;
use std::str::FromStr;

use anyhow::bail;

/// Which text-generation service the agents talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Ollama,
    OpenAi,
    Echo,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BackendKind::Ollama => "ollama",
            BackendKind::OpenAi => "openai",
            BackendKind::Echo => "echo",
        };

        write!(f, "{}", label)
    }
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(BackendKind::Ollama),
            "openai" => Ok(BackendKind::OpenAi),
            "echo" => Ok(BackendKind::Echo),
            other => bail!("Unknown backend '{other}' (expected ollama, openai, or echo)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: BackendKind,
    pub model: String,
    pub ollama_host: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            model: Self::DEFAULT_MODEL.to_string(),
            ollama_host: Self::DEFAULT_OLLAMA_HOST.to_string(),
            openai_api_key: None,
            openai_base_url: None,
        }
    }
}

impl LlmConfig {
    pub const DEFAULT_MODEL: &'static str = "llama3.2:3b";
    pub const DEFAULT_OLLAMA_HOST: &'static str = "http://localhost:11434";

    const BACKEND_VARS: [&'static str; 1] = ["O1_TEAM_BACKEND"];
    const MODEL_VARS: [&'static str; 1] = ["O1_TEAM_MODEL"];
    const OLLAMA_HOST_VARS: [&'static str; 1] = ["OLLAMA_HOST"];
    const OPENAI_KEY_VARS: [&'static str; 2] = ["OPENAI_API_KEY", "AIE_OPENAI_API_KEY"];
    const OPENAI_BASE_URL_VARS: [&'static str; 2] = ["OPENAI_BASE_URL", "AIE_OPENAI_BASE_URL"];

    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |candidates: &[&'static str]| {
            candidates
                .iter()
                .filter_map(|key| lookup(*key))
                .find(|value| !value.trim().is_empty())
        };

        let backend = match read(&Self::BACKEND_VARS) {
            Some(raw) => raw.parse()?,
            None => BackendKind::default(),
        };

        Ok(Self {
            backend,
            model: read(&Self::MODEL_VARS).unwrap_or_else(|| Self::DEFAULT_MODEL.to_string()),
            ollama_host: read(&Self::OLLAMA_HOST_VARS)
                .map(|host| normalize_host(&host))
                .unwrap_or_else(|| Self::DEFAULT_OLLAMA_HOST.to_string()),
            openai_api_key: read(&Self::OPENAI_KEY_VARS),
            openai_base_url: read(&Self::OPENAI_BASE_URL_VARS),
        })
    }

    pub fn with_backend(mut self, backend: Option<BackendKind>) -> Self {
        if let Some(backend) = backend {
            self.backend = backend;
        }
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            self.model = model;
        }
        self
    }

    pub fn with_ollama_host(mut self, host: Option<String>) -> Self {
        if let Some(host) = host.filter(|h| !h.trim().is_empty()) {
            self.ollama_host = normalize_host(&host);
        }
        self
    }
}

// OLLAMA_HOST is often exported as a bare "host:port".
fn normalize_host(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}
