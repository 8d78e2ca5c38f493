use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;

use super::{LlmClient, SharedLlmClient};

/// Deterministic backend: upper-cases whatever it is given.
#[derive(Debug, Default)]
pub struct UppercaseLlmClient;

impl UppercaseLlmClient {
    pub fn shared() -> SharedLlmClient {
        Arc::new(Self)
    }
}

#[async_trait]
impl LlmClient for UppercaseLlmClient {
    async fn complete(
        &self,
        _model: &str,
        _system_prompt: &str,
        input: &str,
    ) -> anyhow::Result<String> {
        Ok(input.to_uppercase())
    }
}

/// Backend that fails every call, counting how often it was asked.
#[derive(Debug, Default)]
pub struct FailingLlmClient {
    calls: AtomicUsize,
}

impl FailingLlmClient {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for FailingLlmClient {
    async fn complete(
        &self,
        model: &str,
        _system_prompt: &str,
        _input: &str,
    ) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!("connection refused").context(format!("model {model} unavailable")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub model: String,
    pub system_prompt: String,
    pub input: String,
}

/// Records every call in order and answers `reply #<n>`, `n` being the 1-based call position.
#[derive(Debug, Default)]
pub struct RecordingLlmClient {
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingLlmClient {
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("recording lock poisoned").clone()
    }
}

#[async_trait]
impl LlmClient for RecordingLlmClient {
    async fn complete(
        &self,
        model: &str,
        system_prompt: &str,
        input: &str,
    ) -> anyhow::Result<String> {
        let index = {
            let mut calls = self.calls.lock().expect("recording lock poisoned");
            calls.push(RecordedCall {
                model: model.to_string(),
                system_prompt: system_prompt.to_string(),
                input: input.to_string(),
            });
            calls.len()
        };
        tokio::task::yield_now().await;
        Ok(format!("reply #{index}"))
    }
}
