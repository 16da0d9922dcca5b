//! Inference engine abstraction layer.
//!
//! The bridge talks to exactly one engine, but goes through the
//! `InferenceEngine` trait so the gateway service can be driven by a scripted
//! engine in tests.

mod ollama;

pub use ollama::OllamaEngine;

use async_trait::async_trait;
use bridge_common::ChatMessage;

use crate::error::Result;

/// Result of a single non-streaming chat call.
#[derive(Debug, Clone)]
pub struct EngineReply {
    /// The assistant message, passed through as the engine produced it.
    pub message: ChatMessage,
    pub done: bool,
    pub done_reason: Option<String>,
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
}

impl EngineReply {
    /// OpenAI finish reason: the engine's own reason, `stop` when it only
    /// reports completion.
    pub fn finish_reason(&self) -> Option<String> {
        match (&self.done_reason, self.done) {
            (Some(reason), _) => Some(reason.clone()),
            (None, true) => Some("stop".to_string()),
            (None, false) => None,
        }
    }
}

/// The inference engine the bridge delegates to.
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Identifiers of all models available through this engine, in engine
    /// order.
    async fn list_models(&self) -> Result<Vec<String>>;

    /// Run a chat completion against `model_id`.
    async fn chat(&self, model_id: &str, messages: &[ChatMessage]) -> Result<EngineReply>;
}
