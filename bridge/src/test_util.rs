//! Scripted inference engine for exercising the gateway without Ollama.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bridge_common::ChatMessage;
use serde_json::{json, Value};

use crate::engine::{EngineReply, InferenceEngine};
use crate::error::{Error, Result};

/// Engine whose model list and failures are set by the test.
///
/// Records every list call and the model every chat call was made with.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    models: Mutex<Vec<String>>,
    list_calls: AtomicUsize,
    chat_models: Mutex<Vec<String>>,
    fail_list: Mutex<bool>,
    fail_chat: Mutex<bool>,
}

impl ScriptedEngine {
    pub fn with_models(models: &[&str]) -> Self {
        let engine = Self::default();
        engine.set_models(models);
        engine
    }

    /// Change what the engine reports on the next list call.
    pub fn set_models(&self, models: &[&str]) {
        *lock(&self.models) = models.iter().map(|m| m.to_string()).collect();
    }

    pub fn fail_list(&self, fail: bool) {
        *lock(&self.fail_list) = fail;
    }

    pub fn fail_chat(&self, fail: bool) {
        *lock(&self.fail_chat) = fail;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Models chat was invoked with, in call order.
    pub fn chat_models(&self) -> Vec<String> {
        lock(&self.chat_models).clone()
    }

    /// The reply every successful chat returns.
    pub fn reply_message(model_id: &str) -> Value {
        json!({"role": "assistant", "content": format!("reply from {model_id}")})
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl InferenceEngine for ScriptedEngine {
    async fn list_models(&self) -> Result<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if *lock(&self.fail_list) {
            return Err(Error::Communication("list failed".to_string()));
        }
        Ok(lock(&self.models).clone())
    }

    async fn chat(&self, model_id: &str, _messages: &[ChatMessage]) -> Result<EngineReply> {
        lock(&self.chat_models).push(model_id.to_string());
        if *lock(&self.fail_chat) {
            return Err(Error::Communication("chat failed".to_string()));
        }

        let message = match Self::reply_message(model_id) {
            Value::Object(map) => map,
            _ => ChatMessage::new(),
        };

        Ok(EngineReply {
            message,
            done: true,
            done_reason: None,
            prompt_tokens: Some(4),
            completion_tokens: Some(2),
        })
    }
}
