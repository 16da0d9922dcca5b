//! Ollama inference engine implementation.

use std::time::Duration;

use async_trait::async_trait;
use bridge_common::ChatMessage;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{EngineReply, InferenceEngine};
use crate::config::OllamaConfig;
use crate::error::{Error, Result};

/// Ollama inference engine.
///
/// Communicates with an Ollama server over its HTTP API.
pub struct OllamaEngine {
    http_client: Client,
    base_url: String,
}

impl OllamaEngine {
    /// Build an engine whose outbound calls are bounded by the configured
    /// timeouts.
    pub fn from_config(config: &OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| Error::Communication(e.to_string()))?;

        Ok(Self {
            http_client: client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

// ============================================================================
// Ollama API types
// ============================================================================

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: ChatMessage,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

/// Response from /api/tags endpoint.
#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    #[serde(default)]
    models: Vec<OllamaModelInfo>,
}

#[derive(Debug, Deserialize)]
struct OllamaModelInfo {
    name: String,
    /// Tag-qualified identifier; older servers only send `name`.
    #[serde(default)]
    model: Option<String>,
}

impl OllamaModelInfo {
    fn into_id(self) -> String {
        self.model.unwrap_or(self.name)
    }
}

// ============================================================================
// InferenceEngine implementation
// ============================================================================

#[async_trait]
impl InferenceEngine for OllamaEngine {
    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Communication(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Communication(format!(
                "Ollama returned {}",
                response.status()
            )));
        }

        let tags: OllamaTagsResponse = response
            .json()
            .await
            .map_err(|e| Error::Communication(e.to_string()))?;

        Ok(tags.models.into_iter().map(OllamaModelInfo::into_id).collect())
    }

    async fn chat(&self, model_id: &str, messages: &[ChatMessage]) -> Result<EngineReply> {
        let url = format!("{}/api/chat", self.base_url);

        let request = OllamaChatRequest {
            model: model_id,
            messages,
            stream: false,
        };

        tracing::debug!(model = %model_id, messages = messages.len(), "Sending chat to Ollama");

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Communication(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Communication(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let ollama_response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Communication(e.to_string()))?;

        Ok(EngineReply {
            message: ollama_response.message,
            done: ollama_response.done,
            done_reason: ollama_response.done_reason,
            prompt_tokens: ollama_response.prompt_eval_count,
            completion_tokens: ollama_response.eval_count,
        })
    }
}
