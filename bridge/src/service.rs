//! Gateway service: model resolution, fallback and delegation.

use std::sync::Arc;

use bridge_common::{ChatCompletionRequest, ChatCompletionResponse};

use crate::engine::InferenceEngine;
use crate::error::{Error, Result};
use crate::inventory::ModelInventory;

/// Outcome of resolving a requested model against the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Model named by the client.
    pub requested: String,
    /// Model the request will actually run on.
    pub model: String,
    /// Whether resolution had to refresh the inventory.
    pub refreshed: bool,
}

impl Resolution {
    /// True when the request runs on a different model than it asked for.
    pub fn substituted(&self) -> bool {
        self.requested != self.model
    }
}

/// A completed chat call together with how its model was resolved.
#[derive(Debug, Clone)]
pub struct Completion {
    pub response: ChatCompletionResponse,
    pub resolution: Resolution,
}

/// Owns the engine handle and the model inventory.
pub struct GatewayService {
    engine: Arc<dyn InferenceEngine>,
    inventory: ModelInventory,
}

impl GatewayService {
    /// Create a service with an empty inventory. Call
    /// [`refresh_inventory`](Self::refresh_inventory) before serving.
    pub fn new(engine: Arc<dyn InferenceEngine>) -> Self {
        Self::with_inventory(engine, Vec::new())
    }

    /// Create a service with a pre-populated inventory.
    pub fn with_inventory(engine: Arc<dyn InferenceEngine>, models: Vec<String>) -> Self {
        Self {
            engine,
            inventory: ModelInventory::with_models(models),
        }
    }

    /// Current inventory without contacting the engine.
    pub async fn cached_models(&self) -> Arc<[String]> {
        self.inventory.snapshot().await
    }

    /// Replace the inventory with the engine's current list, keeping its
    /// order. On engine failure the inventory is left untouched.
    pub async fn refresh_inventory(&self) -> Result<Arc<[String]>> {
        let models = self.engine.list_models().await?;

        let snapshot = self.inventory.replace(models).await;
        tracing::info!(count = snapshot.len(), "Model inventory refreshed");
        Ok(snapshot)
    }

    /// Refresh, then return the inventory.
    pub async fn model_inventory(&self) -> Result<Arc<[String]>> {
        self.refresh_inventory().await
    }

    /// Map the requested model onto one present in the inventory.
    ///
    /// A cache miss is treated as a stale cache: the inventory is refreshed
    /// once and checked again. If the model is still unknown the first
    /// available model is used instead.
    pub async fn resolve_model(&self, requested: &str) -> Result<Resolution> {
        if self.inventory.contains(requested).await {
            return Ok(Resolution {
                requested: requested.to_string(),
                model: requested.to_string(),
                refreshed: false,
            });
        }

        let models = self.refresh_inventory().await?;

        if models.iter().any(|m| m == requested) {
            return Ok(Resolution {
                requested: requested.to_string(),
                model: requested.to_string(),
                refreshed: true,
            });
        }

        let fallback = models.first().ok_or(Error::NoModelsAvailable)?;

        tracing::warn!(
            requested = %requested,
            substitute = %fallback,
            "Model '{}' not found. Using '{}' instead.",
            requested,
            fallback
        );

        Ok(Resolution {
            requested: requested.to_string(),
            model: fallback.clone(),
            refreshed: true,
        })
    }

    /// Resolve the model, run the chat on the engine and wrap the reply.
    pub async fn chat_completion(&self, request: &ChatCompletionRequest) -> Result<Completion> {
        let resolution = self.resolve_model(&request.model).await?;

        let reply = self
            .engine
            .chat(&resolution.model, &request.messages)
            .await?;

        let finish_reason = reply.finish_reason();
        let mut response =
            ChatCompletionResponse::new(resolution.model.clone(), reply.message, finish_reason);

        if let (Some(prompt), Some(completion)) = (reply.prompt_tokens, reply.completion_tokens) {
            response = response.with_usage(prompt, completion);
        }

        Ok(Completion {
            response,
            resolution,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::ScriptedEngine;
    use serde_json::json;

    fn service(engine: &Arc<ScriptedEngine>, cached: &[&str]) -> GatewayService {
        GatewayService::with_inventory(
            engine.clone(),
            cached.iter().map(|m| m.to_string()).collect(),
        )
    }

    fn request(model: &str) -> ChatCompletionRequest {
        serde_json::from_value(json!({
            "model": model,
            "messages": [{"role": "user", "content": "hi"}]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_cached_model_resolves_without_refresh() {
        let engine = Arc::new(ScriptedEngine::with_models(&["llama3", "mistral"]));
        let service = service(&engine, &["llama3"]);

        let resolution = service.resolve_model("llama3").await.unwrap();

        assert_eq!(resolution.model, "llama3");
        assert!(!resolution.substituted());
        assert!(!resolution.refreshed);
        assert_eq!(engine.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_miss_refreshes_once_and_accepts_live_model() {
        let engine = Arc::new(ScriptedEngine::with_models(&["llama3", "phi3"]));
        let service = service(&engine, &["llama3"]);

        let resolution = service.resolve_model("phi3").await.unwrap();

        assert_eq!(resolution.model, "phi3");
        assert!(!resolution.substituted());
        assert!(resolution.refreshed);
        assert_eq!(engine.list_calls(), 1);
        assert_eq!(&*service.cached_models().await, &["llama3", "phi3"]);
    }

    #[tokio::test]
    async fn test_unknown_model_falls_back_to_first_live_model() {
        let engine = Arc::new(ScriptedEngine::with_models(&["mistral", "llama3"]));
        let service = service(&engine, &["gemma"]);

        let resolution = service.resolve_model("gpt-4").await.unwrap();

        assert_eq!(resolution.requested, "gpt-4");
        assert_eq!(resolution.model, "mistral");
        assert!(resolution.substituted());
        assert_eq!(engine.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_live_list_is_not_found() {
        let engine = Arc::new(ScriptedEngine::with_models(&[]));
        let service = service(&engine, &["stale"]);

        let err = service.resolve_model("llama3").await.unwrap_err();

        assert!(matches!(err, Error::NoModelsAvailable));
        assert!(service.cached_models().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_inventory_never_invokes_chat() {
        let engine = Arc::new(ScriptedEngine::with_models(&[]));
        let service = service(&engine, &[]);

        let err = service.chat_completion(&request("llama3")).await.unwrap_err();

        assert!(matches!(err, Error::NoModelsAvailable));
        assert!(engine.chat_models().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_failure_propagates_and_keeps_cache() {
        let engine = Arc::new(ScriptedEngine::with_models(&["llama3"]));
        engine.fail_list(true);
        let service = service(&engine, &["mistral"]);

        let err = service.resolve_model("llama3").await.unwrap_err();

        assert!(matches!(err, Error::Communication(_)));
        assert_eq!(&*service.cached_models().await, &["mistral"]);
    }

    #[tokio::test]
    async fn test_model_inventory_always_refreshes() {
        let engine = Arc::new(ScriptedEngine::with_models(&["a", "b"]));
        let service = service(&engine, &["a"]);

        let models = service.model_inventory().await.unwrap();

        assert_eq!(&*models, &["a", "b"]);
        assert_eq!(engine.list_calls(), 1);

        service.model_inventory().await.unwrap();
        assert_eq!(engine.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_chat_completion_uses_requested_model() {
        let engine = Arc::new(ScriptedEngine::with_models(&["llama3"]));
        let service = service(&engine, &["llama3"]);

        let completion = service.chat_completion(&request("llama3")).await.unwrap();

        assert_eq!(engine.chat_models(), vec!["llama3"]);
        assert_eq!(completion.response.model, "llama3");
        assert_eq!(
            serde_json::Value::Object(completion.response.message().unwrap().clone()),
            ScriptedEngine::reply_message("llama3")
        );
        assert_eq!(
            completion.response.choices[0].finish_reason.as_deref(),
            Some("stop")
        );
        let usage = completion.response.usage.unwrap();
        assert_eq!(usage.total_tokens, 6);
    }

    #[tokio::test]
    async fn test_chat_completion_with_substitute() {
        let engine = Arc::new(ScriptedEngine::with_models(&["mistral"]));
        let service = service(&engine, &["mistral"]);

        let completion = service.chat_completion(&request("llama3")).await.unwrap();

        assert_eq!(engine.chat_models(), vec!["mistral"]);
        assert_eq!(completion.response.model, "mistral");
        assert!(completion.resolution.substituted());
        assert_eq!(completion.resolution.requested, "llama3");
    }

    #[tokio::test]
    async fn test_chat_failure_is_communication_error() {
        let engine = Arc::new(ScriptedEngine::with_models(&["llama3"]));
        engine.fail_chat(true);
        let service = service(&engine, &["llama3"]);

        let err = service.chat_completion(&request("llama3")).await.unwrap_err();

        assert!(matches!(err, Error::Communication(_)));
    }
}
