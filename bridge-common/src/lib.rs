//! Ollama bridge common types
//!
//! OpenAI-compatible wire types shared by the bridge server and its clients.

pub mod chat;
pub mod status;

pub use chat::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, Usage};
pub use status::{ErrorResponse, ModelInventoryResponse, StatusMessage};
