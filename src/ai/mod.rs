//! Provider seams and the OpenAI-backed implementation.
//!
//! The session and image operations talk to these traits instead of a
//! concrete HTTP client, so tests can substitute stub providers.

pub mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;

use crate::credential::Credential;
use crate::error::StudioError;

/// One message in a chat-completion request, in wire order.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Sends an ordered message list to a chat-completion endpoint and returns
/// the assistant's reply text.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn complete(
        &self,
        credential: &Credential,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, StudioError>;
}

/// Requests a single image and returns the provider's base64-encoded payload.
#[async_trait]
pub trait ImageApi: Send + Sync {
    async fn generate(
        &self,
        credential: &Credential,
        model: &str,
        prompt: &str,
        size: &str,
    ) -> Result<String, StudioError>;
}
