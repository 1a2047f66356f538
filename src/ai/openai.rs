use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::ai::{ChatApi, ChatMessage, ImageApi};
use crate::credential::Credential;
use crate::error::StudioError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(serde::Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    response_format: &'a str,
}

#[derive(Deserialize)]
struct ImageDatum {
    b64_json: String,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageDatum>,
}

/// Client for the OpenAI chat-completion and image-generation endpoints.
///
/// The base URL is overridable so tests can point at a local mock server.
/// The credential travels per call; the client itself never stores it.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
}

impl OpenAiClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for OpenAiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatApi for OpenAiClient {
    async fn complete(
        &self,
        credential: &Credential,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, StudioError> {
        let request = ChatRequest { model, messages };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", credential.expose()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| StudioError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(StudioError::Provider(format!(
                "OpenAI API error {}: {}",
                status, text
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| StudioError::Provider(e.to_string()))?;
        Ok(chat_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl ImageApi for OpenAiClient {
    async fn generate(
        &self,
        credential: &Credential,
        model: &str,
        prompt: &str,
        size: &str,
    ) -> Result<String, StudioError> {
        let request = ImageRequest {
            model,
            prompt,
            size,
            response_format: "b64_json",
        };

        let response = self
            .client
            .post(format!("{}/images/generations", self.base_url))
            .header("Authorization", format!("Bearer {}", credential.expose()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| StudioError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(StudioError::Provider(format!(
                "OpenAI API error {}: {}",
                status, text
            )));
        }

        let image_response: ImageResponse = response
            .json()
            .await
            .map_err(|e| StudioError::Provider(e.to_string()))?;
        image_response
            .data
            .into_iter()
            .next()
            .map(|d| d.b64_json)
            .ok_or_else(|| StudioError::Provider("image response contained no data".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn complete_posts_system_first_and_returns_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "You are a film critic."},
                    {"role": "user", "content": "Review Stalker."}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "A masterpiece."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiClient::with_base_url(&server.uri());
        let messages = vec![
            ChatMessage::system("You are a film critic."),
            ChatMessage::user("Review Stalker."),
        ];
        let reply = client
            .complete(&Credential::new("sk-test"), "gpt-4o-mini", &messages)
            .await
            .unwrap();
        assert_eq!(reply, "A masterpiece.");
    }

    #[tokio::test]
    async fn complete_surfaces_error_body_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Incorrect API key provided"))
            .mount(&server)
            .await;

        let client = OpenAiClient::with_base_url(&server.uri());
        let err = client
            .complete(&Credential::new("sk-bad"), "gpt-4o-mini", &[ChatMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::Provider(_)));
        assert!(err.to_string().contains("Incorrect API key provided"));
    }

    #[tokio::test]
    async fn generate_requests_b64_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-image-1",
                "prompt": "a dreamy sunset over a neon city skyline",
                "size": "1024x1024",
                "response_format": "b64_json"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"b64_json": "aGVsbG8="}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiClient::with_base_url(&server.uri());
        let payload = client
            .generate(
                &Credential::new("sk-test"),
                "gpt-image-1",
                "a dreamy sunset over a neon city skyline",
                "1024x1024",
            )
            .await
            .unwrap();
        assert_eq!(payload, "aGVsbG8=");
    }

    #[tokio::test]
    async fn generate_with_empty_data_is_a_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&server)
            .await;

        let client = OpenAiClient::with_base_url(&server.uri());
        let err = client
            .generate(&Credential::new("sk-test"), "gpt-image-1", "a dragon", "1024x1024")
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::Provider(_)));
    }
}
