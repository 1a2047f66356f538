use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

use crate::ai::ImageApi;
use crate::config::Config;
use crate::credential::Credential;
use crate::error::StudioError;

/// The decoded result of the most recent generate action.
///
/// The bytes stay in memory for the session; nothing is written to disk.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub prompt: String,
    pub bytes: Vec<u8>,
}

/// Decode a provider image payload into raw bytes.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>, StudioError> {
    Ok(BASE64_STANDARD.decode(payload)?)
}

/// Request one fixed-size image and decode the returned payload.
///
/// Validation order: credential, prompt, then the enable flag. The flag is a
/// deliberate secondary gate: a disabled studio reports a warning without
/// issuing the request even when credential and prompt are valid. Exactly one
/// request goes out per call; there are no retries.
pub async fn generate_image(
    api: &dyn ImageApi,
    credential: &Credential,
    config: &Config,
    prompt: &str,
) -> Result<GeneratedImage, StudioError> {
    if credential.is_empty() {
        return Err(StudioError::Validation(
            "Please enter your OpenAI API key!".to_string(),
        ));
    }
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(StudioError::Validation(
            "Please enter an image prompt!".to_string(),
        ));
    }
    if !config.image_generation {
        return Err(StudioError::Validation(
            "Image generation is disabled. Press g to enable it.".to_string(),
        ));
    }

    let payload = api
        .generate(credential, &config.image_model, prompt, &config.image_size)
        .await?;
    let bytes = decode_payload(&payload)?;

    Ok(GeneratedImage {
        prompt: prompt.to_string(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Stub provider that counts calls and returns a fixed payload.
    struct StubImages {
        calls: AtomicUsize,
        payload: Result<String, String>,
    }

    impl StubImages {
        fn returning(payload: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                payload: Ok(payload.to_string()),
            }
        }

        fn failing(error: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                payload: Err(error.to_string()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageApi for StubImages {
        async fn generate(
            &self,
            _credential: &Credential,
            _model: &str,
            _prompt: &str,
            _size: &str,
        ) -> Result<String, StudioError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.payload {
                Ok(payload) => Ok(payload.clone()),
                Err(error) => Err(StudioError::Provider(error.clone())),
            }
        }
    }

    fn enabled_config() -> Config {
        Config {
            image_generation: true,
            ..Config::new()
        }
    }

    #[tokio::test]
    async fn disabled_toggle_blocks_the_request_even_with_valid_inputs() {
        let api = StubImages::returning("aGVsbG8=");
        let config = Config::new();
        assert!(!config.image_generation);

        let err = generate_image(&api, &Credential::new("sk-test"), &config, "a dragon")
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().contains("disabled"));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn empty_credential_blocks_the_request() {
        let api = StubImages::returning("aGVsbG8=");

        let err = generate_image(&api, &Credential::new(" "), &enabled_config(), "a dragon")
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn empty_prompt_blocks_the_request() {
        let api = StubImages::returning("aGVsbG8=");

        let err = generate_image(&api, &Credential::new("sk-test"), &enabled_config(), "  ")
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn successful_generation_decodes_the_payload() {
        // "aGVsbG8=" is the standard-alphabet encoding of b"hello".
        let api = StubImages::returning("aGVsbG8=");

        let image = generate_image(&api, &Credential::new("sk-test"), &enabled_config(), "a dragon")
            .await
            .unwrap();

        assert_eq!(api.calls(), 1);
        assert_eq!(image.prompt, "a dragon");
        assert_eq!(image.bytes, b"hello");
    }

    #[tokio::test]
    async fn provider_failure_is_surfaced_verbatim() {
        let api = StubImages::failing("model_not_found");

        let err = generate_image(&api, &Credential::new("sk-test"), &enabled_config(), "a dragon")
            .await
            .unwrap_err();

        assert!(matches!(err, StudioError::Provider(_)));
        assert!(err.to_string().contains("model_not_found"));
    }

    #[tokio::test]
    async fn malformed_payload_is_a_decode_error() {
        let api = StubImages::returning("not base64!!!");

        let err = generate_image(&api, &Credential::new("sk-test"), &enabled_config(), "a dragon")
            .await
            .unwrap_err();

        assert!(matches!(err, StudioError::Decode(_)));
    }

    #[test]
    fn decode_round_trips_a_known_byte_sequence() {
        let bytes = decode_payload("AAECA/8=").unwrap();
        assert_eq!(bytes, vec![0x00, 0x01, 0x02, 0x03, 0xff]);
    }
}
