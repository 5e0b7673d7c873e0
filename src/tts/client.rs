//! Speech synthesis client (C12). A thin reqwest wrapper over the
//! configured TTS provider, returning raw MP3-equivalent bytes. Credential
//! absence degrades to `is_configured() == false` rather than an error —
//! the caller (`AnswerService`) is responsible for skipping synthesis in
//! that case rather than treating it as fatal.

use std::time::Duration;

use serde_json::json;

use crate::config::TtsConfig;
use crate::error::{ServiceError, ServiceResult};

const CALL_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_STABILITY: f32 = 0.5;
const DEFAULT_SIMILARITY_BOOST: f32 = 0.75;

pub struct TTSClient {
    http: reqwest::Client,
    config: TtsConfig,
}

impl TTSClient {
    pub fn new(config: TtsConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Synthesise `text` into raw audio bytes. Rejects empty input; the
    /// caller must check `is_configured()` before calling since the absence
    /// of credentials is never treated as a `TtsError` here.
    pub async fn synthesize(&self, text: &str) -> ServiceResult<Vec<u8>> {
        if text.trim().is_empty() {
            return Err(ServiceError::InvalidRequest("cannot synthesize empty text".into()));
        }

        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| ServiceError::ProviderNotConfigured("TTS provider not configured".into()))?;

        let url = format!("https://api.elevenlabs.io/v1/text-to-speech/{}", self.config.voice_id);

        let resp = self
            .http
            .post(&url)
            .header("xi-api-key", api_key)
            .json(&json!({
                "text": text,
                "model_id": self.config.model_id,
                "voice_settings": {
                    "stability": DEFAULT_STABILITY,
                    "similarity_boost": DEFAULT_SIMILARITY_BOOST,
                }
            }))
            .timeout(CALL_TIMEOUT)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ServiceError::ProviderError(format!("TTS provider returned {}", resp.status())));
        }

        let bytes = resp.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> TtsConfig {
        TtsConfig {
            api_key: api_key.map(|s| s.to_string()),
            voice_id: "voice-1".into(),
            model_id: "model-1".into(),
        }
    }

    #[test]
    fn is_configured_reflects_api_key_presence() {
        assert!(TTSClient::new(config(Some("key"))).is_configured());
        assert!(!TTSClient::new(config(None)).is_configured());
    }

    #[tokio::test]
    async fn rejects_empty_text() {
        let client = TTSClient::new(config(Some("key")));
        let err = client.synthesize("   ").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn rejects_when_not_configured() {
        let client = TTSClient::new(config(None));
        let err = client.synthesize("hello").await.unwrap_err();
        assert!(matches!(err, ServiceError::ProviderNotConfigured(_)));
    }
}
