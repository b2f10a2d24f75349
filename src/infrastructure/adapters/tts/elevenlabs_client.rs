//! ElevenLabs TTS Client - 调用 ElevenLabs HTTP API
//!
//! 实现 TtsProviderPort trait，通过 HTTP 调用供应商服务
//!
//! 供应商 API:
//! GET  {base}/v1/voices                            -> 音色列表 (JSON)
//! POST {base}/v1/text-to-speech/{voice_id}/stream  -> 音频字节
//! 两者都要求 xi-api-key 请求头；非 2xx 一律视为供应商错误，
//! 客户端不做自动重试。

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{ProviderError, SynthesisRequest, TtsProviderPort};
use crate::domain::voice::{Voice, VoiceCategory, VoiceId};

/// ElevenLabs 客户端配置
#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    /// 供应商基础 URL
    pub base_url: String,
    /// API key（xi-api-key 请求头）
    pub api_key: String,
    /// 合成模型
    pub model_id: String,
    /// 供应商端的流式延迟优化档位
    pub optimize_streaming_latency: u8,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io".to_string(),
            api_key: String::new(),
            model_id: "eleven_multilingual_v2".to_string(),
            optimize_streaming_latency: 1,
            timeout_secs: 30,
        }
    }
}

impl ElevenLabsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// 合成请求的 voice_settings 载荷
#[derive(Debug, Clone, Serialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.7,
            similarity_boost: 0.8,
            style: 0.5,
            use_speaker_boost: true,
        }
    }
}

#[derive(Debug, Serialize)]
struct SynthesizeBody<'a> {
    model_id: &'a str,
    text: &'a str,
    voice_settings: &'a VoiceSettings,
}

#[derive(Debug, Deserialize)]
struct VoicesEnvelope {
    #[serde(default)]
    voices: Vec<VoiceItem>,
}

#[derive(Debug, Deserialize)]
struct VoiceItem {
    voice_id: String,
    name: String,
    #[serde(default)]
    category: String,
}

/// ElevenLabs HTTP 客户端
pub struct ElevenLabsClient {
    client: Client,
    config: ElevenLabsConfig,
    voice_settings: VoiceSettings,
}

impl ElevenLabsClient {
    /// 创建新的客户端
    pub fn new(config: ElevenLabsConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            client,
            config,
            voice_settings: VoiceSettings::default(),
        })
    }

    /// 覆盖默认的 voice_settings
    pub fn with_voice_settings(mut self, voice_settings: VoiceSettings) -> Self {
        self.voice_settings = voice_settings;
        self
    }

    fn voices_url(&self) -> String {
        format!("{}/v1/voices", self.config.base_url)
    }

    fn synthesize_url(&self, voice_id: &VoiceId) -> String {
        format!(
            "{}/v1/text-to-speech/{}/stream",
            self.config.base_url, voice_id
        )
    }

    fn map_send_error(error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout
        } else if error.is_connect() {
            ProviderError::Network(format!("Cannot connect to TTS provider: {}", error))
        } else {
            ProviderError::Network(error.to_string())
        }
    }
}

#[async_trait]
impl TtsProviderPort for ElevenLabsClient {
    async fn fetch_voices(&self) -> Result<Vec<Voice>, ProviderError> {
        let response = self
            .client
            .get(self.voices_url())
            .header("xi-api-key", &self.config.api_key)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: VoicesEnvelope = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let voices: Vec<Voice> = envelope
            .voices
            .into_iter()
            .map(|item| {
                Voice::new(
                    VoiceId::new(item.voice_id),
                    item.name,
                    VoiceCategory::parse(&item.category),
                )
            })
            .collect();

        tracing::debug!(count = voices.len(), "Voice list fetched from provider");
        Ok(voices)
    }

    async fn synthesize(&self, request: SynthesisRequest) -> Result<Bytes, ProviderError> {
        let url = self.synthesize_url(&request.voice_id);
        let body = SynthesizeBody {
            model_id: &self.config.model_id,
            text: &request.text,
            voice_settings: &self.voice_settings,
        };

        tracing::debug!(
            url = %url,
            voice_id = %request.voice_id,
            text_len = request.text.len(),
            "Sending synthesis request"
        );

        let response = self
            .client
            .post(&url)
            .query(&[(
                "optimize_streaming_latency",
                self.config.optimize_streaming_latency,
            )])
            .header("xi-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to read audio: {}", e)))?;

        tracing::info!(
            voice_id = %request.voice_id,
            audio_size = audio.len(),
            "Synthesis completed"
        );
        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ElevenLabsConfig::default();
        assert_eq!(config.base_url, "https://api.elevenlabs.io");
        assert_eq!(config.model_id, "eleven_multilingual_v2");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_config_builder() {
        let config = ElevenLabsConfig::new("secret")
            .with_base_url("http://localhost:9000")
            .with_timeout(5);
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_synthesize_url_embeds_voice_id() {
        let client = ElevenLabsClient::new(ElevenLabsConfig::default()).unwrap();
        assert_eq!(
            client.synthesize_url(&VoiceId::new("abc")),
            "https://api.elevenlabs.io/v1/text-to-speech/abc/stream"
        );
    }
}
