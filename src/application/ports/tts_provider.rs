//! TTS Provider Port - 远程语音合成服务抽象
//!
//! 定义音色列表拉取与语音合成的抽象接口，具体实现在
//! infrastructure/adapters 层

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::domain::voice::{Voice, VoiceId};

/// TTS 供应商错误
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Provider returned HTTP {status}: {message}")]
    Service { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// 要合成的文本内容
    pub text: String,
    /// 目标音色
    pub voice_id: VoiceId,
}

/// TTS Provider Port
///
/// 外部 TTS 服务的抽象接口。任何传输 / HTTP 失败都映射为
/// ProviderError；端口自身不做重试，是否重试由调用方决定。
#[async_trait]
pub trait TtsProviderPort: Send + Sync {
    /// 拉取供应商的完整音色列表
    async fn fetch_voices(&self) -> Result<Vec<Voice>, ProviderError>;

    /// 合成一段语音，返回完整的音频字节
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Bytes, ProviderError>;
}
