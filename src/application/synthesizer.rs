//! Speech Synthesizer - 文本转语音
//!
//! 把 (text, voice) 变成可入队的 AudioUnit。长度上限在任何
//! 网络调用之前检查，超限请求不会触碰供应商；供应商失败原样
//! 上抛，不自动重试。

use std::sync::Arc;

use thiserror::Error;

use crate::application::ports::{AudioUnit, ProviderError, SynthesisRequest, TtsProviderPort};
use crate::domain::ids::{RoomId, UserId};
use crate::domain::voice::Voice;

/// 合成错误
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// 文本超出长度上限，未发起任何供应商调用
    #[error("Text too long: {len} chars (max {max})")]
    TooLong { len: usize, max: usize },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// 语音合成器
pub struct Synthesizer {
    provider: Arc<dyn TtsProviderPort>,
    /// 输入文本的字符数上限
    max_chars: usize,
}

impl Synthesizer {
    pub const DEFAULT_MAX_CHARS: usize = 100;

    pub fn new(provider: Arc<dyn TtsProviderPort>, max_chars: usize) -> Self {
        Self {
            provider,
            max_chars,
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// 合成一段语音
    ///
    /// 长度按 Unicode 标量计数；通过检查后恰好发起一次供应商
    /// 调用。
    pub async fn synthesize(
        &self,
        text: &str,
        voice: &Voice,
        requested_by: UserId,
        room: RoomId,
    ) -> Result<AudioUnit, SynthesisError> {
        let len = text.chars().count();
        if len > self.max_chars {
            return Err(SynthesisError::TooLong {
                len,
                max: self.max_chars,
            });
        }

        let audio = self
            .provider
            .synthesize(SynthesisRequest {
                text: text.to_string(),
                voice_id: voice.id().clone(),
            })
            .await?;

        let unit = AudioUnit::new(audio, requested_by, room);
        tracing::debug!(
            unit_id = %unit.id,
            voice = %voice.name(),
            text_len = len,
            audio_size = unit.audio.len(),
            "Speech synthesized"
        );
        Ok(unit)
    }
}
