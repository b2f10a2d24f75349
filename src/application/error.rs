//! 应用层错误定义
//!
//! 命令层的用户可见错误。每个变体的 Display 即回复给用户的
//! 消息；供应商 / 传输失败在命令边界收敛到这里，不向上传播为
//! 进程级故障。

use thiserror::Error;

use crate::application::catalog::CatalogError;
use crate::application::playback::SessionError;
use crate::application::ports::{ProviderError, TransportError};
use crate::application::synthesizer::SynthesisError;

/// 命令错误
#[derive(Debug, Error)]
pub enum CommandError {
    /// 发起命令的用户不在任何语音频道中
    #[error("You are not in a voice channel.")]
    NotInVoiceChannel,

    /// 请求的音色名没有匹配
    #[error("No voice found.")]
    VoiceNotFound { name: String },

    /// 文本超出长度上限，在任何网络调用之前拒绝
    #[error("Max {max} chars. Your text is too long ({len} chars).")]
    TextTooLong { len: usize, max: usize },

    /// 供应商合成失败，未入队任何单元
    #[error("Failed to generate audio.")]
    Synthesis(#[source] ProviderError),

    /// 音色缓存为空，没有可用音色
    #[error("No voices available.")]
    NoVoicesAvailable,

    /// 房间没有活跃的语音连接
    #[error("Not connected to a voice channel.")]
    NotConnected,

    /// 语音连接建立或切换失败
    #[error("Failed to join the voice channel.")]
    Transport(#[source] TransportError),
}

impl From<SynthesisError> for CommandError {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::TooLong { len, max } => Self::TextTooLong { len, max },
            SynthesisError::Provider(e) => Self::Synthesis(e),
        }
    }
}

impl From<CatalogError> for CommandError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Empty => Self::NoVoicesAvailable,
            CatalogError::Unavailable(e) => Self::Synthesis(e),
        }
    }
}

impl From<SessionError> for CommandError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Closed => Self::NotConnected,
            SessionError::Transport(TransportError::NotConnected) => Self::NotConnected,
            SessionError::Transport(e) => Self::Transport(e),
        }
    }
}
