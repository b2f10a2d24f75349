//! Voice Transport Port - 语音传输抽象
//!
//! 一个 transport 实例对应一个房间的语音连接。play 的完成信号
//! 是播放队列推进的唯一驱动：每个单元恰好触发一次，无论播出
//! 成功还是出错。

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::domain::ids::{ChannelId, RoomId, UserId};

/// 一次合成语音的音频载荷，播放的原子单位
///
/// 入队后由所属会话的队列独占持有，播完或会话拆除时销毁。
#[derive(Debug, Clone)]
pub struct AudioUnit {
    /// 单元标识，日志追踪用
    pub id: Uuid,
    /// 解码后的音频字节
    pub audio: Bytes,
    /// 发起请求的用户
    pub requested_by: UserId,
    /// 目标房间
    pub room: RoomId,
}

impl AudioUnit {
    pub fn new(audio: Bytes, requested_by: UserId, room: RoomId) -> Self {
        Self {
            id: Uuid::new_v4(),
            audio,
            requested_by,
            room,
        }
    }
}

/// 播放完成信号
///
/// error 非空表示播放器错误；会话记录日志后继续播下一个单元，
/// 不会因此终止。
#[derive(Debug)]
pub struct PlaybackFinished {
    pub error: Option<String>,
}

impl PlaybackFinished {
    pub fn ok() -> Self {
        Self { error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
        }
    }
}

/// Transport 错误
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Not connected to a voice channel")]
    NotConnected,

    #[error("Transport failure: {0}")]
    Failed(String),
}

/// Voice Transport Port
///
/// 调用方（PlaybackSession）负责把 connect / move / play /
/// finished 串行化；transport 只需保证 play 立即返回并恰好
/// 发送一次完成信号。
#[async_trait]
pub trait VoiceTransportPort: Send + Sync {
    /// 连接到指定语音频道
    async fn connect(&self, channel: ChannelId) -> Result<(), TransportError>;

    /// 移动到另一个语音频道
    ///
    /// 纯频道切换，不打断正在播出的单元。
    async fn move_to(&self, channel: ChannelId) -> Result<(), TransportError>;

    /// 断开连接并释放资源
    async fn disconnect(&self) -> Result<(), TransportError>;

    /// 开始播出一个单元，立即返回
    ///
    /// 播出结束时在返回的 receiver 上发送一次 PlaybackFinished；
    /// sender 被丢弃视同播放器错误。
    fn play(&self, unit: &AudioUnit) -> Result<oneshot::Receiver<PlaybackFinished>, TransportError>;

    /// 调整输出增益（1.0 = 原始音量），立即生效
    fn set_volume(&self, gain: f32) -> Result<(), TransportError>;

    /// 当前连接的频道
    fn current_channel(&self) -> Option<ChannelId>;
}

/// Voice Gateway Port
///
/// 会话注册表通过它为房间创建尚未连接的 transport。
pub trait VoiceGatewayPort: Send + Sync {
    fn open(&self, room: RoomId) -> Arc<dyn VoiceTransportPort>;
}
