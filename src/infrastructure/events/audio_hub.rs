//! Audio Hub - 频道音频帧广播
//!
//! 每个语音频道一条 broadcast 通道：transport 把播出的帧发布到
//! 频道，WebSocket 监听端订阅后转发给客户端。没有监听者时帧被
//! 丢弃，不阻塞播放。

use std::sync::Arc;

use bytes::Bytes;
use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::domain::ids::{ChannelId, RoomId};

/// 广播容量；落后超过这个数量的监听者会丢帧
const CHANNEL_CAPACITY: usize = 16;

/// 广播到频道的帧
#[derive(Debug, Clone)]
pub enum AudioFrame {
    /// 一段完整 utterance 的音频
    Utterance {
        room: RoomId,
        unit_id: Uuid,
        /// 输出增益（1.0 = 原始音量）
        gain: f32,
        /// 估算的播出时长
        duration_ms: u64,
        audio: Bytes,
    },
    /// 房间的 transport 已断开
    Disconnected { room: RoomId },
}

/// 音频帧发布器
pub struct AudioHub {
    channels: DashMap<ChannelId, broadcast::Sender<AudioFrame>>,
}

impl AudioHub {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅频道的音频帧
    pub fn subscribe(&self, channel: ChannelId) -> broadcast::Receiver<AudioFrame> {
        self.channels
            .entry(channel)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// 发布帧到频道；没有监听者时丢弃
    pub fn publish(&self, channel: ChannelId, frame: AudioFrame) {
        match self.channels.get(&channel) {
            Some(sender) => {
                if let Err(error) = sender.send(frame) {
                    tracing::debug!(
                        channel = %channel,
                        error = %error,
                        "No listeners for audio frame"
                    );
                }
            }
            None => {
                tracing::debug!(channel = %channel, "No listeners registered for channel");
            }
        }
    }

    /// 频道当前的监听者数量
    pub fn listener_count(&self, channel: ChannelId) -> usize {
        self.channels
            .get(&channel)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}

impl Default for AudioHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribe_then_publish_delivers_frame() {
        let hub = AudioHub::new();
        let channel = ChannelId::new(10);
        let mut rx = hub.subscribe(channel);

        hub.publish(
            channel,
            AudioFrame::Disconnected {
                room: RoomId::new(1),
            },
        );

        let frame = rx.recv().await.unwrap();
        assert!(matches!(frame, AudioFrame::Disconnected { room } if room == RoomId::new(1)));
    }

    #[tokio::test]
    async fn test_publish_without_listeners_is_dropped() {
        let hub = AudioHub::new();
        // 不应 panic，也不应阻塞
        hub.publish(
            ChannelId::new(10),
            AudioFrame::Disconnected {
                room: RoomId::new(1),
            },
        );
        assert_eq!(hub.listener_count(ChannelId::new(10)), 0);
    }

    #[tokio::test]
    async fn test_channels_are_isolated() {
        let hub = AudioHub::new();
        let mut rx_a = hub.subscribe(ChannelId::new(1));
        let _rx_b = hub.subscribe(ChannelId::new(2));

        hub.publish(
            ChannelId::new(2),
            AudioFrame::Disconnected {
                room: RoomId::new(9),
            },
        );

        assert!(rx_a.try_recv().is_err());
    }
}
