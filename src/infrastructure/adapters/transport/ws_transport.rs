//! WebSocket Voice Transport - 把音频播出到频道的 WS 监听者
//!
//! play 把整段音频广播给频道订阅者，并按估算的播出时长调度完成
//! 信号。传输侧不做真实的音频时钟，只保证同一会话的完成信号
//! 间隔不小于估算时长，从而维持"不重叠"的播出节奏。

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::application::ports::{
    AudioUnit, PlaybackFinished, TransportError, VoiceGatewayPort, VoiceTransportPort,
};
use crate::domain::ids::{ChannelId, RoomId};
use crate::infrastructure::events::{AudioFrame, AudioHub};

/// 播出节奏配置
#[derive(Debug, Clone)]
pub struct PlaybackTiming {
    /// 按字节数估算时长的码率（字节/秒）
    pub bytes_per_sec: u64,
    /// 最短播出时长，防止极短音频把完成信号压成零
    pub min_duration_ms: u64,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self {
            // 约 128kbps 的 MP3
            bytes_per_sec: 16_000,
            min_duration_ms: 250,
        }
    }
}

impl PlaybackTiming {
    /// 估算一段音频的播出时长
    pub fn duration_for(&self, audio_len: usize) -> Duration {
        let ms = (audio_len as u64).saturating_mul(1000) / self.bytes_per_sec.max(1);
        Duration::from_millis(ms.max(self.min_duration_ms))
    }
}

struct TransportShared {
    channel: Option<ChannelId>,
    gain: f32,
}

/// WebSocket voice transport
///
/// 一个实例对应一个房间；频道与增益在 connect / move / volume
/// 之间共享。
pub struct WsVoiceTransport {
    room: RoomId,
    hub: Arc<AudioHub>,
    timing: PlaybackTiming,
    shared: Mutex<TransportShared>,
}

impl WsVoiceTransport {
    fn new(room: RoomId, hub: Arc<AudioHub>, timing: PlaybackTiming) -> Self {
        Self {
            room,
            hub,
            timing,
            shared: Mutex::new(TransportShared {
                channel: None,
                gain: 1.0,
            }),
        }
    }

    fn shared(&self) -> std::sync::MutexGuard<'_, TransportShared> {
        self.shared.lock().expect("transport state lock poisoned")
    }
}

#[async_trait]
impl VoiceTransportPort for WsVoiceTransport {
    async fn connect(&self, channel: ChannelId) -> Result<(), TransportError> {
        self.shared().channel = Some(channel);
        tracing::info!(room = %self.room, channel = %channel, "Transport connected");
        Ok(())
    }

    async fn move_to(&self, channel: ChannelId) -> Result<(), TransportError> {
        let mut shared = self.shared();
        if shared.channel.is_none() {
            return Err(TransportError::NotConnected);
        }
        shared.channel = Some(channel);
        tracing::info!(room = %self.room, channel = %channel, "Transport moved");
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        let channel = self.shared().channel.take();
        if let Some(channel) = channel {
            self.hub
                .publish(channel, AudioFrame::Disconnected { room: self.room });
            tracing::info!(room = %self.room, channel = %channel, "Transport disconnected");
        }
        Ok(())
    }

    fn play(&self, unit: &AudioUnit) -> Result<oneshot::Receiver<PlaybackFinished>, TransportError> {
        let (channel, gain) = {
            let shared = self.shared();
            (shared.channel.ok_or(TransportError::NotConnected)?, shared.gain)
        };

        let duration = self.timing.duration_for(unit.audio.len());
        self.hub.publish(
            channel,
            AudioFrame::Utterance {
                room: self.room,
                unit_id: unit.id,
                gain,
                duration_ms: duration.as_millis() as u64,
                audio: unit.audio.clone(),
            },
        );

        tracing::debug!(
            room = %self.room,
            channel = %channel,
            unit_id = %unit.id,
            duration_ms = duration.as_millis() as u64,
            "Utterance broadcast to listeners"
        );

        let (finished_tx, finished_rx) = oneshot::channel();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let _ = finished_tx.send(PlaybackFinished::ok());
        });
        Ok(finished_rx)
    }

    fn set_volume(&self, gain: f32) -> Result<(), TransportError> {
        let mut shared = self.shared();
        if shared.channel.is_none() {
            return Err(TransportError::NotConnected);
        }
        shared.gain = gain;
        Ok(())
    }

    fn current_channel(&self) -> Option<ChannelId> {
        self.shared().channel
    }
}

/// 为房间创建 WS transport 的 gateway
pub struct WsVoiceGateway {
    hub: Arc<AudioHub>,
    timing: PlaybackTiming,
}

impl WsVoiceGateway {
    pub fn new(hub: Arc<AudioHub>, timing: PlaybackTiming) -> Self {
        Self { hub, timing }
    }
}

impl VoiceGatewayPort for WsVoiceGateway {
    fn open(&self, room: RoomId) -> Arc<dyn VoiceTransportPort> {
        Arc::new(WsVoiceTransport::new(
            room,
            self.hub.clone(),
            self.timing.clone(),
        ))
    }
}
