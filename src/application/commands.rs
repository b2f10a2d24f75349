//! Command Router - 面向平台的命令分发
//!
//! say / voice / volume / stop 四条命令。每条命令恰好产生一条
//! 用户可见的确认或错误消息；say 在入队成功后立即确认，不等待
//! 实际播出。路由器在启动时显式装配，不依赖任何全局单例。

use std::sync::Arc;

use crate::application::catalog::VoiceCatalog;
use crate::application::error::CommandError;
use crate::application::playback::SessionRegistry;
use crate::application::ports::VoiceGatewayPort;
use crate::application::synthesizer::Synthesizer;
use crate::domain::ids::{ChannelId, RoomId, UserId};

/// say 命令：把一段文本播到用户所在的语音频道
#[derive(Debug, Clone)]
pub struct SayCommand {
    pub user: UserId,
    pub room: RoomId,
    /// 用户当前所在的语音频道；None 表示不在语音频道中
    pub channel: Option<ChannelId>,
    pub text: String,
}

/// voice 命令：设置用户的音色偏好
#[derive(Debug, Clone)]
pub struct SetVoiceCommand {
    pub user: UserId,
    pub name: String,
}

/// volume 命令：调整房间的输出音量
#[derive(Debug, Clone)]
pub struct SetVolumeCommand {
    pub room: RoomId,
    /// 百分比；100 为原始音量，允许超过 100
    pub percent: u16,
}

/// stop 命令：断开房间的语音连接
#[derive(Debug, Clone)]
pub struct StopCommand {
    pub room: RoomId,
}

/// 命令确认；Display 即回复给用户的消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Queued,
    VoiceSet { name: String },
    VolumeSet { percent: u16 },
    Disconnected,
}

impl std::fmt::Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queued => write!(f, "Message queued"),
            Self::VoiceSet { name } => write!(f, "Voice set to {}", name),
            Self::VolumeSet { percent } => write!(f, "Changed volume to {}%", percent),
            Self::Disconnected => write!(f, "Disconnected from the voice channel."),
        }
    }
}

/// 命令路由器
pub struct CommandRouter {
    catalog: Arc<VoiceCatalog>,
    synthesizer: Arc<Synthesizer>,
    registry: Arc<SessionRegistry>,
    gateway: Arc<dyn VoiceGatewayPort>,
}

impl CommandRouter {
    pub fn new(
        catalog: Arc<VoiceCatalog>,
        synthesizer: Arc<Synthesizer>,
        registry: Arc<SessionRegistry>,
        gateway: Arc<dyn VoiceGatewayPort>,
    ) -> Self {
        Self {
            catalog,
            synthesizer,
            registry,
            gateway,
        }
    }

    /// say：解析音色、合成、必要时建立连接、入队
    ///
    /// 合成的网络等待发生在取会话锁之前；长度超限在合成器里
    /// 先于任何供应商调用被拒绝。
    pub async fn say(&self, command: SayCommand) -> Result<Reply, CommandError> {
        let channel = command.channel.ok_or(CommandError::NotInVoiceChannel)?;
        let voice = self.catalog.voice_for(&command.user)?;
        let unit = self
            .synthesizer
            .synthesize(&command.text, &voice, command.user.clone(), command.room)
            .await?;

        let session = self
            .registry
            .get_or_create(command.room, || self.gateway.open(command.room));
        session.ensure_channel(channel).await?;
        session.enqueue(unit).await?;

        tracing::info!(
            room = %command.room,
            user = %command.user,
            voice = %voice.name(),
            "Say command queued"
        );
        Ok(Reply::Queued)
    }

    /// voice：按名称查找并记录用户偏好
    pub async fn set_voice(&self, command: SetVoiceCommand) -> Result<Reply, CommandError> {
        let voice = self
            .catalog
            .find_by_name(&command.name)
            .ok_or(CommandError::VoiceNotFound {
                name: command.name.clone(),
            })?;

        let name = voice.name().to_string();
        self.catalog.set_preference(command.user, voice);
        Ok(Reply::VoiceSet { name })
    }

    /// volume：作用于房间的活跃会话；没有会话时报未连接
    pub async fn set_volume(&self, command: SetVolumeCommand) -> Result<Reply, CommandError> {
        let session = self
            .registry
            .get(command.room)
            .ok_or(CommandError::NotConnected)?;
        session
            .set_volume(f32::from(command.percent) / 100.0)
            .await?;
        Ok(Reply::VolumeSet {
            percent: command.percent,
        })
    }

    /// stop：请求断开；在播单元放完，排队单元全部丢弃
    pub async fn stop(&self, command: StopCommand) -> Result<Reply, CommandError> {
        let session = self
            .registry
            .get(command.room)
            .ok_or(CommandError::NotConnected)?;
        session.request_disconnect().await;
        Ok(Reply::Disconnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::playback::SessionState;
    use crate::domain::voice::{Voice, VoiceCategory, VoiceId};
    use crate::infrastructure::adapters::transport::FakeVoiceGateway;
    use crate::infrastructure::adapters::tts::FakeTtsClient;
    use std::time::Duration;

    struct Fixture {
        router: CommandRouter,
        provider: Arc<FakeTtsClient>,
        gateway: Arc<FakeVoiceGateway>,
        catalog: Arc<VoiceCatalog>,
        registry: Arc<SessionRegistry>,
    }

    async fn fixture(voices: Vec<Voice>) -> Fixture {
        let provider = Arc::new(FakeTtsClient::new(voices));
        let catalog = VoiceCatalog::new(provider.clone()).arc();
        let _ = catalog.refresh().await;
        let synthesizer = Arc::new(Synthesizer::new(
            provider.clone(),
            Synthesizer::DEFAULT_MAX_CHARS,
        ));
        let registry = SessionRegistry::new().arc();
        let gateway = FakeVoiceGateway::new();
        let router = CommandRouter::new(
            catalog.clone(),
            synthesizer,
            registry.clone(),
            gateway.clone(),
        );
        Fixture {
            router,
            provider,
            gateway,
            catalog,
            registry,
        }
    }

    fn sample_voices() -> Vec<Voice> {
        vec![
            Voice::new(VoiceId::new("v-1"), "Rachel", VoiceCategory::Premade),
            Voice::new(VoiceId::new("v-2"), "Marcus", VoiceCategory::Cloned),
        ]
    }

    fn say(room: u64, channel: Option<u64>, text: &str) -> SayCommand {
        SayCommand {
            user: UserId::new("alice"),
            room: RoomId::new(room),
            channel: channel.map(ChannelId::new),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_say_queues_and_acknowledges_immediately() {
        let f = fixture(sample_voices()).await;

        let reply = f.router.say(say(1, Some(10), "hello")).await.unwrap();
        assert_eq!(reply, Reply::Queued);
        assert_eq!(reply.to_string(), "Message queued");

        // 入队即确认，此刻单元仍在播出中
        let session = f.registry.get(RoomId::new(1)).unwrap();
        assert_eq!(session.state().await, SessionState::Playing);
        assert_eq!(f.provider.synthesize_calls(), 1);
    }

    #[tokio::test]
    async fn test_say_not_in_voice_channel() {
        let f = fixture(sample_voices()).await;

        let result = f.router.say(say(1, None, "hello")).await;
        assert!(matches!(result, Err(CommandError::NotInVoiceChannel)));
        assert_eq!(f.provider.synthesize_calls(), 0);
        assert!(f.registry.get(RoomId::new(1)).is_none());
    }

    #[tokio::test]
    async fn test_say_too_long_makes_zero_provider_calls() {
        let f = fixture(sample_voices()).await;

        let text = "x".repeat(150);
        let result = f.router.say(say(1, Some(10), &text)).await;

        match result {
            Err(CommandError::TextTooLong { len, max }) => {
                assert_eq!(len, 150);
                assert_eq!(max, 100);
            }
            other => panic!("expected TextTooLong, got {:?}", other),
        }
        assert_eq!(f.provider.synthesize_calls(), 0);
    }

    #[tokio::test]
    async fn test_say_second_request_queues_behind_first() {
        let f = fixture(sample_voices()).await;

        f.router.say(say(1, Some(10), "first")).await.unwrap();
        f.router.say(say(1, Some(10), "second")).await.unwrap();

        let session = f.registry.get(RoomId::new(1)).unwrap();
        assert_eq!(session.state().await, SessionState::Playing);
        assert_eq!(session.queue_len().await, 1);

        let transport = f.gateway.transport_for(RoomId::new(1)).unwrap();
        assert_eq!(transport.played().len(), 1);
    }

    #[tokio::test]
    async fn test_say_synthesis_failure_leaves_queue_untouched() {
        let f = fixture(sample_voices()).await;
        f.router.say(say(1, Some(10), "first")).await.unwrap();

        f.provider.set_fail_synthesize(true);
        let result = f.router.say(say(1, Some(10), "second")).await;
        assert!(matches!(result, Err(CommandError::Synthesis(_))));

        let session = f.registry.get(RoomId::new(1)).unwrap();
        assert_eq!(session.queue_len().await, 0);
    }

    #[tokio::test]
    async fn test_say_with_empty_catalog_reports_no_voices() {
        let f = fixture(Vec::new()).await;

        let result = f.router.say(say(1, Some(10), "hello")).await;
        assert!(matches!(result, Err(CommandError::NoVoicesAvailable)));
        assert_eq!(f.provider.synthesize_calls(), 0);
    }

    #[tokio::test]
    async fn test_set_voice_unmatched_leaves_preference_unchanged() {
        let f = fixture(sample_voices()).await;
        let user = UserId::new("alice");

        let result = f
            .router
            .set_voice(SetVoiceCommand {
                user: user.clone(),
                name: "Nonexistent".to_string(),
            })
            .await;

        match result {
            Err(CommandError::VoiceNotFound { name }) => {
                assert_eq!(name, "Nonexistent");
            }
            other => panic!("expected VoiceNotFound, got {:?}", other),
        }
        assert!(f.catalog.preference(&user).is_none());
    }

    #[tokio::test]
    async fn test_set_voice_matches_case_insensitively() {
        let f = fixture(sample_voices()).await;
        let user = UserId::new("alice");

        let reply = f
            .router
            .set_voice(SetVoiceCommand {
                user: user.clone(),
                name: "marcus".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(reply.to_string(), "Voice set to Marcus");
        assert_eq!(f.catalog.preference(&user).unwrap().id().as_str(), "v-2");
    }

    #[tokio::test]
    async fn test_volume_without_session_reports_not_connected() {
        let f = fixture(sample_voices()).await;

        let result = f
            .router
            .set_volume(SetVolumeCommand {
                room: RoomId::new(1),
                percent: 50,
            })
            .await;
        assert!(matches!(result, Err(CommandError::NotConnected)));
    }

    #[tokio::test]
    async fn test_volume_applies_gain_to_transport() {
        let f = fixture(sample_voices()).await;
        f.router.say(say(1, Some(10), "hello")).await.unwrap();

        let reply = f
            .router
            .set_volume(SetVolumeCommand {
                room: RoomId::new(1),
                percent: 150,
            })
            .await
            .unwrap();
        assert_eq!(reply.to_string(), "Changed volume to 150%");

        let transport = f.gateway.transport_for(RoomId::new(1)).unwrap();
        assert!((transport.current_gain() - 1.5).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_stop_without_session_reports_not_connected() {
        let f = fixture(sample_voices()).await;

        let result = f.router.stop(StopCommand { room: RoomId::new(1) }).await;
        assert!(matches!(result, Err(CommandError::NotConnected)));
    }

    #[tokio::test]
    async fn test_stop_drops_queued_unit_but_finishes_in_flight() {
        let f = fixture(sample_voices()).await;

        f.router.say(say(1, Some(10), "A")).await.unwrap();
        f.router.say(say(1, Some(10), "B")).await.unwrap();

        let transport = f.gateway.transport_for(RoomId::new(1)).unwrap();
        let reply = f.router.stop(StopCommand { room: RoomId::new(1) }).await.unwrap();
        assert_eq!(reply, Reply::Disconnected);

        // A 的完成信号照常到达，B 永远不会播出
        transport.finish_next();
        for _ in 0..200 {
            if f.registry.get(RoomId::new(1)).is_none() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(f.registry.get(RoomId::new(1)).is_none());
        assert_eq!(transport.played().len(), 1);
        assert_eq!(transport.disconnect_count(), 1);
    }

    #[tokio::test]
    async fn test_rooms_play_independently() {
        let f = fixture(sample_voices()).await;

        f.router.say(say(1, Some(10), "one")).await.unwrap();
        f.router.say(say(2, Some(20), "two")).await.unwrap();

        let one = f.gateway.transport_for(RoomId::new(1)).unwrap();
        let two = f.gateway.transport_for(RoomId::new(2)).unwrap();
        assert_eq!(one.played().len(), 1);
        assert_eq!(two.played().len(), 1);
    }
}
