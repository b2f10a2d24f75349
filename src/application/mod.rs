//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TtsProvider、VoiceTransport）
//! - catalog: 音色缓存与用户偏好
//! - synthesizer: 文本转语音
//! - playback: 播放会话状态机与注册表
//! - commands: 命令路由
//! - error: 命令层错误定义

pub mod catalog;
pub mod commands;
pub mod error;
pub mod playback;
pub mod ports;
pub mod synthesizer;

// Re-exports
pub use catalog::{CatalogError, VoiceCatalog};
pub use commands::{
    CommandRouter, Reply, SayCommand, SetVoiceCommand, SetVolumeCommand, StopCommand,
};
pub use error::CommandError;
pub use playback::{PlaybackSession, SessionError, SessionRegistry, SessionState};
pub use ports::{
    AudioUnit, PlaybackFinished, ProviderError, SynthesisRequest, TransportError,
    TtsProviderPort, VoiceGatewayPort, VoiceTransportPort,
};
pub use synthesizer::{SynthesisError, Synthesizer};
