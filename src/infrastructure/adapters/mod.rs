//! 基础设施适配器
//!
//! 端口的具体实现：TTS 供应商客户端与语音传输

pub mod transport;
pub mod tts;

pub use transport::{FakeVoiceGateway, FakeVoiceTransport, PlaybackTiming, WsVoiceGateway};
pub use tts::{ElevenLabsClient, ElevenLabsConfig, FakeTtsClient, VoiceSettings};
