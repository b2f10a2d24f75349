//! TTS Provider 适配器
//!
//! - elevenlabs_client: 真实的 ElevenLabs HTTP 客户端
//! - fake_tts_client: 测试与离线运行用的固定音频客户端

mod elevenlabs_client;
mod fake_tts_client;

pub use elevenlabs_client::{ElevenLabsClient, ElevenLabsConfig, VoiceSettings};
pub use fake_tts_client::FakeTtsClient;
