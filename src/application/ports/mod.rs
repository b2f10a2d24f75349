//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod tts_provider;
mod voice_transport;

pub use tts_provider::{ProviderError, SynthesisRequest, TtsProviderPort};
pub use voice_transport::{
    AudioUnit, PlaybackFinished, TransportError, VoiceGatewayPort, VoiceTransportPort,
};
