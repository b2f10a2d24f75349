//! Voice Transport 适配器
//!
//! - ws_transport: 把音频播出到频道 WebSocket 监听者的真实实现
//! - fake_transport: 状态机测试用的脚本化实现

mod fake_transport;
mod ws_transport;

pub use fake_transport::{FakeVoiceGateway, FakeVoiceTransport};
pub use ws_transport::{PlaybackTiming, WsVoiceGateway, WsVoiceTransport};
