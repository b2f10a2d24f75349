//! Playback - 播放队列与会话状态机
//!
//! - session: 每房间一个的播放会话（Idle / Playing / Draining / Closed）
//! - registry: 房间到会话的所有权映射

mod registry;
mod session;

pub use registry::SessionRegistry;
pub use session::{PlaybackSession, SessionError, SessionState};
