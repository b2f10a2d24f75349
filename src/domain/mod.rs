//! 领域层
//!
//! - ids: 平台标识（房间 / 频道 / 用户）
//! - voice: Voice Context，音色快照与类别

pub mod ids;
pub mod voice;
