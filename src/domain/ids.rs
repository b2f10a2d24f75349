//! 平台标识
//!
//! 房间 / 频道使用平台侧的数值 snowflake，用户使用平台侧的
//! 全局用户名。全部为不可变值对象。

use serde::{Deserialize, Serialize};

/// 房间标识
///
/// 一个房间是一个语音通话作用域，拥有自己独立的播放队列。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(u64);

impl RoomId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 语音频道标识
///
/// 房间内的一个具体语音频道；transport 连接的目标。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(u64);

impl ChannelId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 用户标识
///
/// 平台侧的全局用户名；音色偏好按它建立映射。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_roundtrip() {
        let room = RoomId::new(42);
        assert_eq!(room.as_u64(), 42);
        assert_eq!(room.to_string(), "42");
    }

    #[test]
    fn test_user_id_as_str() {
        let user = UserId::new("alice");
        assert_eq!(user.as_str(), "alice");
    }
}
