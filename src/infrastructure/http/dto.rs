//! Data Transfer Objects

use serde::{Deserialize, Serialize};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Command DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SayRequest {
    pub user: String,
    pub room: u64,
    /// 用户当前所在的语音频道；缺省表示不在语音频道中
    pub channel: Option<u64>,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SetVoiceRequest {
    pub user: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SetVolumeRequest {
    pub room: u64,
    pub percent: u16,
}

#[derive(Debug, Deserialize)]
pub struct StopRequest {
    pub room: u64,
}

/// 命令确认；message 即回复给用户的那一条消息
#[derive(Debug, Serialize)]
pub struct CommandAck {
    pub message: String,
}

// ============================================================================
// Voice DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct VoiceListQuery {
    /// 按类别过滤（如 cloned）
    pub category: Option<String>,
    /// 按名称子串过滤，驱动交互式补全
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VoiceResponse {
    pub id: String,
    pub name: String,
    pub category: String,
}
