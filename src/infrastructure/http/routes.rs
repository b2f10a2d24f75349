//! HTTP Routes
//!
//! API 路由定义
//!
//! API Endpoints:
//! - /api/ping                 GET   健康检查
//! - /api/command/say          POST  播报一段文本（入队即确认）
//! - /api/command/voice        POST  设置用户音色偏好
//! - /api/command/volume       POST  调整房间音量
//! - /api/command/stop         POST  断开房间的语音连接
//! - /api/voice/list           GET   音色列表（支持类别 / 名称过滤）
//! - /ws/channels/{channel_id} WS    频道监听端（接收音频帧）

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/channels/:channel_id", get(handlers::channel_listener))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/command", command_routes())
        .nest("/voice", voice_routes())
}

/// Command 路由
fn command_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/say", post(handlers::say))
        .route("/voice", post(handlers::set_voice))
        .route("/volume", post(handlers::set_volume))
        .route("/stop", post(handlers::stop))
}

/// Voice 路由
fn voice_routes() -> Router<Arc<AppState>> {
    Router::new().route("/list", get(handlers::list_voices))
}
