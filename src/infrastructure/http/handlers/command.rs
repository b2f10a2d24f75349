//! Command HTTP Handlers
//!
//! 平台无关的命令入口。每个请求恰好得到一条确认消息或一条错误
//! 消息；业务错误以 errno + error 返回（见 http/error.rs）。

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{SayCommand, SetVoiceCommand, SetVolumeCommand, StopCommand};
use crate::domain::ids::{ChannelId, RoomId, UserId};
use crate::infrastructure::http::dto::{
    ApiResponse, CommandAck, SayRequest, SetVoiceRequest, SetVolumeRequest, StopRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 房间作用域检查
///
/// 配置了 scope.room 的实例只服务那一个房间。
fn check_scope(state: &AppState, room: RoomId) -> Result<(), ApiError> {
    match state.room_scope {
        Some(scope) if scope != room => Err(ApiError::BadRequest(format!(
            "Room {} is not served by this instance",
            room
        ))),
        _ => Ok(()),
    }
}

/// 播报一段文本
pub async fn say(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SayRequest>,
) -> Result<Json<ApiResponse<CommandAck>>, ApiError> {
    let room = RoomId::new(request.room);
    check_scope(&state, room)?;

    let reply = state
        .router
        .say(SayCommand {
            user: UserId::new(request.user),
            room,
            channel: request.channel.map(ChannelId::new),
            text: request.text,
        })
        .await?;

    Ok(Json(ApiResponse::success(CommandAck {
        message: reply.to_string(),
    })))
}

/// 设置用户音色偏好
pub async fn set_voice(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetVoiceRequest>,
) -> Result<Json<ApiResponse<CommandAck>>, ApiError> {
    let reply = state
        .router
        .set_voice(SetVoiceCommand {
            user: UserId::new(request.user),
            name: request.name,
        })
        .await?;

    Ok(Json(ApiResponse::success(CommandAck {
        message: reply.to_string(),
    })))
}

/// 调整房间音量
pub async fn set_volume(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetVolumeRequest>,
) -> Result<Json<ApiResponse<CommandAck>>, ApiError> {
    let room = RoomId::new(request.room);
    check_scope(&state, room)?;

    let reply = state
        .router
        .set_volume(SetVolumeCommand {
            room,
            percent: request.percent,
        })
        .await?;

    Ok(Json(ApiResponse::success(CommandAck {
        message: reply.to_string(),
    })))
}

/// 断开房间的语音连接
pub async fn stop(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StopRequest>,
) -> Result<Json<ApiResponse<CommandAck>>, ApiError> {
    let room = RoomId::new(request.room);
    check_scope(&state, room)?;

    let reply = state.router.stop(StopCommand { room }).await?;

    Ok(Json(ApiResponse::success(CommandAck {
        message: reply.to_string(),
    })))
}
