//! Channel Listener Handler - 频道监听 WebSocket
//!
//! 监听端连接到一个语音频道后，按播出顺序收到每段 utterance：
//! 先是一条 JSON 元数据帧（房间、增益、时长、字节数），随后是
//! 一条二进制音频帧。房间断开时收到 disconnected 事件。

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::domain::ids::ChannelId;
use crate::infrastructure::events::AudioFrame;
use crate::infrastructure::http::state::AppState;

/// 发给监听端的元数据帧
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum ListenerEvent {
    Utterance {
        room: u64,
        unit_id: Uuid,
        gain: f32,
        duration_ms: u64,
        size: usize,
    },
    Disconnected {
        room: u64,
    },
}

/// 频道监听 WebSocket 入口
pub async fn channel_listener(
    ws: WebSocketUpgrade,
    Path(channel_id): Path<u64>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_listener_socket(socket, ChannelId::new(channel_id), state))
}

async fn handle_listener_socket(socket: WebSocket, channel: ChannelId, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut frames = state.hub.subscribe(channel);

    tracing::info!(channel = %channel, "Listener connected");

    // 帧转发任务
    let forward_task = tokio::spawn(async move {
        loop {
            let frame = match frames.recv().await {
                Ok(frame) => frame,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        channel = %channel,
                        skipped = skipped,
                        "Listener lagged, frames dropped"
                    );
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let result = match frame {
                AudioFrame::Utterance {
                    room,
                    unit_id,
                    gain,
                    duration_ms,
                    audio,
                } => {
                    let meta = ListenerEvent::Utterance {
                        room: room.as_u64(),
                        unit_id,
                        gain,
                        duration_ms,
                        size: audio.len(),
                    };
                    match serde_json::to_string(&meta) {
                        Ok(json) => {
                            if sender.send(Message::Text(json)).await.is_err() {
                                break;
                            }
                            sender.send(Message::Binary(audio.to_vec())).await
                        }
                        Err(error) => {
                            tracing::error!(error = %error, "Failed to serialize listener event");
                            continue;
                        }
                    }
                }
                AudioFrame::Disconnected { room } => {
                    let meta = ListenerEvent::Disconnected {
                        room: room.as_u64(),
                    };
                    match serde_json::to_string(&meta) {
                        Ok(json) => sender.send(Message::Text(json)).await,
                        Err(error) => {
                            tracing::error!(error = %error, "Failed to serialize listener event");
                            continue;
                        }
                    }
                }
            };

            if let Err(error) = result {
                tracing::debug!(channel = %channel, error = %error, "Failed to send listener frame");
                break;
            }
        }
    });

    // 接收客户端消息（心跳与关闭）
    let receive_task = tokio::spawn(async move {
        while let Some(message) = receiver.next().await {
            match message {
                Ok(Message::Close(_)) => {
                    tracing::info!(channel = %channel, "Listener closed connection");
                    break;
                }
                Ok(_) => {
                    // Ping 由 axum 自动回 Pong；其余消息忽略
                }
                Err(error) => {
                    tracing::debug!(channel = %channel, error = %error, "Listener socket error");
                    break;
                }
            }
        }
    });

    // 任一任务结束即收尾
    tokio::select! {
        _ = forward_task => {}
        _ = receive_task => {}
    }

    tracing::info!(channel = %channel, "Listener disconnected");
}
