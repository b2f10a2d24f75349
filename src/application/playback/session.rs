//! Playback Session - 播放会话状态机
//!
//! 每个房间一个实例，串行化并发的播放请求：队列与状态位于同一
//! 把锁内（房间级临界区），enqueue、完成信号、connect / move /
//! disconnect 不会交错到一半。transport 的完成信号是队列推进的
//! 唯一驱动。
//!
//! 状态转移:
//! - Idle --enqueue--> Playing（立即开播队头）
//! - Playing --finished--> Playing（队列非空，弹出新队头）或 Idle
//! - Playing --disconnect--> Draining（在播单元放完，排队单元全丢）
//! - Idle --disconnect--> Closed
//! - Draining --finished--> Closed（释放 transport，从注册表移除）

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use thiserror::Error;
use tokio::sync::Mutex;

use crate::application::playback::SessionRegistry;
use crate::application::ports::{
    AudioUnit, PlaybackFinished, TransportError, VoiceTransportPort,
};
use crate::domain::ids::{ChannelId, RoomId};

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// 无排队也无播放
    Idle,
    /// 恰有一个单元正在播出
    Playing,
    /// 已请求断开；在播单元允许放完，队列已丢弃
    Draining,
    /// transport 已释放，会话已从注册表移除
    Closed,
}

/// Session 错误
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session closed")]
    Closed,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

struct SessionInner {
    state: SessionState,
    queue: VecDeque<AudioUnit>,
}

/// 播放会话
pub struct PlaybackSession {
    room: RoomId,
    transport: Arc<dyn VoiceTransportPort>,
    inner: Mutex<SessionInner>,
    /// Closed 的无锁快照，供注册表不取锁判活
    closed: AtomicBool,
    registry: Weak<SessionRegistry>,
}

impl PlaybackSession {
    pub(crate) fn new(
        room: RoomId,
        transport: Arc<dyn VoiceTransportPort>,
        registry: Weak<SessionRegistry>,
    ) -> Arc<Self> {
        Arc::new(Self {
            room,
            transport,
            inner: Mutex::new(SessionInner {
                state: SessionState::Idle,
                queue: VecDeque::new(),
            }),
            closed: AtomicBool::new(false),
            registry,
        })
    }

    pub fn room(&self) -> RoomId {
        self.room
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state
    }

    /// 排队中（不含在播）的单元数
    pub async fn queue_len(&self) -> usize {
        self.inner.lock().await.queue.len()
    }

    /// 确保 transport 连接到指定频道
    ///
    /// 已在该频道则为空操作；已连接到其它频道则仅切换频道，
    /// 在播单元不受影响。持有会话锁跨越握手，同一房间不会有
    /// 两个 connect / move 并发进行。
    pub async fn ensure_channel(&self, channel: ChannelId) -> Result<(), SessionError> {
        let inner = self.inner.lock().await;
        if inner.state == SessionState::Closed {
            return Err(SessionError::Closed);
        }

        match self.transport.current_channel() {
            Some(current) if current == channel => Ok(()),
            Some(current) => {
                tracing::info!(
                    room = %self.room,
                    from = %current,
                    to = %channel,
                    "Moving voice channel"
                );
                self.transport.move_to(channel).await?;
                Ok(())
            }
            None => {
                tracing::info!(room = %self.room, channel = %channel, "Connecting voice channel");
                self.transport.connect(channel).await?;
                Ok(())
            }
        }
    }

    /// 入队一个单元；Idle 时立即开播
    ///
    /// 严格 FIFO：Playing 期间到达的单元永远排在在播单元之后，
    /// 不抢占、不重排。
    pub async fn enqueue(self: &Arc<Self>, unit: AudioUnit) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;
        match inner.state {
            SessionState::Closed | SessionState::Draining => Err(SessionError::Closed),
            SessionState::Playing => {
                tracing::debug!(
                    room = %self.room,
                    unit_id = %unit.id,
                    queued = inner.queue.len() + 1,
                    "Unit queued behind current playback"
                );
                inner.queue.push_back(unit);
                Ok(())
            }
            SessionState::Idle => {
                self.start_unit(&mut inner, unit)?;
                Ok(())
            }
        }
    }

    /// 请求断开
    ///
    /// Playing 时进入 Draining：在播单元放完后才释放连接，但排队
    /// 中尚未开播的单元在此刻全部丢弃。Idle 时直接 Closed。返回
    /// 本次调用后的状态。
    pub async fn request_disconnect(&self) -> SessionState {
        let mut inner = self.inner.lock().await;
        match inner.state {
            SessionState::Idle => {
                self.close_locked(&mut inner).await;
                SessionState::Closed
            }
            SessionState::Playing => {
                let dropped = inner.queue.len();
                inner.queue.clear();
                inner.state = SessionState::Draining;
                tracing::info!(
                    room = %self.room,
                    dropped = dropped,
                    "Disconnect requested, letting in-flight unit finish"
                );
                SessionState::Draining
            }
            SessionState::Draining => SessionState::Draining,
            SessionState::Closed => SessionState::Closed,
        }
    }

    /// 调整输出增益，立即作用于 transport
    pub async fn set_volume(&self, gain: f32) -> Result<(), SessionError> {
        let inner = self.inner.lock().await;
        if inner.state == SessionState::Closed {
            return Err(SessionError::Closed);
        }
        self.transport.set_volume(gain)?;
        tracing::debug!(room = %self.room, gain = gain, "Volume changed");
        Ok(())
    }

    /// 在锁内启动一个单元的播出并挂上完成信号监听
    fn start_unit(
        self: &Arc<Self>,
        inner: &mut SessionInner,
        unit: AudioUnit,
    ) -> Result<(), SessionError> {
        let finished_rx = self.transport.play(&unit)?;
        inner.state = SessionState::Playing;
        tracing::info!(
            room = %self.room,
            unit_id = %unit.id,
            requested_by = %unit.requested_by,
            "Playback started"
        );

        let session = Arc::clone(self);
        tokio::spawn(async move {
            let finished = finished_rx
                .await
                .unwrap_or_else(|_| PlaybackFinished::failed("transport dropped finished signal"));
            session.on_finished(finished).await;
        });
        Ok(())
    }

    /// 完成信号入口，每个单元恰好触发一次
    ///
    /// 播放器错误记日志后继续；队列非空则弹出新队头接着播，
    /// 否则回到 Idle；Draining 则在此完成收尾。
    pub(crate) async fn on_finished(self: &Arc<Self>, finished: PlaybackFinished) {
        let mut inner = self.inner.lock().await;
        if let Some(error) = &finished.error {
            tracing::warn!(room = %self.room, error = %error, "Player error, continuing");
        }

        match inner.state {
            SessionState::Playing => {
                while let Some(next) = inner.queue.pop_front() {
                    let unit_id = next.id;
                    match self.start_unit(&mut inner, next) {
                        Ok(()) => return,
                        Err(error) => {
                            tracing::error!(
                                room = %self.room,
                                unit_id = %unit_id,
                                error = %error,
                                "Failed to start next unit, skipping"
                            );
                        }
                    }
                }
                inner.state = SessionState::Idle;
                tracing::debug!(room = %self.room, "Queue drained, session idle");
            }
            SessionState::Draining => {
                self.close_locked(&mut inner).await;
            }
            SessionState::Idle | SessionState::Closed => {
                tracing::debug!(
                    room = %self.room,
                    state = ?inner.state,
                    "Spurious finished signal ignored"
                );
            }
        }
    }

    /// 在锁内收尾：置 Closed、释放 transport、从注册表移除
    async fn close_locked(&self, inner: &mut SessionInner) {
        inner.queue.clear();
        inner.state = SessionState::Closed;
        self.closed.store(true, Ordering::Release);

        if let Err(error) = self.transport.disconnect().await {
            tracing::warn!(room = %self.room, error = %error, "Transport disconnect failed");
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.remove_if_same(self.room, self);
        }
        tracing::info!(room = %self.room, "Session closed");
    }
}
