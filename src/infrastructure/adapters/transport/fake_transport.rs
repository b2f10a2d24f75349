//! Fake Voice Transport - 状态机测试用的脚本化 transport
//!
//! 记录 connect / move / disconnect / play 调用；完成信号由测试
//! 手动触发（finish_next），用于精确驱动队列推进并断言"任意时刻
//! 至多一个单元在播"。

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::application::ports::{
    AudioUnit, PlaybackFinished, TransportError, VoiceGatewayPort, VoiceTransportPort,
};
use crate::domain::ids::{ChannelId, RoomId};

struct FakeShared {
    channel: Option<ChannelId>,
    gain: f32,
    /// 一次性开关：下一次 play 调用失败
    fail_next_play: bool,
    /// 成功启动的单元，按播出顺序
    played: Vec<Uuid>,
    /// 尚未触发完成信号的单元
    pending: VecDeque<oneshot::Sender<PlaybackFinished>>,
    /// 同时处于播出中的单元数峰值
    max_concurrent: usize,
}

/// 脚本化 transport
pub struct FakeVoiceTransport {
    room: RoomId,
    shared: Mutex<FakeShared>,
    connects: AtomicUsize,
    moves: AtomicUsize,
    disconnects: AtomicUsize,
}

impl FakeVoiceTransport {
    pub fn new(room: RoomId) -> Arc<Self> {
        Arc::new(Self {
            room,
            shared: Mutex::new(FakeShared {
                channel: None,
                gain: 1.0,
                fail_next_play: false,
                played: Vec::new(),
                pending: VecDeque::new(),
                max_concurrent: 0,
            }),
            connects: AtomicUsize::new(0),
            moves: AtomicUsize::new(0),
            disconnects: AtomicUsize::new(0),
        })
    }

    pub fn room(&self) -> RoomId {
        self.room
    }

    fn shared(&self) -> std::sync::MutexGuard<'_, FakeShared> {
        self.shared.lock().expect("fake transport lock poisoned")
    }

    /// 触发最早一个未完成单元的完成信号
    pub fn finish_next(&self) -> bool {
        match self.shared().pending.pop_front() {
            Some(sender) => sender.send(PlaybackFinished::ok()).is_ok(),
            None => false,
        }
    }

    /// 以播放器错误触发最早一个未完成单元的完成信号
    pub fn finish_next_with_error(&self, error: &str) -> bool {
        match self.shared().pending.pop_front() {
            Some(sender) => sender.send(PlaybackFinished::failed(error)).is_ok(),
            None => false,
        }
    }

    /// 让下一次 play 调用失败（一次性）
    pub fn fail_next_play(&self) {
        self.shared().fail_next_play = true;
    }

    /// 成功启动的单元 id，按播出顺序
    pub fn played(&self) -> Vec<Uuid> {
        self.shared().played.clone()
    }

    /// 尚未触发完成信号的单元数
    pub fn pending_count(&self) -> usize {
        self.shared().pending.len()
    }

    /// 同时处于播出中的单元数峰值
    pub fn max_concurrent(&self) -> usize {
        self.shared().max_concurrent
    }

    pub fn current_gain(&self) -> f32 {
        self.shared().gain
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn move_count(&self) -> usize {
        self.moves.load(Ordering::SeqCst)
    }

    pub fn disconnect_count(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VoiceTransportPort for FakeVoiceTransport {
    async fn connect(&self, channel: ChannelId) -> Result<(), TransportError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.shared().channel = Some(channel);
        Ok(())
    }

    async fn move_to(&self, channel: ChannelId) -> Result<(), TransportError> {
        let mut shared = self.shared();
        if shared.channel.is_none() {
            return Err(TransportError::NotConnected);
        }
        self.moves.fetch_add(1, Ordering::SeqCst);
        shared.channel = Some(channel);
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        self.shared().channel = None;
        Ok(())
    }

    fn play(&self, unit: &AudioUnit) -> Result<oneshot::Receiver<PlaybackFinished>, TransportError> {
        let mut shared = self.shared();
        if shared.channel.is_none() {
            return Err(TransportError::NotConnected);
        }
        if shared.fail_next_play {
            shared.fail_next_play = false;
            return Err(TransportError::Failed("scripted play failure".to_string()));
        }

        let (finished_tx, finished_rx) = oneshot::channel();
        shared.played.push(unit.id);
        shared.pending.push_back(finished_tx);
        shared.max_concurrent = shared.max_concurrent.max(shared.pending.len());
        Ok(finished_rx)
    }

    fn set_volume(&self, gain: f32) -> Result<(), TransportError> {
        let mut shared = self.shared();
        if shared.channel.is_none() {
            return Err(TransportError::NotConnected);
        }
        shared.gain = gain;
        Ok(())
    }

    fn current_channel(&self) -> Option<ChannelId> {
        self.shared().channel
    }
}

/// 记录所有已创建 transport 的 gateway
pub struct FakeVoiceGateway {
    opened: Mutex<Vec<Arc<FakeVoiceTransport>>>,
}

impl FakeVoiceGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            opened: Mutex::new(Vec::new()),
        })
    }

    /// 所有创建过的 transport，按创建顺序
    pub fn opened(&self) -> Vec<Arc<FakeVoiceTransport>> {
        self.opened.lock().expect("fake gateway lock poisoned").clone()
    }

    /// 房间最近创建的 transport
    pub fn transport_for(&self, room: RoomId) -> Option<Arc<FakeVoiceTransport>> {
        self.opened()
            .into_iter()
            .rev()
            .find(|transport| transport.room() == room)
    }
}

impl VoiceGatewayPort for FakeVoiceGateway {
    fn open(&self, room: RoomId) -> Arc<dyn VoiceTransportPort> {
        let transport = FakeVoiceTransport::new(room);
        self.opened
            .lock()
            .expect("fake gateway lock poisoned")
            .push(transport.clone());
        transport
    }
}
