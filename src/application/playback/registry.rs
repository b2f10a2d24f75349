//! Session Registry - 房间到会话的所有权映射
//!
//! 每个房间任意时刻至多一个存活会话。get_or_create 是唯一的
//! 实例化路径，对同一房间的并发调用原子（entry 锁定分片，不会
//! 双重创建）；移除按 Arc 身份比较，迟到的关闭不会误删后继会话。

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::application::playback::PlaybackSession;
use crate::application::ports::VoiceTransportPort;
use crate::domain::ids::RoomId;

/// 会话注册表
pub struct SessionRegistry {
    sessions: DashMap<RoomId, Arc<PlaybackSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 获取房间的存活会话；已 Closed 的不算
    pub fn get(&self, room: RoomId) -> Option<Arc<PlaybackSession>> {
        self.sessions
            .get(&room)
            .map(|entry| entry.value().clone())
            .filter(|session| !session.is_closed())
    }

    /// 获取或创建房间会话
    ///
    /// make_transport 仅在确实需要创建时调用；残留的 Closed 会话
    /// 在这里被替换。
    pub fn get_or_create(
        self: &Arc<Self>,
        room: RoomId,
        make_transport: impl FnOnce() -> Arc<dyn VoiceTransportPort>,
    ) -> Arc<PlaybackSession> {
        match self.sessions.entry(room) {
            Entry::Occupied(mut entry) => {
                if entry.get().is_closed() {
                    let session =
                        PlaybackSession::new(room, make_transport(), Arc::downgrade(self));
                    entry.insert(session.clone());
                    tracing::info!(room = %room, "Closed session replaced");
                    session
                } else {
                    entry.get().clone()
                }
            }
            Entry::Vacant(entry) => {
                let session = PlaybackSession::new(room, make_transport(), Arc::downgrade(self));
                entry.insert(session.clone());
                tracing::info!(room = %room, "Session created");
                session
            }
        }
    }

    /// 仅当登记的还是同一个实例时移除
    ///
    /// 会话进入 Closed 时自行调用；身份比较防止迟到的关闭移除
    /// 同房间的后继会话。
    pub(crate) fn remove_if_same(&self, room: RoomId, session: &PlaybackSession) {
        self.sessions.remove_if(&room, |_, stored| {
            std::ptr::eq(Arc::as_ptr(stored), session)
        });
    }

    /// 当前登记的会话数（含尚未被替换的 Closed 残留）
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::VoiceGatewayPort;
    use crate::infrastructure::adapters::transport::FakeVoiceGateway;

    #[tokio::test]
    async fn test_get_or_create_returns_same_instance() {
        let registry = SessionRegistry::new().arc();
        let gateway = FakeVoiceGateway::new();
        let room = RoomId::new(1);

        let first = registry.get_or_create(room, || gateway.open(room));
        let second = registry.get_or_create(room, || gateway.open(room));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(gateway.opened().len(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_rooms_are_independent() {
        let registry = SessionRegistry::new().arc();
        let gateway = FakeVoiceGateway::new();

        let one = registry.get_or_create(RoomId::new(1), || gateway.open(RoomId::new(1)));
        let two = registry.get_or_create(RoomId::new(2), || gateway.open(RoomId::new(2)));

        assert!(!Arc::ptr_eq(&one, &two));
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_closed_session_is_replaced() {
        let registry = SessionRegistry::new().arc();
        let gateway = FakeVoiceGateway::new();
        let room = RoomId::new(1);

        let first = registry.get_or_create(room, || gateway.open(room));
        first.request_disconnect().await;
        assert!(registry.get(room).is_none());

        let second = registry.get_or_create(room, || gateway.open(room));
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(!second.is_closed());
    }

    #[tokio::test]
    async fn test_late_close_does_not_evict_successor() {
        let registry = SessionRegistry::new().arc();
        let gateway = FakeVoiceGateway::new();
        let room = RoomId::new(1);

        let first = registry.get_or_create(room, || gateway.open(room));
        first.request_disconnect().await;
        let second = registry.get_or_create(room, || gateway.open(room));

        // 迟到的身份比较移除不命中后继会话
        registry.remove_if_same(room, &first);
        assert!(registry.get(room).is_some());
        assert!(Arc::ptr_eq(&registry.get(room).unwrap(), &second));
    }
}
