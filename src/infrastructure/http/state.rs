//! Application State

use std::sync::Arc;

use crate::application::{CommandRouter, VoiceCatalog};
use crate::domain::ids::RoomId;
use crate::infrastructure::events::AudioHub;

/// 应用状态
///
/// 启动时显式装配的进程级上下文，随 Router 注入每个 handler；
/// 不存在任何全局单例。
pub struct AppState {
    pub router: CommandRouter,
    pub catalog: Arc<VoiceCatalog>,
    pub hub: Arc<AudioHub>,
    /// 限定服务的房间；Some 时其它房间的命令在边界被拒绝
    pub room_scope: Option<RoomId>,
}

impl AppState {
    pub fn new(
        router: CommandRouter,
        catalog: Arc<VoiceCatalog>,
        hub: Arc<AudioHub>,
        room_scope: Option<RoomId>,
    ) -> Self {
        Self {
            router,
            catalog,
            hub,
            room_scope,
        }
    }
}
