//! 基础设施层
//!
//! - adapters: TTS 供应商客户端与语音传输
//! - events: 频道音频帧广播
//! - http: RESTful 命令入口 + 监听 WebSocket
//! - tasks: 后台任务（音色缓存刷新）

pub mod adapters;
pub mod events;
pub mod http;
pub mod tasks;
