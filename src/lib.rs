//! Sayer - 语音频道 TTS 播报
//!
//! 架构设计: Hexagonal Architecture (Ports & Adapters)
//!
//! 领域层 (domain/):
//! - ids: 平台标识（房间 / 频道 / 用户）
//! - voice: Voice Context，供应商音色快照
//!
//! 应用层 (application/):
//! - Ports: 端口定义（TtsProvider, VoiceTransport）
//! - catalog: 音色缓存与用户偏好
//! - synthesizer: 文本转语音
//! - playback: 播放会话状态机（每房间一条 FIFO 队列，严格不重叠）
//! - commands: say / voice / volume / stop 命令路由
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: ElevenLabs 客户端, WebSocket 语音传输
//! - HTTP: RESTful 命令入口 + 频道监听 WebSocket
//! - Tasks: 音色缓存周期刷新
//! - Events: 频道音频帧广播

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
