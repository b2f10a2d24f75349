//! 事件与帧广播
//!
//! - audio_hub: 频道音频帧的 broadcast 发布

mod audio_hub;

pub use audio_hub::{AudioFrame, AudioHub};
