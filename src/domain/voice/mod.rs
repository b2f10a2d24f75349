//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - 供应商音色的不可变快照
//! - 音色标识与类别

mod snapshot;
mod value_objects;

pub use snapshot::Voice;
pub use value_objects::{VoiceCategory, VoiceId};
