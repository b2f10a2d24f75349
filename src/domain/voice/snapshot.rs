//! Voice Context - 音色快照

use super::{VoiceCategory, VoiceId};

/// 音色快照
///
/// 不变量:
/// - 来自供应商的一次完整刷新，创建后不可变
/// - 身份由 id 决定，name 仅用于展示与查找
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    id: VoiceId,
    name: String,
    category: VoiceCategory,
}

impl Voice {
    pub fn new(id: VoiceId, name: impl Into<String>, category: VoiceCategory) -> Self {
        Self {
            id,
            name: name.into(),
            category,
        }
    }

    pub fn id(&self) -> &VoiceId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &VoiceCategory {
        &self.category
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_identity() {
        let voice = Voice::new(VoiceId::new("v-1"), "Rachel", VoiceCategory::Premade);
        assert_eq!(voice.id().as_str(), "v-1");
        assert_eq!(voice.name(), "Rachel");
        assert_eq!(voice.category(), &VoiceCategory::Premade);
    }
}
