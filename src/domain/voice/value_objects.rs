//! Voice Context - Value Objects

/// 音色唯一标识
///
/// 由 TTS 供应商分配的不透明字符串；身份比较只看它。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoiceId(String);

impl VoiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 音色类别
///
/// 供应商把音色分为克隆音色与自带库存音色；未知类别原样保留，
/// 不在解析时丢失信息。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceCategory {
    /// 用户克隆的音色
    Cloned,
    /// 供应商库存音色
    Premade,
    /// 其它类别（原始字符串保留）
    Other(String),
}

impl VoiceCategory {
    /// 解析供应商返回的类别字符串（大小写不敏感）
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "cloned" => Self::Cloned,
            "premade" => Self::Premade,
            _ => Self::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Cloned => "cloned",
            Self::Premade => "premade",
            Self::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for VoiceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_known() {
        assert_eq!(VoiceCategory::parse("cloned"), VoiceCategory::Cloned);
        assert_eq!(VoiceCategory::parse("Premade"), VoiceCategory::Premade);
    }

    #[test]
    fn test_category_parse_preserves_unknown() {
        let category = VoiceCategory::parse("professional");
        assert_eq!(category, VoiceCategory::Other("professional".to_string()));
        assert_eq!(category.as_str(), "professional");
    }
}
