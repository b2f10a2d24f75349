//! Voice Catalog - 音色缓存与用户偏好
//!
//! 缓存是供应商音色列表的最近一次完整快照，由后台任务周期性
//! 整体替换（copy-on-write）；读者拿到的永远是一份完整列表，
//! 不存在半更新状态。刷新失败保留上一份快照继续服务，可用性
//! 优先于新鲜度。
//!
//! 用户偏好在显式设置后不过期；没有偏好时从缓存均匀随机回退。

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::application::ports::{ProviderError, TtsProviderPort};
use crate::domain::ids::UserId;
use crate::domain::voice::{Voice, VoiceCategory};

/// Catalog 错误
#[derive(Debug, Error)]
pub enum CatalogError {
    /// 刷新失败；上一份快照继续生效
    #[error("Voice list refresh failed: {0}")]
    Unavailable(#[from] ProviderError),

    /// 缓存为空，没有任何可用音色
    #[error("No voices available")]
    Empty,
}

/// 音色缓存
pub struct VoiceCatalog {
    provider: Arc<dyn TtsProviderPort>,
    /// 最近一次完整刷新的快照，只做整体替换
    cache: RwLock<Arc<Vec<Voice>>>,
    /// 用户音色偏好
    preferences: DashMap<UserId, Voice>,
    /// 最近一次成功刷新时间
    refreshed_at: RwLock<Option<DateTime<Utc>>>,
}

impl VoiceCatalog {
    /// 创建空缓存；首次内容由 refresh 填充
    pub fn new(provider: Arc<dyn TtsProviderPort>) -> Self {
        Self {
            provider,
            cache: RwLock::new(Arc::new(Vec::new())),
            preferences: DashMap::new(),
            refreshed_at: RwLock::new(None),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 从供应商拉取完整音色列表并原子替换缓存
    ///
    /// 失败时缓存不动，返回可恢复错误；调用方记日志即可。
    pub async fn refresh(&self) -> Result<usize, CatalogError> {
        let voices = self.provider.fetch_voices().await?;
        let count = voices.len();

        *self.cache.write().expect("catalog cache lock poisoned") = Arc::new(voices);
        *self
            .refreshed_at
            .write()
            .expect("catalog refreshed_at lock poisoned") = Some(Utc::now());

        tracing::info!(count = count, "Voice cache refreshed");
        Ok(count)
    }

    /// 当前缓存快照
    pub fn snapshot(&self) -> Arc<Vec<Voice>> {
        self.cache
            .read()
            .expect("catalog cache lock poisoned")
            .clone()
    }

    /// 最近一次成功刷新时间
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        *self
            .refreshed_at
            .read()
            .expect("catalog refreshed_at lock poisoned")
    }

    /// 按名称查找音色（大小写不敏感的精确匹配）
    pub fn find_by_name(&self, name: &str) -> Option<Voice> {
        let wanted = name.to_lowercase();
        self.snapshot()
            .iter()
            .find(|voice| voice.name().to_lowercase() == wanted)
            .cloned()
    }

    /// 按类别过滤音色，每次调用重新计算
    pub fn list_by_category(&self, category: &VoiceCategory) -> Vec<Voice> {
        self.snapshot()
            .iter()
            .filter(|voice| voice.category() == category)
            .cloned()
            .collect()
    }

    /// 设置用户音色偏好，覆盖旧值
    pub fn set_preference(&self, user: UserId, voice: Voice) {
        tracing::info!(user = %user, voice = %voice.name(), "Voice preference set");
        self.preferences.insert(user, voice);
    }

    /// 用户当前偏好
    pub fn preference(&self, user: &UserId) -> Option<Voice> {
        self.preferences.get(user).map(|entry| entry.clone())
    }

    /// 解析用户应使用的音色
    ///
    /// 有偏好用偏好，否则从缓存均匀随机挑一个；缓存为空报错。
    pub fn voice_for(&self, user: &UserId) -> Result<Voice, CatalogError> {
        if let Some(voice) = self.preference(user) {
            return Ok(voice);
        }

        let snapshot = self.snapshot();
        snapshot
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(CatalogError::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voice::VoiceId;
    use crate::infrastructure::adapters::tts::FakeTtsClient;

    fn sample_voices() -> Vec<Voice> {
        vec![
            Voice::new(VoiceId::new("v-1"), "Rachel", VoiceCategory::Premade),
            Voice::new(VoiceId::new("v-2"), "Marcus", VoiceCategory::Cloned),
            Voice::new(VoiceId::new("v-3"), "Nova", VoiceCategory::Cloned),
        ]
    }

    #[tokio::test]
    async fn test_refresh_replaces_cache() {
        let provider = Arc::new(FakeTtsClient::new(sample_voices()));
        let catalog = VoiceCatalog::new(provider);

        assert!(catalog.snapshot().is_empty());
        let count = catalog.refresh().await.unwrap();
        assert_eq!(count, 3);
        assert_eq!(catalog.snapshot().len(), 3);
        assert!(catalog.refreshed_at().is_some());
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_snapshot() {
        let provider = Arc::new(FakeTtsClient::new(sample_voices()));
        let catalog = VoiceCatalog::new(provider.clone());
        catalog.refresh().await.unwrap();

        provider.set_fail_voices(true);
        let result = catalog.refresh().await;
        assert!(matches!(result, Err(CatalogError::Unavailable(_))));

        // 读路径与失败前完全一致
        assert_eq!(catalog.snapshot().len(), 3);
        assert!(catalog.find_by_name("rachel").is_some());
        assert_eq!(
            catalog.list_by_category(&VoiceCategory::Cloned).len(),
            2
        );
    }

    #[tokio::test]
    async fn test_find_by_name_is_case_insensitive_exact() {
        let provider = Arc::new(FakeTtsClient::new(sample_voices()));
        let catalog = VoiceCatalog::new(provider);
        catalog.refresh().await.unwrap();

        assert_eq!(catalog.find_by_name("RACHEL").unwrap().id().as_str(), "v-1");
        // 前缀不算精确匹配
        assert!(catalog.find_by_name("Rach").is_none());
        assert!(catalog.find_by_name("Nonexistent").is_none());
    }

    #[tokio::test]
    async fn test_list_by_category_recomputed_each_call() {
        let provider = Arc::new(FakeTtsClient::new(sample_voices()));
        let catalog = VoiceCatalog::new(provider.clone());
        catalog.refresh().await.unwrap();

        assert_eq!(catalog.list_by_category(&VoiceCategory::Cloned).len(), 2);

        provider.set_voices(vec![Voice::new(
            VoiceId::new("v-9"),
            "Echo",
            VoiceCategory::Cloned,
        )]);
        catalog.refresh().await.unwrap();
        assert_eq!(catalog.list_by_category(&VoiceCategory::Cloned).len(), 1);
    }

    #[tokio::test]
    async fn test_preference_overrides_random_fallback() {
        let provider = Arc::new(FakeTtsClient::new(sample_voices()));
        let catalog = VoiceCatalog::new(provider);
        catalog.refresh().await.unwrap();

        let user = UserId::new("alice");
        assert!(catalog.preference(&user).is_none());

        let marcus = catalog.find_by_name("Marcus").unwrap();
        catalog.set_preference(user.clone(), marcus);
        assert_eq!(catalog.voice_for(&user).unwrap().id().as_str(), "v-2");
    }

    #[tokio::test]
    async fn test_voice_for_falls_back_to_cache_pick() {
        let provider = Arc::new(FakeTtsClient::new(sample_voices()));
        let catalog = VoiceCatalog::new(provider);
        catalog.refresh().await.unwrap();

        let voice = catalog.voice_for(&UserId::new("nobody")).unwrap();
        assert!(["v-1", "v-2", "v-3"].contains(&voice.id().as_str()));
    }

    #[tokio::test]
    async fn test_voice_for_empty_cache_is_error() {
        let provider = Arc::new(FakeTtsClient::new(Vec::new()));
        let catalog = VoiceCatalog::new(provider);

        let result = catalog.voice_for(&UserId::new("alice"));
        assert!(matches!(result, Err(CatalogError::Empty)));
    }
}
