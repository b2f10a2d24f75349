//! Catalog Refresher - 音色缓存后台刷新
//!
//! 按固定间隔整体刷新音色缓存。刷新失败只记日志，上一份快照
//! 继续服务；首个 tick 立即触发，承担启动时的初次拉取。

use std::sync::Arc;
use std::time::Duration;

use crate::application::VoiceCatalog;

/// 刷新任务配置
#[derive(Debug, Clone)]
pub struct CatalogRefresherConfig {
    /// 刷新间隔（秒）
    pub interval_secs: u64,
}

impl Default for CatalogRefresherConfig {
    fn default() -> Self {
        Self { interval_secs: 120 }
    }
}

/// 音色缓存刷新任务
pub struct CatalogRefresher {
    config: CatalogRefresherConfig,
    catalog: Arc<VoiceCatalog>,
}

impl CatalogRefresher {
    pub fn new(config: CatalogRefresherConfig, catalog: Arc<VoiceCatalog>) -> Self {
        Self { config, catalog }
    }

    /// 启动刷新循环
    pub async fn run(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.config.interval_secs));
        tracing::info!(
            interval_secs = self.config.interval_secs,
            "CatalogRefresher started"
        );

        loop {
            interval.tick().await;
            if let Err(error) = self.catalog.refresh().await {
                tracing::warn!(error = %error, "Voice cache refresh failed, serving stale snapshot");
            }
        }
    }
}
