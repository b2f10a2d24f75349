//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 房间作用域配置
    #[serde(default)]
    pub scope: ScopeConfig,

    /// TTS 供应商配置
    #[serde(default)]
    pub provider: ProviderConfig,

    /// say 命令配置
    #[serde(default)]
    pub say: SayConfig,

    /// 播出节奏配置
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// 音色缓存配置
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            scope: ScopeConfig::default(),
            provider: ProviderConfig::default(),
            say: SayConfig::default(),
            playback: PlaybackConfig::default(),
            catalog: CatalogConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 房间作用域配置
///
/// 设置后实例只服务这一个房间，其它房间的命令在边界被拒绝。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScopeConfig {
    #[serde(default)]
    pub room: Option<u64>,
}

/// TTS 供应商配置
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// 供应商基础 URL
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,

    /// API key（xi-api-key 请求头）
    #[serde(default)]
    pub api_key: String,

    /// 合成模型
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// 供应商端的流式延迟优化档位
    #[serde(default = "default_streaming_latency")]
    pub optimize_streaming_latency: u8,

    /// 请求超时时间（秒）
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

fn default_provider_base_url() -> String {
    "https://api.elevenlabs.io".to_string()
}

fn default_model_id() -> String {
    "eleven_multilingual_v2".to_string()
}

fn default_streaming_latency() -> u8 {
    1
}

fn default_provider_timeout() -> u64 {
    30
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_provider_base_url(),
            api_key: String::new(),
            model_id: default_model_id(),
            optimize_streaming_latency: default_streaming_latency(),
            timeout_secs: default_provider_timeout(),
        }
    }
}

/// say 命令配置
#[derive(Debug, Clone, Deserialize)]
pub struct SayConfig {
    /// 输入文本的字符数上限
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

fn default_max_chars() -> usize {
    100
}

impl Default for SayConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
        }
    }
}

/// 播出节奏配置
#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackConfig {
    /// 按字节数估算播出时长的码率（字节/秒）
    #[serde(default = "default_bytes_per_sec")]
    pub bytes_per_sec: u64,

    /// 最短播出时长（毫秒）
    #[serde(default = "default_min_duration_ms")]
    pub min_duration_ms: u64,
}

fn default_bytes_per_sec() -> u64 {
    // 约 128kbps 的 MP3
    16_000
}

fn default_min_duration_ms() -> u64 {
    250
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            bytes_per_sec: default_bytes_per_sec(),
            min_duration_ms: default_min_duration_ms(),
        }
    }
}

/// 音色缓存配置
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// 是否启用周期刷新
    #[serde(default = "default_refresh_enabled")]
    pub refresh_enabled: bool,

    /// 刷新间隔（秒）
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

fn default_refresh_enabled() -> bool {
    true
}

fn default_refresh_interval() -> u64 {
    120
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            refresh_enabled: default_refresh_enabled(),
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5080);
        assert_eq!(config.provider.base_url, "https://api.elevenlabs.io");
        assert_eq!(config.provider.model_id, "eleven_multilingual_v2");
        assert_eq!(config.say.max_chars, 100);
        assert_eq!(config.catalog.refresh_interval_secs, 120);
        assert!(config.scope.room.is_none());
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:5080");
    }
}
