//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `SAYER_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `SAYER_SERVER__PORT=8080`
/// - `SAYER_PROVIDER__API_KEY=xi-xxxx`
/// - `SAYER_SCOPE__ROOM=112233445566`
/// - `SAYER_CATALOG__REFRESH_INTERVAL_SECS=60`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5080)?
        .set_default("provider.base_url", "https://api.elevenlabs.io")?
        .set_default("provider.api_key", "")?
        .set_default("provider.model_id", "eleven_multilingual_v2")?
        .set_default("provider.optimize_streaming_latency", 1)?
        .set_default("provider.timeout_secs", 30)?
        .set_default("say.max_chars", 100)?
        .set_default("playback.bytes_per_sec", 16_000)?
        .set_default("playback.min_duration_ms", 250)?
        .set_default("catalog.refresh_enabled", true)?
        .set_default("catalog.refresh_interval_secs", 120)?
        .set_default("log.level", "info")?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: SAYER_
    // 层级分隔符: __ (双下划线)
    // 例如: SAYER_PROVIDER__API_KEY=xi-xxxx
    builder = builder.add_source(
        Environment::with_prefix("SAYER")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.provider.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Provider base URL cannot be empty".to_string(),
        ));
    }

    if config.say.max_chars == 0 {
        return Err(ConfigError::ValidationError(
            "say.max_chars cannot be 0".to_string(),
        ));
    }

    if config.playback.bytes_per_sec == 0 {
        return Err(ConfigError::ValidationError(
            "playback.bytes_per_sec cannot be 0".to_string(),
        ));
    }

    if config.catalog.refresh_enabled && config.catalog.refresh_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Catalog refresh interval cannot be 0 when refresh is enabled".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Provider: {}", config.provider.base_url);
    tracing::info!("Provider Model: {}", config.provider.model_id);
    tracing::info!("Provider Timeout: {}s", config.provider.timeout_secs);
    tracing::info!(
        "Provider API Key: {}",
        if config.provider.api_key.is_empty() {
            "(not set)"
        } else {
            "(set)"
        }
    );
    match config.scope.room {
        Some(room) => tracing::info!("Room Scope: {}", room),
        None => tracing::info!("Room Scope: (all rooms)"),
    }
    tracing::info!("Say Max Chars: {}", config.say.max_chars);
    tracing::info!("Playback Rate: {} B/s", config.playback.bytes_per_sec);
    tracing::info!("Catalog Refresh Enabled: {}", config.catalog.refresh_enabled);
    if config.catalog.refresh_enabled {
        tracing::info!(
            "Catalog Refresh Interval: {}s",
            config.catalog.refresh_interval_secs
        );
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_provider_url() {
        let mut config = AppConfig::default();
        config.provider.base_url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_max_chars() {
        let mut config = AppConfig::default();
        config.say.max_chars = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_refresh_interval() {
        let mut config = AppConfig::default();
        config.catalog.refresh_interval_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9099

[provider]
api_key = "xi-test-key"

[scope]
room = 42

[say]
max_chars = 80
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9099);
        assert_eq!(config.provider.api_key, "xi-test-key");
        assert_eq!(config.scope.room, Some(42));
        assert_eq!(config.say.max_chars, 80);
        // 未覆盖的键保持默认
        assert_eq!(config.provider.model_id, "eleven_multilingual_v2");
    }
}
