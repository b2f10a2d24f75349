//! Sayer - 语音频道 TTS 播报
//!
//! 启动流程: 配置加载 -> 日志初始化 -> 装配端口适配器 ->
//! 后台刷新任务 -> HTTP 服务器（带优雅关闭）

use std::sync::Arc;

use sayer::application::{
    CommandRouter, SessionRegistry, Synthesizer, TtsProviderPort, VoiceCatalog, VoiceGatewayPort,
};
use sayer::config::{load_config, print_config};
use sayer::domain::ids::RoomId;
use sayer::infrastructure::adapters::transport::{PlaybackTiming, WsVoiceGateway};
use sayer::infrastructure::adapters::tts::{ElevenLabsClient, ElevenLabsConfig};
use sayer::infrastructure::events::AudioHub;
use sayer::infrastructure::http::{AppState, HttpServer, ServerConfig};
use sayer::infrastructure::tasks::{CatalogRefresher, CatalogRefresherConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},sayer={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Sayer - 语音频道 TTS 播报");
    print_config(&config);

    // TTS 供应商客户端
    let provider_config = ElevenLabsConfig {
        base_url: config.provider.base_url.clone(),
        api_key: config.provider.api_key.clone(),
        model_id: config.provider.model_id.clone(),
        optimize_streaming_latency: config.provider.optimize_streaming_latency,
        timeout_secs: config.provider.timeout_secs,
    };
    let provider: Arc<dyn TtsProviderPort> = Arc::new(ElevenLabsClient::new(provider_config)?);

    // 音色缓存与合成器
    let catalog = VoiceCatalog::new(provider.clone()).arc();
    let synthesizer = Arc::new(Synthesizer::new(provider.clone(), config.say.max_chars));

    // 语音传输（频道 WebSocket 广播）
    let hub = AudioHub::new().arc();
    let timing = PlaybackTiming {
        bytes_per_sec: config.playback.bytes_per_sec,
        min_duration_ms: config.playback.min_duration_ms,
    };
    let gateway: Arc<dyn VoiceGatewayPort> = Arc::new(WsVoiceGateway::new(hub.clone(), timing));

    // 会话注册表与命令路由
    let registry = SessionRegistry::new().arc();
    let router = CommandRouter::new(catalog.clone(), synthesizer, registry, gateway);

    // 启动音色缓存刷新任务（首个 tick 立即执行初次拉取）
    if config.catalog.refresh_enabled {
        let refresher = CatalogRefresher::new(
            CatalogRefresherConfig {
                interval_secs: config.catalog.refresh_interval_secs,
            },
            catalog.clone(),
        );
        tokio::spawn(refresher.run());
    }

    // HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(router, catalog, hub, config.scope.room.map(RoomId::new));
    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
