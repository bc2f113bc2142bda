//! DeployerScope API Server
//!
//! Usage:
//!   cargo run --bin deployer_scope
//!
//! Environment:
//!   PORT / DEPLOYER_SCOPE_PORT - Server port (default: 8080)
//!   HOST                       - Server host (default: 0.0.0.0)
//!   EXPLORER_API_URL, EXPLORER_API_KEY, RPC_URL, TELEGRAM_BOT_TOKEN
//!   RUST_LOG                   - Log filter (default: info)

use deployer_scope::utils::constants::{APP_NAME, APP_VERSION};
use deployer_scope::{
    create_router, AnalysisOrchestrator, AppConfig, AppState, LiveChainSource, MonitoringRegistry,
    Notifier, PipelineSettings, TelegramNotifier,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env();
    config.validate()?;

    let source = Arc::new(LiveChainSource::from_config(&config)?);
    info!("🔗 RPC endpoint: {}", source.rpc().masked_url());
    info!("🔎 Explorer endpoint: {}", config.explorer_api_url);

    let notifier: Option<Arc<dyn Notifier>> = match &config.telegram_bot_token {
        Some(token) => Some(Arc::new(TelegramNotifier::new(
            token.clone(),
            config.upstream_timeout,
        )?)),
        None => {
            warn!("⚠️ TELEGRAM_BOT_TOKEN not set, subscriptions will not be confirmed");
            None
        }
    };

    let orchestrator = AnalysisOrchestrator::new(source, PipelineSettings::from(&config));
    let registry = Arc::new(MonitoringRegistry::new());
    let state = Arc::new(AppState::new(
        orchestrator,
        registry.clone(),
        notifier,
        config.chain_name.clone(),
    ));

    let app = create_router(state);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!(
        "🚀 {} v{} starting on http://{} ({})",
        APP_NAME, APP_VERSION, addr, config.chain_name
    );
    info!("Endpoints:");
    info!("  GET    /v1/analyze?address=0x...  - Deployer analysis");
    info!("  POST   /v1/monitor                - Watch a deployer");
    info!("  GET    /v1/monitor?deployer=0x... - List watchers");
    info!("  DELETE /v1/monitor                - Stop watching");
    info!("  GET    /v1/health                 - Health check");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!(
        "👋 Shutdown complete, dropping {} in-memory subscriptions",
        registry.subscription_count()
    );

    Ok(())
}
