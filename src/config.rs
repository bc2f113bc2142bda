//! Configuration module
//! Endpoints, credentials and timeouts, read from the environment

use std::time::Duration;
use tracing::{info, warn};

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    DEFAULT_CHAIN_NAME, DEFAULT_ENRICH_TIMEOUT_MS, DEFAULT_EXPLORER_API_URL,
    DEFAULT_NATIVE_SYMBOL, DEFAULT_RPC_URL, DEFAULT_UPSTREAM_TIMEOUT_MS,
};

/// Runtime configuration for the API server
#[derive(Clone)]
pub struct AppConfig {
    /// Explorer query endpoint (Etherscan-compatible)
    pub explorer_api_url: String,
    /// Explorer API key, may be empty for keyless tiers
    pub explorer_api_key: String,
    /// JSON-RPC endpoint for balance and view-function reads
    pub rpc_url: String,
    /// Timeout applied to every explorer/RPC call
    pub upstream_timeout: Duration,
    /// Timeout applied to each enrichment lookup
    pub enrich_timeout: Duration,
    /// Telegram bot token; notifications are disabled when absent
    pub telegram_bot_token: Option<String>,
    pub chain_name: String,
    pub native_symbol: String,
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            explorer_api_url: DEFAULT_EXPLORER_API_URL.to_string(),
            explorer_api_key: String::new(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            upstream_timeout: Duration::from_millis(DEFAULT_UPSTREAM_TIMEOUT_MS),
            enrich_timeout: Duration::from_millis(DEFAULT_ENRICH_TIMEOUT_MS),
            telegram_bot_token: None,
            chain_name: DEFAULT_CHAIN_NAME.to_string(),
            native_symbol: DEFAULT_NATIVE_SYMBOL.to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let explorer_api_key = non_empty("EXPLORER_API_KEY")
            .or_else(|| non_empty("MONADSCAN_API_KEY"))
            .unwrap_or_default();
        if explorer_api_key.is_empty() {
            warn!("⚠️ EXPLORER_API_KEY not set, using keyless explorer access");
        } else {
            info!("🔑 EXPLORER_API_KEY configured (key hidden)");
        }

        let telegram_bot_token = non_empty("TELEGRAM_BOT_TOKEN");
        if telegram_bot_token.is_some() {
            info!("🔑 TELEGRAM_BOT_TOKEN configured (token hidden)");
        }

        Self {
            explorer_api_url: non_empty("EXPLORER_API_URL").unwrap_or(defaults.explorer_api_url),
            explorer_api_key,
            rpc_url: non_empty("RPC_URL")
                .or_else(|| non_empty("MONAD_RPC_URL"))
                .unwrap_or(defaults.rpc_url),
            upstream_timeout: parse_millis(
                "UPSTREAM_TIMEOUT_MS",
                non_empty("UPSTREAM_TIMEOUT_MS"),
                defaults.upstream_timeout,
            ),
            enrich_timeout: parse_millis(
                "ENRICH_TIMEOUT_MS",
                non_empty("ENRICH_TIMEOUT_MS"),
                defaults.enrich_timeout,
            ),
            telegram_bot_token,
            chain_name: non_empty("CHAIN_NAME").unwrap_or(defaults.chain_name),
            native_symbol: non_empty("NATIVE_SYMBOL").unwrap_or(defaults.native_symbol),
            host: non_empty("HOST").unwrap_or(defaults.host),
            // Hosting platforms inject PORT; DEPLOYER_SCOPE_PORT is for local runs
            port: non_empty("PORT")
                .or_else(|| non_empty("DEPLOYER_SCOPE_PORT"))
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
        }
    }

    /// Reject values that would make every request fail
    pub fn validate(&self) -> AppResult<()> {
        if self.explorer_api_url.is_empty() || self.rpc_url.is_empty() {
            return Err(AppError::config_invalid("Explorer and RPC URLs must be set"));
        }
        if self.upstream_timeout.is_zero() || self.enrich_timeout.is_zero() {
            return Err(AppError::config_invalid("Timeouts must be greater than zero"));
        }
        Ok(())
    }
}

fn parse_millis(key: &str, raw: Option<String>, default: Duration) -> Duration {
    match raw {
        None => default,
        Some(value) => match value.trim().parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                warn!(key, value = %value, "Unparseable timeout, using default");
                default
            }
        },
    }
}
