//! Constants Module - Single Source of Truth
//!
//! Chain defaults, pipeline bounds and explorer parameters live here.
//! No hardcoded values in other modules.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "DeployerScope";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for outbound HTTP requests
pub const USER_AGENT: &str = concat!("DeployerScope/", env!("CARGO_PKG_VERSION"));

// ============================================
// CHAIN DEFAULTS (Monad Mainnet)
// ============================================

pub const DEFAULT_CHAIN_NAME: &str = "Monad Mainnet";
pub const DEFAULT_NATIVE_SYMBOL: &str = "MON";
pub const DEFAULT_RPC_URL: &str = "https://rpc.monad.xyz";
pub const DEFAULT_EXPLORER_API_URL: &str = "https://api.monadscan.com/api";

// ============================================
// TIMEOUTS
// ============================================

/// Per-call timeout for explorer and RPC requests (milliseconds)
pub const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 8_000;

/// Per-lookup timeout inside the enrichment fan-out (milliseconds)
pub const DEFAULT_ENRICH_TIMEOUT_MS: u64 = 4_000;

// ============================================
// PIPELINE BOUNDS
// ============================================

/// Recent transactions scanned per deployer
pub const HISTORY_WINDOW: u32 = 50;

/// Discovered contracts enriched per request
pub const ENRICH_LIMIT: usize = 5;

/// Deploy count above which the tier becomes Medium
pub const MEDIUM_RISK_DEPLOY_THRESHOLD: u32 = 5;

/// Zero-argument view function read for display symbols
pub const SYMBOL_SIGNATURE: &str = "symbol()";

// ============================================
// EXPLORER QUERY PARAMETERS
// ============================================

pub const EXPLORER_START_BLOCK: u64 = 0;
pub const EXPLORER_END_BLOCK: u64 = 99_999_999;

/// Explorer status flag for a successful query
pub const EXPLORER_STATUS_OK: &str = "1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_bounds() {
        assert_eq!(HISTORY_WINDOW, 50);
        assert_eq!(ENRICH_LIMIT, 5);
        assert_eq!(MEDIUM_RISK_DEPLOY_THRESHOLD, 5);
    }

    #[test]
    fn test_user_agent_carries_version() {
        assert!(USER_AGENT.starts_with("DeployerScope/"));
        assert!(USER_AGENT.ends_with(APP_VERSION));
    }
}
