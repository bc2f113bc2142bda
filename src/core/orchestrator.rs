//! Analysis Orchestrator
//!
//! One request, one fresh pipeline run:
//! resolve deployer → (balance ‖ history scan) → enrich → score.
//!
//! Failure policy:
//! - no deployer from any strategy → `NotFound`
//! - upstream failure in balance/history → that stage's fields stay `None`,
//!   the result is flagged `partial`
//! - anything else → returned as-is for the API layer to map

use alloy_primitives::Address;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::enricher::ContractEnricher;
use super::history::HistoryScanner;
use super::resolver::DeployerResolver;
use super::risk_score::score;
use crate::config::AppConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{describe_attempts, AnalysisResult, Resolution, Stage, StageFailure};
use crate::providers::source::ChainDataSource;
use crate::utils::constants::{DEFAULT_ENRICH_TIMEOUT_MS, DEFAULT_NATIVE_SYMBOL};
use crate::utils::decoder::format_native;

pub const DEPLOYER_NOT_FOUND: &str =
    "Could not identify deployer. Contract might be unverified or very new.";

/// Per-deployment knobs the pipeline needs
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub native_symbol: String,
    pub enrich_timeout: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            native_symbol: DEFAULT_NATIVE_SYMBOL.to_string(),
            enrich_timeout: Duration::from_millis(DEFAULT_ENRICH_TIMEOUT_MS),
        }
    }
}

impl From<&AppConfig> for PipelineSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            native_symbol: config.native_symbol.clone(),
            enrich_timeout: config.enrich_timeout,
        }
    }
}

pub struct AnalysisOrchestrator {
    source: Arc<dyn ChainDataSource>,
    resolver: DeployerResolver,
    history: HistoryScanner,
    enricher: ContractEnricher,
    settings: PipelineSettings,
}

impl AnalysisOrchestrator {
    pub fn new(source: Arc<dyn ChainDataSource>, settings: PipelineSettings) -> Self {
        Self {
            resolver: DeployerResolver::new(source.clone()),
            history: HistoryScanner::new(source.clone()),
            enricher: ContractEnricher::new(source.clone()).with_timeout(settings.enrich_timeout),
            source,
            settings,
        }
    }

    /// Analyze `contract` end to end
    pub async fn analyze(&self, contract: Address) -> AppResult<AnalysisResult> {
        let start = Instant::now();

        let outcome = self.resolver.resolve(contract).await;
        debug!(contract = %contract, attempts = %describe_attempts(outcome.attempts()), "Resolution trail");

        let resolution = match outcome {
            Resolution::Found { resolution, .. } => resolution,
            Resolution::Unknown { .. } => return Err(AppError::not_found(DEPLOYER_NOT_FOUND)),
        };
        let deployer = resolution.deployer;

        let (balance, history) = tokio::join!(
            self.source.read_balance(deployer),
            self.history.scan(deployer, contract)
        );

        let mut failures = Vec::new();

        let native_balance = match balance {
            Ok(wei) => Some(format_native(wei)),
            Err(e) => {
                failures.push(stage_failure(Stage::Balance, e)?);
                None
            }
        };

        let (deploy_count, discovered, history) = match history {
            Ok(scan) => {
                let enriched = self.enricher.enrich(&scan.records).await;
                (Some(scan.deploy_count), Some(scan.records.len()), enriched)
            }
            Err(e) => {
                failures.push(stage_failure(Stage::History, e)?);
                (None, None, Vec::new())
            }
        };

        let risk_tier = deploy_count.map(score);

        info!(
            contract = %contract,
            deployer = %deployer,
            deploy_count = ?deploy_count,
            risk = risk_tier.map(|t| t.as_str()).unwrap_or("n/a"),
            recommendation = risk_tier.map(|t| t.recommendation()).unwrap_or("n/a"),
            partial = !failures.is_empty(),
            "📊 Analysis complete in {}ms",
            start.elapsed().as_millis()
        );

        Ok(AnalysisResult {
            contract,
            deployer,
            resolved_via: resolution.strategy,
            created_at: resolution.created_at,
            native_balance,
            native_symbol: self.settings.native_symbol.clone(),
            risk_tier,
            deploy_count,
            contracts_discovered: discovered,
            history,
            partial: !failures.is_empty(),
            partial_failures: failures,
        })
    }
}

/// Upstream failures become a recorded partial failure; anything else aborts
fn stage_failure(stage: Stage, err: AppError) -> AppResult<StageFailure> {
    if !err.code.is_upstream() {
        return Err(err);
    }
    warn!(stage = ?stage, code = err.code_str(), "⚠️ Stage failed: {}", err.message);
    Ok(StageFailure {
        stage,
        code: err.code_str(),
        message: err.message,
    })
}
