//! Deployer Resolution
//!
//! Ordered cascade of independent strategies:
//! 1. Explorer contract-creation lookup (authoritative, no timestamp)
//! 2. Sender of the earliest external transaction
//! 3. Sender of the earliest internal transaction (factory deployments)
//!
//! The first strategy yielding a well-formed deployer wins. A strategy that
//! fails (network, timeout, malformed payload) is recorded and skipped; no
//! error crosses the driver loop.

use alloy_primitives::Address;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::models::errors::{AppError, AppResult};
use crate::models::types::{
    parse_address, DeployerResolution, Resolution, ResolutionStrategy, StrategyAttempt,
    StrategyOutcome,
};
use crate::providers::explorer::{ContractCreationRow, ExplorerQuery, ExplorerTx, SortOrder};
use crate::providers::source::ChainDataSource;
use crate::utils::decoder::parse_unix_timestamp;

pub struct DeployerResolver {
    source: Arc<dyn ChainDataSource>,
}

impl DeployerResolver {
    pub fn new(source: Arc<dyn ChainDataSource>) -> Self {
        Self { source }
    }

    /// Run the cascade for `contract`
    pub async fn resolve(&self, contract: Address) -> Resolution {
        let mut attempts = Vec::with_capacity(ResolutionStrategy::ORDER.len());

        for strategy in ResolutionStrategy::ORDER {
            match self.run_strategy(strategy, contract).await {
                Ok(Some(resolution)) => {
                    info!(
                        contract = %contract,
                        deployer = %resolution.deployer,
                        strategy = %strategy,
                        "🔎 Deployer resolved"
                    );
                    attempts.push(StrategyAttempt {
                        strategy,
                        outcome: StrategyOutcome::Resolved,
                    });
                    return Resolution::Found {
                        resolution,
                        attempts,
                    };
                }
                Ok(None) => {
                    debug!(contract = %contract, strategy = %strategy, "Strategy yielded nothing");
                    attempts.push(StrategyAttempt {
                        strategy,
                        outcome: StrategyOutcome::Empty,
                    });
                }
                Err(e) => {
                    warn!(
                        contract = %contract,
                        strategy = %strategy,
                        code = e.code_str(),
                        "⚠️ Strategy failed: {}",
                        e.message
                    );
                    attempts.push(StrategyAttempt {
                        strategy,
                        outcome: StrategyOutcome::Failed {
                            code: e.code,
                            message: e.message,
                        },
                    });
                }
            }
        }

        info!(contract = %contract, "📭 Deployer unknown after all strategies");
        Resolution::Unknown { attempts }
    }

    async fn run_strategy(
        &self,
        strategy: ResolutionStrategy,
        contract: Address,
    ) -> AppResult<Option<DeployerResolution>> {
        match strategy {
            ResolutionStrategy::ContractCreation => self.direct_creation(contract).await,
            ResolutionStrategy::EarliestTransaction => {
                let query = ExplorerQuery::tx_list(contract, SortOrder::Asc, 1, 1);
                self.earliest_sender(&query, strategy).await
            }
            ResolutionStrategy::EarliestInternalTransaction => {
                let query = ExplorerQuery::internal_tx_list(contract, SortOrder::Asc, 1, 1);
                self.earliest_sender(&query, strategy).await
            }
        }
    }

    async fn direct_creation(&self, contract: Address) -> AppResult<Option<DeployerResolution>> {
        let query = ExplorerQuery::contract_creation(contract);
        let rows: Vec<ContractCreationRow> =
            self.source.query_explorer(&query).await?.into_rows()?;

        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };

        Ok(deployer_from(&row.contract_creator)?.map(|deployer| DeployerResolution {
            deployer,
            created_at: row.timestamp.as_deref().and_then(parse_unix_timestamp),
            strategy: ResolutionStrategy::ContractCreation,
        }))
    }

    async fn earliest_sender(
        &self,
        query: &ExplorerQuery,
        strategy: ResolutionStrategy,
    ) -> AppResult<Option<DeployerResolution>> {
        let rows: Vec<ExplorerTx> = self.source.query_explorer(query).await?.into_rows()?;

        let Some(tx) = rows.into_iter().next() else {
            return Ok(None);
        };

        Ok(deployer_from(&tx.from)?.map(|deployer| DeployerResolution {
            deployer,
            created_at: parse_unix_timestamp(&tx.time_stamp),
            strategy,
        }))
    }
}

/// Empty and zero addresses mean "no deployer"; anything unparseable is malformed
fn deployer_from(raw: &str) -> AppResult<Option<Address>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let address = parse_address(raw)
        .map_err(|_| AppError::invalid_response(format!("Malformed deployer address: {}", raw)))?;
    if address.is_zero() {
        return Ok(None);
    }
    Ok(Some(address))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mock::{Reply, ScriptedSource};
    use crate::models::errors::ErrorCode;
    use crate::providers::explorer::{ExplorerAction, ExplorerPayload};
    use serde_json::json;

    const CONTRACT: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const CREATOR: &str = "0x1111111111111111111111111111111111111111";
    const SENDER: &str = "0x2222222222222222222222222222222222222222";
    const FACTORY: &str = "0x3333333333333333333333333333333333333333";

    fn creation_payload(creator: &str) -> Reply<ExplorerPayload> {
        Reply::Value(ExplorerPayload::ok(json!([{
            "contractAddress": CONTRACT, "contractCreator": creator, "txHash": "0xdead"
        }])))
    }

    fn tx_payload(from: &str, ts: &str) -> Reply<ExplorerPayload> {
        Reply::Value(ExplorerPayload::ok(json!([{
            "hash": "0xbeef", "from": from, "to": "", "contractAddress": CONTRACT, "timeStamp": ts
        }])))
    }

    async fn resolve(source: ScriptedSource) -> (Resolution, Vec<ExplorerAction>) {
        let source = Arc::new(source);
        let resolver = DeployerResolver::new(source.clone());
        let resolution = resolver.resolve(parse_address(CONTRACT).unwrap()).await;
        (resolution, source.explorer_calls())
    }

    fn found(resolution: Resolution) -> DeployerResolution {
        match resolution {
            Resolution::Found { resolution, .. } => resolution,
            Resolution::Unknown { attempts } => panic!("expected deployer, got {:?}", attempts),
        }
    }

    #[tokio::test]
    async fn test_no_strategy_fabricates_a_deployer() {
        let (resolution, calls) = resolve(ScriptedSource::default()).await;
        assert!(matches!(resolution, Resolution::Unknown { .. }));
        assert_eq!(resolution.attempts().len(), 3);
        assert!(resolution
            .attempts()
            .iter()
            .all(|a| a.outcome == StrategyOutcome::Empty));
        assert_eq!(
            calls,
            vec![
                ExplorerAction::ContractCreation,
                ExplorerAction::TxList,
                ExplorerAction::InternalTxList
            ]
        );
    }

    #[tokio::test]
    async fn test_first_strategy_wins() {
        let source = ScriptedSource::default()
            .with_explorer(ExplorerAction::ContractCreation, creation_payload(CREATOR))
            .with_explorer(ExplorerAction::TxList, tx_payload(SENDER, "1700000000"));

        let (resolution, calls) = resolve(source).await;
        let resolved = found(resolution);
        assert_eq!(resolved.deployer, parse_address(CREATOR).unwrap());
        assert_eq!(resolved.strategy, ResolutionStrategy::ContractCreation);
        assert!(resolved.created_at.is_none());
        assert_eq!(calls, vec![ExplorerAction::ContractCreation]);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_cascade() {
        let source = ScriptedSource::default()
            .with_explorer(
                ExplorerAction::ContractCreation,
                Reply::Fail("connection reset".to_string()),
            )
            .with_explorer(ExplorerAction::TxList, tx_payload(SENDER, "1700000000"));

        let (resolution, _) = resolve(source).await;
        let attempts = resolution.attempts().to_vec();
        let resolved = found(resolution);

        assert_eq!(resolved.deployer, parse_address(SENDER).unwrap());
        assert_eq!(resolved.strategy, ResolutionStrategy::EarliestTransaction);
        assert_eq!(resolved.created_at.unwrap().timestamp(), 1_700_000_000);
        assert!(matches!(
            attempts[0].outcome,
            StrategyOutcome::Failed { code: ErrorCode::UpstreamUnavailable, .. }
        ));
    }

    #[tokio::test]
    async fn test_explorer_error_status_is_absorbed() {
        let source = ScriptedSource::default()
            .with_explorer(
                ExplorerAction::ContractCreation,
                Reply::Value(ExplorerPayload::error("NOTOK")),
            )
            .with_explorer(
                ExplorerAction::TxList,
                Reply::Value(ExplorerPayload::error("Max rate limit reached")),
            )
            .with_explorer(ExplorerAction::InternalTxList, tx_payload(FACTORY, "1700000500"));

        let (resolution, _) = resolve(source).await;
        let resolved = found(resolution);
        assert_eq!(resolved.deployer, parse_address(FACTORY).unwrap());
        assert_eq!(
            resolved.strategy,
            ResolutionStrategy::EarliestInternalTransaction
        );
    }

    #[tokio::test]
    async fn test_malformed_deployer_advances() {
        let source = ScriptedSource::default()
            .with_explorer(ExplorerAction::ContractCreation, creation_payload("not-an-address"))
            .with_explorer(ExplorerAction::TxList, tx_payload(SENDER, "1700000000"));

        let (resolution, _) = resolve(source).await;
        assert!(matches!(
            resolution.attempts()[0].outcome,
            StrategyOutcome::Failed { code: ErrorCode::UpstreamInvalidResponse, .. }
        ));
        assert_eq!(found(resolution).deployer, parse_address(SENDER).unwrap());
    }

    #[test]
    fn test_deployer_from() {
        assert_eq!(deployer_from("").unwrap(), None);
        assert_eq!(
            deployer_from("0x0000000000000000000000000000000000000000").unwrap(),
            None
        );
        assert!(deployer_from("0x12").is_err());
        assert_eq!(
            deployer_from(CREATOR).unwrap(),
            Some(parse_address(CREATOR).unwrap())
        );
    }
}
