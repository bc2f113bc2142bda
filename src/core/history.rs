//! Deployer History Scanner
//!
//! Fetches the deployer's most recent transactions (bounded window, newest
//! first) and keeps the contract creations. The window trades completeness
//! for latency: older deployments are not seen.

use alloy_primitives::Address;
use std::sync::Arc;
use tracing::debug;

use crate::models::errors::AppResult;
use crate::models::types::{parse_address, DeployHistory, DeploymentRecord};
use crate::providers::explorer::{ExplorerQuery, ExplorerTx, SortOrder};
use crate::providers::source::ChainDataSource;
use crate::utils::constants::HISTORY_WINDOW;
use crate::utils::decoder::parse_unix_timestamp;

pub struct HistoryScanner {
    source: Arc<dyn ChainDataSource>,
    window: u32,
}

impl HistoryScanner {
    pub fn new(source: Arc<dyn ChainDataSource>) -> Self {
        Self {
            source,
            window: HISTORY_WINDOW,
        }
    }

    /// Scan `deployer`'s recent transactions, excluding `seed` from the records
    pub async fn scan(&self, deployer: Address, seed: Address) -> AppResult<DeployHistory> {
        let query = ExplorerQuery::tx_list(deployer, SortOrder::Desc, 1, self.window);
        let txs: Vec<ExplorerTx> = self.source.query_explorer(&query).await?.into_rows()?;

        let history = classify(&txs, deployer, seed, self.window as usize);
        debug!(
            deployer = %deployer,
            scanned = history.scanned,
            deploy_count = history.deploy_count,
            discovered = history.records.len(),
            "History scanned"
        );
        Ok(history)
    }
}

/// Count creation events and build records for every creation other than `seed`
pub fn classify(txs: &[ExplorerTx], deployer: Address, seed: Address, window: usize) -> DeployHistory {
    let mut history = DeployHistory::default();

    for tx in txs.iter().take(window) {
        history.scanned += 1;
        if !tx.is_creation() {
            continue;
        }
        history.deploy_count += 1;

        let Some(contract) = tx
            .contract_address
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .and_then(|raw| parse_address(raw).ok())
        else {
            continue;
        };
        // Address equality is byte equality, so hex case never matters here
        if contract == seed {
            continue;
        }
        let Some(timestamp) = parse_unix_timestamp(&tx.time_stamp) else {
            debug!(tx = %tx.hash, "Creation without readable timestamp skipped");
            continue;
        };

        history.records.push(DeploymentRecord {
            contract_address: contract,
            deployer,
            timestamp,
            source_tx_hash: tx.hash.clone(),
        });
    }

    history
}
