//! Contract Enrichment
//!
//! Reads a display symbol for the first few discovered contracts. Lookups
//! run concurrently inside the request task and the batch returns only
//! after every lookup settled. A failed or timed-out lookup degrades its
//! own entry to `symbol_known = false` and nothing else.

use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::models::types::{DeploymentRecord, EnrichedToken};
use crate::providers::source::ChainDataSource;
use crate::utils::constants::{DEFAULT_ENRICH_TIMEOUT_MS, ENRICH_LIMIT, SYMBOL_SIGNATURE};

pub struct ContractEnricher {
    source: Arc<dyn ChainDataSource>,
    limit: usize,
    lookup_timeout: Duration,
}

impl ContractEnricher {
    pub fn new(source: Arc<dyn ChainDataSource>) -> Self {
        Self {
            source,
            limit: ENRICH_LIMIT,
            lookup_timeout: Duration::from_millis(DEFAULT_ENRICH_TIMEOUT_MS),
        }
    }

    pub fn with_timeout(mut self, lookup_timeout: Duration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    /// Enrich the first `limit` records, preserving their order
    pub async fn enrich(&self, records: &[DeploymentRecord]) -> Vec<EnrichedToken> {
        let lookups = records
            .iter()
            .take(self.limit)
            .cloned()
            .map(|record| self.lookup(record));

        join_all(lookups).await
    }

    async fn lookup(&self, record: DeploymentRecord) -> EnrichedToken {
        let address = record.contract_address;
        let read = self.source.read_view_function(address, SYMBOL_SIGNATURE);

        match tokio::time::timeout(self.lookup_timeout, read).await {
            Ok(Ok(symbol)) if !symbol.trim().is_empty() => {
                EnrichedToken::known(record, symbol.trim().to_string())
            }
            Ok(Ok(_)) => EnrichedToken::unknown(record),
            Ok(Err(e)) => {
                debug!(contract = %address, code = e.code_str(), "Symbol lookup failed: {}", e.message);
                EnrichedToken::unknown(record)
            }
            Err(_) => {
                debug!(contract = %address, "Symbol lookup timed out");
                EnrichedToken::unknown(record)
            }
        }
    }
}
