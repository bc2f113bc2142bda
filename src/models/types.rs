//! Type definitions for deployer analysis
//! Core data structures shared by the pipeline and the API layer

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::errors::{AppError, AppResult, ErrorCode};

/// Parse a user-supplied address.
///
/// Input must be `0x`-prefixed hex; case is ignored, so mixed-case
/// (checksummed or not) input normalizes to the same 20 bytes.
pub fn parse_address(raw: &str) -> AppResult<Address> {
    let trimmed = raw.trim();
    if !trimmed.starts_with("0x") && !trimmed.starts_with("0X") {
        return Err(AppError::invalid_input("Invalid address"));
    }
    let hex_part = &trimmed[2..];
    if hex_part.len() != 40 {
        return Err(AppError::invalid_input("Invalid address"));
    }
    // Checksums are not enforced
    Address::from_str(&format!("0x{}", hex_part.to_ascii_lowercase()))
        .map_err(|_| AppError::invalid_input("Invalid address"))
}

/// Lower-case `0x` form used for every map key, comparison and response field
pub fn to_lower_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}

pub fn serialize_address<S: Serializer>(address: &Address, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&to_lower_hex(address))
}

/// Which cascade step produced the deployer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolutionStrategy {
    /// Explorer `getcontractcreation`
    ContractCreation,
    /// Sender of the earliest external transaction
    EarliestTransaction,
    /// Sender of the earliest internal transaction (factory deployments)
    EarliestInternalTransaction,
}

impl ResolutionStrategy {
    /// Cascade order
    pub const ORDER: [ResolutionStrategy; 3] = [
        Self::ContractCreation,
        Self::EarliestTransaction,
        Self::EarliestInternalTransaction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContractCreation => "contract_creation",
            Self::EarliestTransaction => "earliest_transaction",
            Self::EarliestInternalTransaction => "earliest_internal_transaction",
        }
    }
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved deployer
#[derive(Debug, Clone, PartialEq)]
pub struct DeployerResolution {
    pub deployer: Address,
    /// Only the transaction-list strategies know the creation time
    pub created_at: Option<DateTime<Utc>>,
    pub strategy: ResolutionStrategy,
}

/// What happened to one strategy during a resolution attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    Resolved,
    Empty,
    Failed { code: ErrorCode, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyAttempt {
    pub strategy: ResolutionStrategy,
    pub outcome: StrategyOutcome,
}

impl fmt::Display for StrategyAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            StrategyOutcome::Resolved => write!(f, "{}=resolved", self.strategy),
            StrategyOutcome::Empty => write!(f, "{}=empty", self.strategy),
            StrategyOutcome::Failed { code, .. } => write!(f, "{}={}", self.strategy, code.as_str()),
        }
    }
}

/// One-line trail of a cascade, e.g. `contract_creation=empty, earliest_transaction=resolved`
pub fn describe_attempts(attempts: &[StrategyAttempt]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Terminal result of the strategy cascade
#[derive(Debug, Clone)]
pub enum Resolution {
    Found {
        resolution: DeployerResolution,
        attempts: Vec<StrategyAttempt>,
    },
    Unknown {
        attempts: Vec<StrategyAttempt>,
    },
}

impl Resolution {
    pub fn attempts(&self) -> &[StrategyAttempt] {
        match self {
            Resolution::Found { attempts, .. } | Resolution::Unknown { attempts } => attempts,
        }
    }
}

/// A contract creation found in the deployer's recent history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    #[serde(serialize_with = "serialize_address")]
    pub contract_address: Address,
    #[serde(serialize_with = "serialize_address")]
    pub deployer: Address,
    pub timestamp: DateTime<Utc>,
    pub source_tx_hash: String,
}

/// Placeholder symbol when enrichment could not read one
pub const UNKNOWN_SYMBOL: &str = "UNKNOWN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedToken {
    #[serde(flatten)]
    pub record: DeploymentRecord,
    pub symbol: String,
    pub symbol_known: bool,
}

impl EnrichedToken {
    pub fn known(record: DeploymentRecord, symbol: String) -> Self {
        Self {
            record,
            symbol,
            symbol_known: true,
        }
    }

    pub fn unknown(record: DeploymentRecord) -> Self {
        Self {
            record,
            symbol: UNKNOWN_SYMBOL.to_string(),
            symbol_known: false,
        }
    }
}

/// Bounded recent-history scan of a deployer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployHistory {
    /// Creations other than the seed contract, most recent first
    pub records: Vec<DeploymentRecord>,
    /// Every creation event in the window, including the seed contract
    pub deploy_count: u32,
    /// Number of transactions the explorer returned
    pub scanned: usize,
}

/// Coarse deploy-frequency tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskTier {
    Low,
    Medium,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
        }
    }
}

/// Pipeline stage that can fail after the deployer is known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Balance,
    History,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageFailure {
    pub stage: Stage,
    pub code: &'static str,
    pub message: String,
}

/// Response of one analysis. Built once per request, never mutated afterwards.
///
/// A failed stage leaves the fields it owns as `None` and adds an entry
/// to `partial_failures`; it never reports zeros.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(serialize_with = "serialize_address")]
    pub contract: Address,
    #[serde(serialize_with = "serialize_address")]
    pub deployer: Address,
    pub resolved_via: ResolutionStrategy,
    pub created_at: Option<DateTime<Utc>>,
    pub native_balance: Option<String>,
    pub native_symbol: String,
    pub risk_tier: Option<RiskTier>,
    pub deploy_count: Option<u32>,
    pub contracts_discovered: Option<usize>,
    pub history: Vec<EnrichedToken>,
    pub partial: bool,
    pub partial_failures: Vec<StageFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_attempts() {
        let attempts = vec![
            StrategyAttempt {
                strategy: ResolutionStrategy::ContractCreation,
                outcome: StrategyOutcome::Failed {
                    code: ErrorCode::UpstreamTimeout,
                    message: "timed out".into(),
                },
            },
            StrategyAttempt {
                strategy: ResolutionStrategy::EarliestTransaction,
                outcome: StrategyOutcome::Empty,
            },
            StrategyAttempt {
                strategy: ResolutionStrategy::EarliestInternalTransaction,
                outcome: StrategyOutcome::Resolved,
            },
        ];
        assert_eq!(
            describe_attempts(&attempts),
            format!(
                "contract_creation={}, earliest_transaction=empty, earliest_internal_transaction=resolved",
                ErrorCode::UpstreamTimeout.as_str()
            )
        );
        assert_eq!(describe_attempts(&[]), "");
    }

    #[test]
    fn test_parse_address_is_case_insensitive() {
        let lower = parse_address("0x7a250d5630b4cf539739df2c5dacb4c659f2488d").unwrap();
        let mixed = parse_address("0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D").unwrap();
        let upper = parse_address("0x7A250D5630B4CF539739DF2C5DACB4C659F2488D").unwrap();
        assert_eq!(lower, mixed);
        assert_eq!(lower, upper);
        assert_eq!(
            to_lower_hex(&upper),
            "0x7a250d5630b4cf539739df2c5dacb4c659f2488d"
        );
    }

    #[test]
    fn test_parse_address_rejects_malformed() {
        for raw in ["", "7a250d5630b4cf539739df2c5dacb4c659f2488d", "0x1234", "0xzz250d5630b4cf539739df2c5dacb4c659f2488d"] {
            let err = parse_address(raw).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidInput, "input {raw:?}");
        }
    }

    #[test]
    fn test_enriched_token_serializes_flat() {
        let record = DeploymentRecord {
            contract_address: parse_address("0x00000000000000000000000000000000000000AA").unwrap(),
            deployer: parse_address("0x00000000000000000000000000000000000000BB").unwrap(),
            timestamp: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            source_tx_hash: "0xabc".to_string(),
        };
        let json = serde_json::to_value(EnrichedToken::unknown(record)).unwrap();
        assert_eq!(json["contractAddress"], "0x00000000000000000000000000000000000000aa");
        assert_eq!(json["symbol"], "UNKNOWN");
        assert_eq!(json["symbolKnown"], false);
        assert_eq!(json["sourceTxHash"], "0xabc");
    }
}
