//! Explorer API Client (Etherscan-compatible query API)
//!
//! Request shaping and response decoding only. Every call is a single
//! attempt; retry and fallback policy belongs to the caller.
//!
//! Actions used:
//! - `contract/getcontractcreation` - direct creator lookup
//! - `account/txlist` - external transactions (asc/desc, paged)
//! - `account/txlistinternal` - internal transactions (factory deployments)

use alloy_primitives::Address;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::models::errors::{AppError, AppResult};
use crate::models::types::to_lower_hex;
use crate::utils::constants::{
    EXPLORER_END_BLOCK, EXPLORER_START_BLOCK, EXPLORER_STATUS_OK, USER_AGENT as USER_AGENT_CONST,
};

/// Explorer query action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExplorerAction {
    ContractCreation,
    TxList,
    InternalTxList,
}

impl ExplorerAction {
    pub fn module(&self) -> &'static str {
        match self {
            Self::ContractCreation => "contract",
            Self::TxList | Self::InternalTxList => "account",
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Self::ContractCreation => "getcontractcreation",
            Self::TxList => "txlist",
            Self::InternalTxList => "txlistinternal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// A fully parameterized explorer query (API key is added by the client)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerQuery {
    pub action: ExplorerAction,
    pub params: Vec<(&'static str, String)>,
}

impl ExplorerQuery {
    pub fn contract_creation(contract: Address) -> Self {
        Self {
            action: ExplorerAction::ContractCreation,
            params: vec![("contractaddresses", to_lower_hex(&contract))],
        }
    }

    pub fn tx_list(address: Address, sort: SortOrder, page: u32, offset: u32) -> Self {
        Self::account_list(ExplorerAction::TxList, address, sort, page, offset)
    }

    pub fn internal_tx_list(address: Address, sort: SortOrder, page: u32, offset: u32) -> Self {
        Self::account_list(ExplorerAction::InternalTxList, address, sort, page, offset)
    }

    fn account_list(
        action: ExplorerAction,
        address: Address,
        sort: SortOrder,
        page: u32,
        offset: u32,
    ) -> Self {
        Self {
            action,
            params: vec![
                ("address", to_lower_hex(&address)),
                ("startblock", EXPLORER_START_BLOCK.to_string()),
                ("endblock", EXPLORER_END_BLOCK.to_string()),
                ("page", page.to_string()),
                ("offset", offset.to_string()),
                ("sort", sort.as_str().to_string()),
            ],
        }
    }

    /// Query-string pairs including module/action
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("module", self.action.module().to_string()),
            ("action", self.action.action().to_string()),
        ];
        pairs.extend(self.params.iter().cloned());
        pairs
    }
}

/// Raw explorer envelope: `{"status": "1", "message": "OK", "result": ...}`
#[derive(Debug, Clone, Deserialize)]
pub struct RawExplorerResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: serde_json::Value,
}

/// Three-way explorer status. Zero results is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorerStatus {
    Ok,
    Empty,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerPayload {
    pub status: ExplorerStatus,
    pub message: String,
    pub result: serde_json::Value,
}

impl ExplorerPayload {
    pub fn ok(result: serde_json::Value) -> Self {
        Self {
            status: ExplorerStatus::Ok,
            message: "OK".to_string(),
            result,
        }
    }

    pub fn empty() -> Self {
        Self {
            status: ExplorerStatus::Empty,
            message: "No transactions found".to_string(),
            result: serde_json::Value::Array(vec![]),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ExplorerStatus::Error,
            message: message.into(),
            result: serde_json::Value::Null,
        }
    }

    /// Classify a raw response.
    ///
    /// Explorers report "nothing found" as status `0` with messages such as
    /// `No transactions found` / `No data found`, which must not be confused
    /// with real failures (`NOTOK`, rate limits, bad keys).
    pub fn classify(raw: RawExplorerResponse) -> Self {
        let result_is_empty = match &raw.result {
            serde_json::Value::Array(items) => items.is_empty(),
            serde_json::Value::Null => true,
            _ => false,
        };

        let status = if raw.status == EXPLORER_STATUS_OK {
            if result_is_empty {
                ExplorerStatus::Empty
            } else {
                ExplorerStatus::Ok
            }
        } else {
            let message = raw.message.to_lowercase();
            let no_results = message.starts_with("no ") && message.contains("found");
            if no_results || (raw.result.is_array() && result_is_empty) {
                ExplorerStatus::Empty
            } else {
                ExplorerStatus::Error
            }
        };

        Self {
            status,
            message: raw.message,
            result: raw.result,
        }
    }

    /// Decode result rows; `Empty` yields no rows, `Error` is an upstream failure
    pub fn into_rows<T: DeserializeOwned>(self) -> AppResult<Vec<T>> {
        match self.status {
            ExplorerStatus::Empty => Ok(Vec::new()),
            ExplorerStatus::Error => {
                let detail = match &self.result {
                    serde_json::Value::String(s) => format!("{}: {}", self.message, s),
                    _ => self.message.clone(),
                };
                Err(AppError::upstream(format!("Explorer error: {}", detail)))
            }
            ExplorerStatus::Ok => Ok(serde_json::from_value(self.result)?),
        }
    }
}

/// Row of `getcontractcreation`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCreationRow {
    #[serde(default)]
    pub contract_address: String,
    #[serde(default)]
    pub contract_creator: String,
    #[serde(default)]
    pub tx_hash: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Row of `txlist` / `txlistinternal`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerTx {
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub from: String,
    /// Empty for contract creations
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub time_stamp: String,
}

impl ExplorerTx {
    /// A transaction creates a contract iff its recipient is empty/absent
    pub fn is_creation(&self) -> bool {
        self.to.as_deref().map(str::trim).unwrap_or("").is_empty()
    }
}

/// HTTP client for the explorer API
#[derive(Clone)]
pub struct ExplorerClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ExplorerClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_CONST));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(|e| AppError::config_invalid(format!("Failed to build explorer client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Execute one query (single attempt)
    pub async fn query(&self, query: &ExplorerQuery) -> AppResult<ExplorerPayload> {
        let mut pairs = query.query_pairs();
        if !self.api_key.is_empty() {
            pairs.push(("apikey", self.api_key.clone()));
        }

        debug!(action = query.action.action(), "Explorer query");

        let response = self.client.get(&self.base_url).query(&pairs).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::upstream(format!("Explorer HTTP error: {}", status)));
        }

        let raw: RawExplorerResponse = response.json().await?;
        Ok(ExplorerPayload::classify(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawExplorerResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_status_classification() {
        let ok = ExplorerPayload::classify(raw(json!({
            "status": "1", "message": "OK", "result": [{"hash": "0x1"}]
        })));
        assert_eq!(ok.status, ExplorerStatus::Ok);

        let empty = ExplorerPayload::classify(raw(json!({
            "status": "0", "message": "No transactions found", "result": []
        })));
        assert_eq!(empty.status, ExplorerStatus::Empty);

        let no_data = ExplorerPayload::classify(raw(json!({
            "status": "0", "message": "No data found", "result": null
        })));
        assert_eq!(no_data.status, ExplorerStatus::Empty);

        let error = ExplorerPayload::classify(raw(json!({
            "status": "0", "message": "NOTOK", "result": "Max rate limit reached"
        })));
        assert_eq!(error.status, ExplorerStatus::Error);
    }

    #[test]
    fn test_error_payload_becomes_upstream_error() {
        let payload = ExplorerPayload::classify(raw(json!({
            "status": "0", "message": "NOTOK", "result": "Invalid API Key"
        })));
        let err = payload.into_rows::<ExplorerTx>().unwrap_err();
        assert!(err.code.is_upstream());
        assert!(err.message.contains("Invalid API Key"));
    }

    #[test]
    fn test_tx_rows_and_creation_flag() {
        let payload = ExplorerPayload::ok(json!([
            {"hash": "0xa", "from": "0x01", "to": "", "contractAddress": "0xc1", "timeStamp": "1700000000"},
            {"hash": "0xb", "from": "0x01", "to": "0x02", "contractAddress": "", "timeStamp": "1700000001"},
            {"hash": "0xc", "from": "0x01", "timeStamp": "1700000002"}
        ]));
        let rows: Vec<ExplorerTx> = payload.into_rows().unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_creation());
        assert!(!rows[1].is_creation());
        assert!(rows[2].is_creation());
    }

    #[test]
    fn test_query_shapes() {
        let addr = Address::repeat_byte(0xAB);
        let q = ExplorerQuery::tx_list(addr, SortOrder::Asc, 1, 1);
        let pairs = q.query_pairs();
        assert!(pairs.contains(&("module", "account".to_string())));
        assert!(pairs.contains(&("action", "txlist".to_string())));
        assert!(pairs.contains(&("sort", "asc".to_string())));
        assert!(pairs.contains(&("offset", "1".to_string())));
        assert!(pairs.contains(&("address", format!("0x{}", "ab".repeat(20)))));

        let q = ExplorerQuery::contract_creation(addr);
        assert_eq!(q.action.module(), "contract");
        assert_eq!(q.action.action(), "getcontractcreation");
    }
}
