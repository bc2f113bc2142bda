//! RPC Client Module
//!
//! Minimal JSON-RPC client for the two chain reads the pipeline needs:
//! 1. `eth_getBalance` - native balance of the deployer
//! 2. `eth_call` - zero-argument view functions returning a string
//!
//! Single attempt per call, no retry and no fallback endpoint: callers decide
//! what a failure means. The per-call timeout lives on the HTTP client.

use alloy_primitives::{Address, U256};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING, USER_AGENT};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::models::errors::{AppError, AppResult};
use crate::models::types::to_lower_hex;
use crate::utils::constants::USER_AGENT as USER_AGENT_CONST;
use crate::utils::decoder::{decode_hex_data, decode_string_return, parse_quantity, selector};

/// JSON-RPC request envelope
#[derive(Debug, Clone, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: serde_json::Value,
    id: u64,
}

/// JSON-RPC response structure
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

/// JSON-RPC error structure
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    /// Check if this is a rate limit error (code -32005)
    pub fn is_rate_limit(&self) -> bool {
        self.code == -32005 || self.message.to_lowercase().contains("rate limit")
    }

    /// Reverted calls surface as code 3 or -32000 with "execution reverted"
    pub fn is_revert(&self) -> bool {
        self.code == 3 || self.message.to_lowercase().contains("revert")
    }
}

/// JSON-RPC provider for a single endpoint
#[derive(Clone)]
pub struct RpcProvider {
    url: String,
    client: reqwest::Client,
}

impl RpcProvider {
    pub fn new(url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            url: url.into(),
            client: Self::build_client(timeout)?,
        })
    }

    /// Build HTTP client with custom headers and gzip
    fn build_client(timeout: Duration) -> AppResult<reqwest::Client> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_CONST));
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

        reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(|e| AppError::config_invalid(format!("Failed to build HTTP client: {}", e)))
    }

    /// Execute a single JSON-RPC call
    pub async fn call<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> AppResult<T> {
        let payload = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        };

        let response = self.client.post(&self.url).json(&payload).send().await?;

        let status = response.status();
        if status == 429 {
            return Err(AppError::upstream("Rate limited (HTTP 429)"));
        }
        if !status.is_success() {
            return Err(AppError::upstream(format!("HTTP error: {}", status)));
        }

        let json: RpcResponse<T> = response.json().await?;

        if let Some(error) = json.error {
            let kind = if error.is_rate_limit() {
                "rate limited"
            } else if error.is_revert() {
                "reverted"
            } else {
                "error"
            };
            return Err(AppError::upstream(format!(
                "RPC {}: {} (code: {})",
                kind, error.message, error.code
            )));
        }

        json.result
            .ok_or_else(|| AppError::invalid_response(format!("No result in {} response", method)))
    }

    /// Native balance in wei
    pub async fn get_balance(&self, address: Address) -> AppResult<U256> {
        let params = serde_json::json!([to_lower_hex(&address), "latest"]);
        let raw: String = self.call("eth_getBalance", params).await?;
        parse_quantity(&raw)
            .ok_or_else(|| AppError::invalid_response(format!("Bad balance quantity: {}", raw)))
    }

    /// Execute eth_call and return raw return data
    pub async fn eth_call(&self, to: Address, data: &[u8]) -> AppResult<Vec<u8>> {
        let params = serde_json::json!([
            { "to": to_lower_hex(&to), "data": format!("0x{}", hex::encode(data)) },
            "latest"
        ]);
        let raw: String = self.call("eth_call", params).await?;
        decode_hex_data(&raw)
            .ok_or_else(|| AppError::invalid_response("eth_call returned non-hex data"))
    }

    /// Read a zero-argument view function that returns a single string
    pub async fn read_string(&self, to: Address, signature: &str) -> AppResult<String> {
        let data = self.eth_call(to, &selector(signature)).await?;
        if data.is_empty() {
            // Calls to accounts without the function return `0x`
            return Err(AppError::invalid_response(format!(
                "{} returned no data (function does not exist)",
                signature
            )));
        }
        debug!(signature, bytes = data.len(), "Decoding string return");
        decode_string_return(&data).ok_or_else(|| {
            AppError::invalid_response(format!("{} did not return a string", signature))
        })
    }

    /// Endpoint with any path-embedded key masked, for logging
    pub fn masked_url(&self) -> String {
        if let Some((base, _)) = self.url.split_once("/v2/") {
            return format!("{}/v2/***HIDDEN***", base);
        }
        self.url.clone()
    }
}
