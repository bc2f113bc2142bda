//! ChainDataSource - the two external read paths behind one contract
//!
//! Suspension points of the pipeline are exactly these calls. No caching,
//! no retry: every method is one network round trip.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;

use super::explorer::{ExplorerClient, ExplorerPayload, ExplorerQuery};
use super::rpc::RpcProvider;
use crate::config::AppConfig;
use crate::models::errors::AppResult;

#[async_trait]
pub trait ChainDataSource: Send + Sync {
    /// Run one explorer query
    async fn query_explorer(&self, query: &ExplorerQuery) -> AppResult<ExplorerPayload>;

    /// Native balance in wei
    async fn read_balance(&self, address: Address) -> AppResult<U256>;

    /// Call a zero-argument view function and decode its single string return
    async fn read_view_function(&self, address: Address, signature: &str) -> AppResult<String>;
}

/// Explorer HTTP API + JSON-RPC node
pub struct LiveChainSource {
    explorer: ExplorerClient,
    rpc: RpcProvider,
}

impl LiveChainSource {
    pub fn new(explorer: ExplorerClient, rpc: RpcProvider) -> Self {
        Self { explorer, rpc }
    }

    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let explorer = ExplorerClient::new(
            config.explorer_api_url.clone(),
            config.explorer_api_key.clone(),
            config.upstream_timeout,
        )?;
        let rpc = RpcProvider::new(config.rpc_url.clone(), config.upstream_timeout)?;
        Ok(Self::new(explorer, rpc))
    }

    pub fn rpc(&self) -> &RpcProvider {
        &self.rpc
    }
}

#[async_trait]
impl ChainDataSource for LiveChainSource {
    async fn query_explorer(&self, query: &ExplorerQuery) -> AppResult<ExplorerPayload> {
        self.explorer.query(query).await
    }

    async fn read_balance(&self, address: Address) -> AppResult<U256> {
        self.rpc.get_balance(address).await
    }

    async fn read_view_function(&self, address: Address, signature: &str) -> AppResult<String> {
        self.rpc.read_string(address, signature).await
    }
}
