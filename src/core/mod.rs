//! Core Module - Deployer Analysis Pipeline
//!
//! resolver → history → enricher → risk_score, sequenced by the orchestrator.

pub mod enricher;
pub mod history;
pub mod orchestrator;
pub mod resolver;
pub mod risk_score;

pub use enricher::*;
pub use history::*;
pub use orchestrator::*;
pub use resolver::*;
pub use risk_score::*;

#[cfg(test)]
pub(crate) mod mock {
    //! Scripted in-memory ChainDataSource for unit tests

    use alloy_primitives::{Address, U256};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::models::errors::{AppError, AppResult};
    use crate::providers::explorer::{ExplorerAction, ExplorerPayload, ExplorerQuery};
    use crate::providers::source::ChainDataSource;

    #[derive(Clone)]
    pub enum Reply<T> {
        Value(T),
        Fail(String),
    }

    impl<T: Clone> Reply<T> {
        fn resolve(&self) -> AppResult<T> {
            match self {
                Reply::Value(v) => Ok(v.clone()),
                Reply::Fail(msg) => Err(AppError::upstream(msg.clone())),
            }
        }
    }

    #[derive(Default)]
    pub struct ScriptedSource {
        pub explorer: HashMap<ExplorerAction, Reply<ExplorerPayload>>,
        pub balance: Option<Reply<U256>>,
        pub symbols: HashMap<Address, (Reply<String>, Duration)>,
        pub calls: Mutex<Vec<ExplorerAction>>,
    }

    impl ScriptedSource {
        pub fn with_explorer(mut self, action: ExplorerAction, reply: Reply<ExplorerPayload>) -> Self {
            self.explorer.insert(action, reply);
            self
        }

        pub fn with_balance(mut self, reply: Reply<U256>) -> Self {
            self.balance = Some(reply);
            self
        }

        pub fn with_symbol(mut self, address: Address, reply: Reply<String>, delay: Duration) -> Self {
            self.symbols.insert(address, (reply, delay));
            self
        }

        pub fn explorer_calls(&self) -> Vec<ExplorerAction> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChainDataSource for ScriptedSource {
        async fn query_explorer(&self, query: &ExplorerQuery) -> AppResult<ExplorerPayload> {
            self.calls.lock().unwrap().push(query.action);
            match self.explorer.get(&query.action) {
                Some(reply) => reply.resolve(),
                None => Ok(ExplorerPayload::empty()),
            }
        }

        async fn read_balance(&self, _address: Address) -> AppResult<U256> {
            match &self.balance {
                Some(reply) => reply.resolve(),
                None => Ok(U256::ZERO),
            }
        }

        async fn read_view_function(&self, address: Address, _signature: &str) -> AppResult<String> {
            match self.symbols.get(&address) {
                Some((reply, delay)) => {
                    tokio::time::sleep(*delay).await;
                    reply.resolve()
                }
                None => Err(AppError::invalid_response("function does not exist")),
            }
        }
    }
}
