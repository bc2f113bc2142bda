//! DeployerScope Library
//!
//! Deployer intelligence for EVM contracts:
//! - Resolves who deployed a contract through a cascade of explorer lookups
//! - Scans the deployer's recent history for other deployments
//! - Enriches discovered contracts with their token symbol
//! - Scores deploy frequency and keeps deployer watch subscriptions

pub mod api;
pub mod config;
pub mod core;
pub mod models;
pub mod monitoring;
pub mod providers;
pub mod utils;

pub use api::{create_router, AppState};
pub use config::AppConfig;
pub use core::{AnalysisOrchestrator, PipelineSettings};
pub use models::{AnalysisResult, AppError, AppResult, ErrorCode, RiskTier};
pub use monitoring::MonitoringRegistry;
pub use providers::{ChainDataSource, LiveChainSource, Notifier, TelegramNotifier};
