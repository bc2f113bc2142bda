//! DeployerScope HTTP API
//! Deployer analysis and monitoring subscriptions over REST

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use handlers::AppState;
pub use routes::create_router;
pub use types::*;
