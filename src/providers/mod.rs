//! Providers Module - External Data Sources
//!
//! Explorer query API, JSON-RPC node and the notification transport.

pub mod explorer;
pub mod notifier;
pub mod rpc;
pub mod source;

pub use explorer::*;
pub use notifier::*;
pub use rpc::*;
pub use source::*;
