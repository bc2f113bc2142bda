//! Deployer monitoring subscriptions

pub mod registry;

pub use registry::*;
