//! Models Module - Data Structures & Errors
//!
//! Single source of truth for the data model shared by the pipeline,
//! the monitoring registry and the API layer.

pub mod errors;
pub mod types;

pub use errors::*;
pub use types::*;
