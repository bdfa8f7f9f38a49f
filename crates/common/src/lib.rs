//! Release Cinema Common Utilities
//!
//! Shared infrastructure for all Release Cinema crates:
//! - Error types and result aliases
//! - External process invocation and tool discovery
//! - Tracing/logging initialization
//! - Configuration loading

pub mod config;
pub mod error;
pub mod logging;
pub mod process;

pub use config::*;
pub use error::*;
pub use process::*;
