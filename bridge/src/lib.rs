//! # WAF Bridge Library
//!
//! In-memory WAF Classic service behind the `waf_model` wire protocol.

// Core modules
pub mod config;
pub mod dispatch;
pub mod service;
pub mod table;
pub mod tokens;

// Re-export commonly used types
pub use config::{BridgeConfig, ServiceLimits};
pub use service::MemoryWaf;
pub use table::Table;
pub use tokens::TokenLedger;
