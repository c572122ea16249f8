//! Binance exchange integration
//!
//! Symbol metadata from the exchange-information endpoint and the order
//! request parameters that receive the quantized values.

pub mod exchange_info;
pub mod types;

// Re-export types from submodules
pub use exchange_info::{ExchangeInfo, SymbolInfo};
pub use types::*;
