//! # OrderGrid Exchange Integrations
//!
//! Exchange trading-rule filters and exact order-value quantization.
//!
//! ## Architecture
//!
//! - **Tagged filters** - PRICE_FILTER, LOT_SIZE and MIN_NOTIONAL as enum variants
//! - **Pure quantizer** - no I/O, no shared state, safe from any thread
//! - **Fixed-point arithmetic** - `rust_decimal` end to end, never `f64`
//! - **Binance model** - exchange information in, order parameters out

#[cfg(feature = "binance")]
pub mod binance;
pub mod errors;
pub mod filters;
pub mod quantizer;

// Re-export main types
pub use errors::{ExchangeError, QuantizeError, Result, ValueField};
pub use filters::{ActiveFilters, LotSizeFilter, MinNotionalFilter, PriceFilter, SymbolFilter};
pub use quantizer::{quantize, quantize_price, quantize_quantity, OrderValue, RoundingPolicy};

/// Prelude for convenient imports
pub mod prelude {
    #[cfg(feature = "binance")]
    pub use crate::binance::{
        BinanceOrderSide, BinanceOrderType, BinanceTimeInForce, ExchangeInfo, NewOrderParams,
        SymbolInfo,
    };
    pub use crate::errors::{ExchangeError, QuantizeError, Result, ValueField};
    pub use crate::filters::{
        ActiveFilters, LotSizeFilter, MinNotionalFilter, PriceFilter, SymbolFilter,
    };
    pub use crate::quantizer::{quantize, OrderValue, RoundingPolicy};
    pub use ordergrid_core::prelude::*;
}
