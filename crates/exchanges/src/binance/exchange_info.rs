//! Binance exchange-information model
//!
//! Decodes the `/api/v3/exchangeInfo` payload far enough to reach each
//! symbol's trading-rule filters. Fetching it is the REST layer's job; this
//! module only consumes the JSON.

use crate::errors::{ExchangeError, Result};
use crate::filters::{ActiveFilters, SymbolFilter};
use crate::quantizer::{quantize, OrderValue, RoundingPolicy};
use ordergrid_core::decimal::RawValue;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Exchange information from Binance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeInfo {
    #[serde(default)]
    pub timezone: String,
    #[serde(rename = "serverTime", default)]
    pub server_time: u64,
    pub symbols: Vec<SymbolInfo>,
}

impl ExchangeInfo {
    /// Parse a raw exchange-information response body
    pub fn from_json(body: &str) -> Result<Self> {
        let info: ExchangeInfo = serde_json::from_str(body)?;
        info!("📊 Loaded exchange info: {} symbols", info.symbols.len());
        Ok(info)
    }

    /// Look up a symbol by name, ignoring ASCII case
    pub fn symbol(&self, name: &str) -> Result<&SymbolInfo> {
        self.symbols
            .iter()
            .find(|s| s.symbol.eq_ignore_ascii_case(name))
            .ok_or_else(|| ExchangeError::SymbolNotFound(name.to_string()))
    }

    /// Symbols currently open for trading
    pub fn trading_symbols(&self) -> impl Iterator<Item = &SymbolInfo> {
        self.symbols.iter().filter(|s| s.is_trading())
    }
}

/// Symbol information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    pub status: String,
    #[serde(rename = "baseAsset")]
    pub base_asset: String,
    #[serde(rename = "quoteAsset")]
    pub quote_asset: String,
    #[serde(rename = "baseAssetPrecision", default, skip_serializing_if = "Option::is_none")]
    pub base_asset_precision: Option<u32>,
    #[serde(rename = "quotePrecision", default, skip_serializing_if = "Option::is_none")]
    pub quote_precision: Option<u32>,
    #[serde(default)]
    pub filters: Vec<SymbolFilter>,
}

impl SymbolInfo {
    pub fn is_trading(&self) -> bool {
        self.status == "TRADING"
    }

    pub fn active_filters(&self) -> ActiveFilters<'_> {
        ActiveFilters::select(&self.filters)
    }

    /// Quantize an order's price and quantity against this symbol's filters
    pub fn quantize<P, Q>(&self, price: P, quantity: Q, policy: &RoundingPolicy) -> Result<OrderValue>
    where
        P: Into<RawValue>,
        Q: Into<RawValue>,
    {
        let value = quantize(&self.filters, price, quantity, policy)?;
        debug!("{} order value quantized to {}", self.symbol, value);
        Ok(value)
    }
}
