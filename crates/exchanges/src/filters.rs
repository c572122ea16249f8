//! Symbol trading-rule filters
//!
//! An exchange publishes, per symbol, an ordered list of filters tagged by
//! `filterType`. Only the three kinds that constrain an order's price and
//! quantity are modelled; every other kind decodes to [`SymbolFilter::Other`]
//! so a complete exchange-information payload still parses.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// PRICE_FILTER: bounds and tick grid for the order price.
///
/// A zero `max_price` or `tick_size` disables that rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFilter {
    #[serde(rename = "minPrice")]
    pub min_price: Decimal,
    #[serde(rename = "maxPrice")]
    pub max_price: Decimal,
    #[serde(rename = "tickSize")]
    pub tick_size: Decimal,
}

impl PriceFilter {
    pub fn new(min_price: Decimal, max_price: Decimal, tick_size: Decimal) -> Self {
        Self {
            min_price,
            max_price,
            tick_size,
        }
    }
}

/// LOT_SIZE: bounds and step grid for the order quantity.
///
/// A zero `max_qty` or `step_size` disables that rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotSizeFilter {
    #[serde(rename = "minQty")]
    pub min_qty: Decimal,
    #[serde(rename = "maxQty")]
    pub max_qty: Decimal,
    #[serde(rename = "stepSize")]
    pub step_size: Decimal,
}

impl LotSizeFilter {
    pub fn new(min_qty: Decimal, max_qty: Decimal, step_size: Decimal) -> Self {
        Self {
            min_qty,
            max_qty,
            step_size,
        }
    }
}

/// MIN_NOTIONAL: floor for `price * quantity`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinNotionalFilter {
    #[serde(rename = "minNotional")]
    pub min_notional: Decimal,
    #[serde(rename = "applyToMarket", default, skip_serializing_if = "Option::is_none")]
    pub apply_to_market: Option<bool>,
    #[serde(rename = "avgPriceMins", default, skip_serializing_if = "Option::is_none")]
    pub avg_price_mins: Option<u32>,
}

impl MinNotionalFilter {
    pub fn new(min_notional: Decimal) -> Self {
        Self {
            min_notional,
            apply_to_market: None,
            avg_price_mins: None,
        }
    }
}

/// One entry of a symbol's `filters` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "filterType")]
pub enum SymbolFilter {
    #[serde(rename = "PRICE_FILTER")]
    Price(PriceFilter),
    #[serde(rename = "LOT_SIZE")]
    LotSize(LotSizeFilter),
    #[serde(rename = "MIN_NOTIONAL")]
    MinNotional(MinNotionalFilter),
    /// Any filter kind that does not constrain price or quantity directly
    #[serde(other)]
    Other,
}

impl From<PriceFilter> for SymbolFilter {
    fn from(filter: PriceFilter) -> Self {
        SymbolFilter::Price(filter)
    }
}

impl From<LotSizeFilter> for SymbolFilter {
    fn from(filter: LotSizeFilter) -> Self {
        SymbolFilter::LotSize(filter)
    }
}

impl From<MinNotionalFilter> for SymbolFilter {
    fn from(filter: MinNotionalFilter) -> Self {
        SymbolFilter::MinNotional(filter)
    }
}

/// The filters that apply to one quantization, borrowed from a symbol's list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveFilters<'a> {
    pub price: Option<&'a PriceFilter>,
    pub lot_size: Option<&'a LotSizeFilter>,
    pub min_notional: Option<&'a MinNotionalFilter>,
}

impl<'a> ActiveFilters<'a> {
    /// Pick the first filter of each kind. Later duplicates are ignored.
    pub fn select(filters: &'a [SymbolFilter]) -> Self {
        let mut active = Self::default();

        for filter in filters {
            match filter {
                SymbolFilter::Price(f) => {
                    active.price.get_or_insert(f);
                }
                SymbolFilter::LotSize(f) => {
                    active.lot_size.get_or_insert(f);
                }
                SymbolFilter::MinNotional(f) => {
                    active.min_notional.get_or_insert(f);
                }
                SymbolFilter::Other => {}
            }
        }

        active
    }

    pub fn is_empty(&self) -> bool {
        self.price.is_none() && self.lot_size.is_none() && self.min_notional.is_none()
    }
}
