//! Order-value quantization
//!
//! Snaps a raw price and quantity onto the grids published in a symbol's
//! filters so the exchange accepts the order:
//!
//! 1. select the active PRICE_FILTER, LOT_SIZE and MIN_NOTIONAL rules
//! 2. clamp and align the price to the tick grid
//! 3. clamp the quantity, lift it over the minimum notional at the
//!    quantized price, then align it to the step grid
//!
//! Every step is exact decimal arithmetic. Each filter's precision is the
//! number of significant fractional digits of its own tick or step size.

use crate::errors::{ExchangeError, QuantizeError, Result, ValueField};
use crate::filters::{ActiveFilters, LotSizeFilter, MinNotionalFilter, PriceFilter, SymbolFilter};
use ordergrid_core::decimal::{decimal_places, round_to_dp, DecimalError, RawValue, RoundingDirection};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use tracing::{debug, trace, warn};

/// Rounding directions applied when values are cut to filter precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundingPolicy {
    #[serde(
        rename = "priceRounding",
        alias = "price_rounding",
        default = "default_price_rounding"
    )]
    pub price_rounding: RoundingDirection,
    #[serde(
        rename = "quantityRounding",
        alias = "quantity_rounding",
        default = "default_quantity_rounding"
    )]
    pub quantity_rounding: RoundingDirection,
}

fn default_price_rounding() -> RoundingDirection {
    RoundingDirection::HalfUp
}

fn default_quantity_rounding() -> RoundingDirection {
    RoundingDirection::Down
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        Self {
            price_rounding: default_price_rounding(),
            quantity_rounding: default_quantity_rounding(),
        }
    }
}

impl RoundingPolicy {
    pub const PRICE_ROUNDING_ENV: &'static str = "ORDERGRID_PRICE_ROUNDING";
    pub const QUANTITY_ROUNDING_ENV: &'static str = "ORDERGRID_QUANTITY_ROUNDING";

    pub fn new(price_rounding: RoundingDirection, quantity_rounding: RoundingDirection) -> Self {
        Self {
            price_rounding,
            quantity_rounding,
        }
    }

    pub fn with_price_rounding(mut self, direction: RoundingDirection) -> Self {
        self.price_rounding = direction;
        self
    }

    pub fn with_quantity_rounding(mut self, direction: RoundingDirection) -> Self {
        self.quantity_rounding = direction;
        self
    }

    /// Load from `ORDERGRID_PRICE_ROUNDING` / `ORDERGRID_QUANTITY_ROUNDING`.
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key/value source, e.g. a parsed `.env` map
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut policy = Self::default();

        if let Some(name) = lookup(Self::PRICE_ROUNDING_ENV) {
            policy.price_rounding = parse_direction(Self::PRICE_ROUNDING_ENV, &name)?;
        }
        if let Some(name) = lookup(Self::QUANTITY_ROUNDING_ENV) {
            policy.quantity_rounding = parse_direction(Self::QUANTITY_ROUNDING_ENV, &name)?;
        }

        debug!(
            "Rounding policy: price={}, quantity={}",
            policy.price_rounding, policy.quantity_rounding
        );
        Ok(policy)
    }
}

fn parse_direction(key: &str, name: &str) -> Result<RoundingDirection> {
    name.parse()
        .map_err(|e: DecimalError| ExchangeError::ConfigurationError(format!("{}: {}", key, e)))
}

/// A price/quantity pair, either raw input or quantized output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderValue {
    pub price: Decimal,
    pub quantity: Decimal,
}

impl OrderValue {
    pub fn new(price: Decimal, quantity: Decimal) -> Self {
        Self { price, quantity }
    }

    /// `price * quantity`, `None` on overflow
    pub fn notional(&self) -> Option<Decimal> {
        self.price.checked_mul(self.quantity)
    }

    /// Quantize this pair against a symbol's filters
    pub fn quantize(
        &self,
        filters: &[SymbolFilter],
        policy: &RoundingPolicy,
    ) -> std::result::Result<OrderValue, QuantizeError> {
        quantize(filters, self.price, self.quantity, policy)
    }
}

impl Display for OrderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.quantity, self.price)
    }
}

/// Quantize a raw price and quantity against a symbol's filter list.
///
/// Both inputs are validated before any filter logic runs. The price is
/// finalized first because the minimum-notional correction depends on it.
pub fn quantize<P, Q>(
    filters: &[SymbolFilter],
    price: P,
    quantity: Q,
    policy: &RoundingPolicy,
) -> std::result::Result<OrderValue, QuantizeError>
where
    P: Into<RawValue>,
    Q: Into<RawValue>,
{
    let price = price
        .into()
        .to_decimal()
        .map_err(|e| QuantizeError::invalid(ValueField::Price, e))?;
    let quantity = quantity
        .into()
        .to_decimal()
        .map_err(|e| QuantizeError::invalid(ValueField::Quantity, e))?;

    let active = ActiveFilters::select(filters);

    let quantized_price = quantize_price(price, active.price, policy.price_rounding);
    let quantized_quantity = quantize_quantity(
        quantity,
        quantized_price,
        active.lot_size,
        active.min_notional,
        policy.quantity_rounding,
    )?;

    trace!(
        "Quantized {} @ {} -> {} @ {}",
        quantity, price, quantized_quantity, quantized_price
    );

    Ok(OrderValue::new(quantized_price, quantized_quantity))
}

/// Clamp a price into the filter's bounds and align it to the tick grid.
/// Without a filter the price is returned unchanged, and a zero tick leaves
/// the clamped price as is.
pub fn quantize_price(
    price: Decimal,
    filter: Option<&PriceFilter>,
    rounding: RoundingDirection,
) -> Decimal {
    let Some(filter) = filter else {
        return price;
    };

    let price = clamp(price, filter.min_price, filter.max_price, "price");
    let Some(tick) = grid(filter.tick_size) else {
        return price;
    };

    let dp = decimal_places(tick);
    round_to_dp(price - price % tick, dp, rounding)
}

/// Clamp a quantity into the lot-size bounds, raise it to clear the minimum
/// notional at `price`, and align it to the step grid. Without a lot-size
/// filter the quantity is returned unchanged; a zero step skips the grid.
pub fn quantize_quantity(
    quantity: Decimal,
    price: Decimal,
    lot_size: Option<&LotSizeFilter>,
    min_notional: Option<&MinNotionalFilter>,
    rounding: RoundingDirection,
) -> std::result::Result<Decimal, QuantizeError> {
    let Some(lot_size) = lot_size else {
        return Ok(quantity);
    };

    let step = grid(lot_size.step_size);
    let mut quantity = clamp(quantity, lot_size.min_qty, lot_size.max_qty, "quantity");

    if let Some(min_notional) = min_notional {
        // Checked against the grid-aligned quantity, the value the order ends up with
        let aligned = match step {
            Some(step) => quantity - quantity % step,
            None => quantity,
        };
        let notional = aligned
            .checked_mul(price)
            .ok_or_else(|| out_of_range(format!("{} * {}", aligned, price)))?;

        if notional < min_notional.min_notional {
            quantity = lift_to_notional(price, step, quantity.scale(), min_notional, rounding)?;
            debug!(
                "Notional {} below minimum {}, quantity raised to {}",
                notional, min_notional.min_notional, quantity
            );

            if is_enabled(lot_size.max_qty) && quantity > lot_size.max_qty {
                warn!(
                    "Minimum notional {} at price {} needs quantity {} above max {}",
                    min_notional.min_notional, price, quantity, lot_size.max_qty
                );
            }
        }
    }

    let Some(step) = step else {
        return Ok(quantity);
    };

    let dp = decimal_places(step);
    Ok(round_to_dp(quantity - quantity % step, dp, rounding))
}

/// Smallest quantity on the step grid whose notional at `price` clears the
/// floor. Without a step grid the quotient is rounded up to `fallback_dp`.
fn lift_to_notional(
    price: Decimal,
    step: Option<Decimal>,
    fallback_dp: u32,
    min_notional: &MinNotionalFilter,
    rounding: RoundingDirection,
) -> std::result::Result<Decimal, QuantizeError> {
    let floor = min_notional.min_notional;
    if price.is_zero() {
        return Err(QuantizeError::DivisionByZero { min_notional: floor });
    }

    let required = floor
        .checked_div(price)
        .ok_or_else(|| out_of_range(format!("{} / {}", floor, price)))?;

    // Rounding down here could land under the floor
    let Some(step) = step else {
        return Ok(round_to_dp(required, fallback_dp, RoundingDirection::Up));
    };

    let dp = decimal_places(step);
    let quantity = round_to_dp(required, dp, RoundingDirection::Up);

    let remainder = quantity % step;
    if remainder > Decimal::ZERO {
        let lifted = quantity
            .checked_add(step - remainder)
            .ok_or_else(|| out_of_range(format!("{} + {} - {}", quantity, step, remainder)))?;
        return Ok(round_to_dp(lifted, dp, rounding));
    }

    Ok(quantity)
}

fn out_of_range(expression: String) -> QuantizeError {
    QuantizeError::invalid(ValueField::Quantity, DecimalError::OutOfRange(expression))
}

fn clamp(value: Decimal, min: Decimal, max: Decimal, what: &str) -> Decimal {
    if value < min {
        debug!("{} {} below minimum {}, clamping", what, value, min);
        return min;
    }
    if is_enabled(max) && value > max {
        debug!("{} {} above maximum {}, clamping", what, value, max);
        return max;
    }
    value
}

/// The grid size, or `None` when the rule is disabled
fn grid(size: Decimal) -> Option<Decimal> {
    is_enabled(size).then_some(size)
}

/// Exchanges publish zero to switch a rule off
fn is_enabled(limit: Decimal) -> bool {
    limit > Decimal::ZERO
}
