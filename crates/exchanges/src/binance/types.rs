//! Binance order request types
//!
//! The quantizer's output ends up here: a corrected price and quantity are
//! merged into the outgoing order parameters before the REST layer signs
//! and sends them.

use crate::quantizer::OrderValue;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Binance order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinanceOrderType {
    #[serde(rename = "LIMIT")]
    Limit,
    #[serde(rename = "MARKET")]
    Market,
    #[serde(rename = "STOP_LOSS")]
    StopLoss,
    #[serde(rename = "STOP_LOSS_LIMIT")]
    StopLossLimit,
    #[serde(rename = "TAKE_PROFIT")]
    TakeProfit,
    #[serde(rename = "TAKE_PROFIT_LIMIT")]
    TakeProfitLimit,
    #[serde(rename = "LIMIT_MAKER")]
    LimitMaker,
}

impl BinanceOrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinanceOrderType::Limit => "LIMIT",
            BinanceOrderType::Market => "MARKET",
            BinanceOrderType::StopLoss => "STOP_LOSS",
            BinanceOrderType::StopLossLimit => "STOP_LOSS_LIMIT",
            BinanceOrderType::TakeProfit => "TAKE_PROFIT",
            BinanceOrderType::TakeProfitLimit => "TAKE_PROFIT_LIMIT",
            BinanceOrderType::LimitMaker => "LIMIT_MAKER",
        }
    }

    /// Whether the exchange expects a `price` parameter for this type
    pub fn takes_price(&self) -> bool {
        matches!(
            self,
            BinanceOrderType::Limit
                | BinanceOrderType::StopLossLimit
                | BinanceOrderType::TakeProfitLimit
                | BinanceOrderType::LimitMaker
        )
    }
}

/// Binance order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinanceOrderSide {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
}

impl BinanceOrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinanceOrderSide::Buy => "BUY",
            BinanceOrderSide::Sell => "SELL",
        }
    }
}

/// Binance time in force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinanceTimeInForce {
    #[serde(rename = "GTC")]
    GoodTillCanceled,
    #[serde(rename = "IOC")]
    ImmediateOrCancel,
    #[serde(rename = "FOK")]
    FillOrKill,
}

impl BinanceTimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinanceTimeInForce::GoodTillCanceled => "GTC",
            BinanceTimeInForce::ImmediateOrCancel => "IOC",
            BinanceTimeInForce::FillOrKill => "FOK",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(BinanceOrderType, BinanceOrderSide, BinanceTimeInForce);

/// Parameters of a new order, prior to timestamping and signing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderParams {
    pub symbol: String,
    pub side: BinanceOrderSide,
    #[serde(rename = "type")]
    pub order_type: BinanceOrderType,
    #[serde(rename = "timeInForce", skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<BinanceTimeInForce>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

impl NewOrderParams {
    pub fn new(symbol: impl Into<String>, side: BinanceOrderSide, order_type: BinanceOrderType) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type,
            time_in_force: None,
            quantity: None,
            price: None,
        }
    }

    /// Limit order, good till canceled
    pub fn limit(symbol: impl Into<String>, side: BinanceOrderSide) -> Self {
        Self::new(symbol, side, BinanceOrderType::Limit)
            .with_time_in_force(BinanceTimeInForce::GoodTillCanceled)
    }

    pub fn with_time_in_force(mut self, time_in_force: BinanceTimeInForce) -> Self {
        self.time_in_force = Some(time_in_force);
        self
    }

    /// Merge a quantized price and quantity into the request.
    /// Order types that carry no price (e.g. MARKET) only take the quantity.
    pub fn with_order_value(mut self, value: &OrderValue) -> Self {
        self.quantity = Some(value.quantity.to_string());
        if self.order_type.takes_price() {
            self.price = Some(value.price.to_string());
        }
        self
    }

    /// Key/value pairs in the order the signing layer encodes them
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("symbol", self.symbol.clone()),
            ("side", self.side.to_string()),
            ("type", self.order_type.to_string()),
        ];

        if let Some(time_in_force) = self.time_in_force {
            pairs.push(("timeInForce", time_in_force.to_string()));
        }
        if let Some(quantity) = &self.quantity {
            pairs.push(("quantity", quantity.clone()));
        }
        if let Some(price) = &self.price {
            pairs.push(("price", price.clone()));
        }

        pairs
    }
}
