//! Exact decimal primitives
//!
//! Parsing of raw order values, the precision implied by a tick or step size,
//! and the rounding directions used to snap a value onto a decimal grid.
//! Nothing in here touches binary floating point except the one documented
//! conversion in [`RawValue::Float`].

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Fractional digits used when a binary float is rendered to text
pub const FLOAT_TEXT_DP: usize = 8;

/// Decimal parsing and conversion errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecimalError {
    #[error("Invalid value: {0:?} is not a decimal number")]
    InvalidValue(String),
    #[error("Negative value: {0}")]
    Negative(Decimal),
    #[error("Non-finite value")]
    NonFinite,
    #[error("Value out of range: {0}")]
    OutOfRange(String),
    #[error("Unknown rounding direction: {0}")]
    UnknownRounding(String),
}

/// A price or quantity as the caller supplied it.
///
/// Text and typed decimals are taken as-is. A float is first rendered with
/// exactly [`FLOAT_TEXT_DP`] fractional digits and parsed back, so
/// `0.1 + 0.2` becomes `0.30000000` rather than inheriting the binary error.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Decimal(Decimal),
    Float(f64),
}

impl RawValue {
    /// Convert to a non-negative exact decimal
    pub fn to_decimal(&self) -> Result<Decimal, DecimalError> {
        let mut value = match self {
            RawValue::Text(text) => parse_text(text)?,
            RawValue::Decimal(value) => *value,
            RawValue::Float(value) => from_f64(*value)?,
        };

        if value.is_zero() {
            // "-0" parses with the sign bit set
            value.set_sign_positive(true);
        } else if value.is_sign_negative() {
            return Err(DecimalError::Negative(value));
        }

        Ok(value)
    }
}

fn parse_text(text: &str) -> Result<Decimal, DecimalError> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| DecimalError::InvalidValue(text.to_string()))
}

fn from_f64(value: f64) -> Result<Decimal, DecimalError> {
    if !value.is_finite() {
        return Err(DecimalError::NonFinite);
    }

    let text = format!("{:.*}", FLOAT_TEXT_DP, value);
    Decimal::from_str(&text).map_err(|_| DecimalError::OutOfRange(text))
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<&String> for RawValue {
    fn from(value: &String) -> Self {
        RawValue::Text(value.clone())
    }
}

impl From<Decimal> for RawValue {
    fn from(value: Decimal) -> Self {
        RawValue::Decimal(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(text) => write!(f, "{}", text),
            RawValue::Decimal(value) => write!(f, "{}", value),
            RawValue::Float(value) => write!(f, "{}", value),
        }
    }
}

/// Number of significant fractional digits in a grid size.
///
/// Exchanges publish sizes with trailing zeros (`"0.01000000"`), those do
/// not count: `0.01000000` gives 2 and `1.00000000` gives 0.
pub fn decimal_places(size: Decimal) -> u32 {
    size.normalize().scale()
}

/// Round to `dp` fractional digits and pad to exactly that scale
pub fn round_to_dp(value: Decimal, dp: u32, direction: RoundingDirection) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, direction.into());
    rounded.rescale(dp);
    rounded
}

/// Rounding direction applied when a value is cut to a grid's precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundingDirection {
    /// Away from zero
    Up,
    /// Toward zero
    Down,
    /// Nearest, ties away from zero
    HalfUp,
    /// Nearest, ties toward zero
    HalfDown,
    /// Nearest, ties to the even neighbour
    HalfEven,
    /// Toward positive infinity
    Ceiling,
    /// Toward negative infinity
    Floor,
}

impl RoundingDirection {
    pub const ALL: [RoundingDirection; 7] = [
        RoundingDirection::Up,
        RoundingDirection::Down,
        RoundingDirection::HalfUp,
        RoundingDirection::HalfDown,
        RoundingDirection::HalfEven,
        RoundingDirection::Ceiling,
        RoundingDirection::Floor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoundingDirection::Up => "up",
            RoundingDirection::Down => "down",
            RoundingDirection::HalfUp => "half-up",
            RoundingDirection::HalfDown => "half-down",
            RoundingDirection::HalfEven => "half-even",
            RoundingDirection::Ceiling => "ceiling",
            RoundingDirection::Floor => "floor",
        }
    }
}

impl From<RoundingDirection> for RoundingStrategy {
    fn from(direction: RoundingDirection) -> Self {
        match direction {
            RoundingDirection::Up => RoundingStrategy::AwayFromZero,
            RoundingDirection::Down => RoundingStrategy::ToZero,
            RoundingDirection::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingDirection::HalfDown => RoundingStrategy::MidpointTowardZero,
            RoundingDirection::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingDirection::Ceiling => RoundingStrategy::ToPositiveInfinity,
            RoundingDirection::Floor => RoundingStrategy::ToNegativeInfinity,
        }
    }
}

/// Accepts `half-up`, `half_up`, `HALF_UP` and the `ROUND_HALF_UP` spelling
/// used by exchange client libraries.
impl FromStr for RoundingDirection {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_uppercase().replace('-', "_");
        let name = name.strip_prefix("ROUND_").unwrap_or(&name);

        match name {
            "UP" => Ok(RoundingDirection::Up),
            "DOWN" => Ok(RoundingDirection::Down),
            "HALF_UP" => Ok(RoundingDirection::HalfUp),
            "HALF_DOWN" => Ok(RoundingDirection::HalfDown),
            "HALF_EVEN" => Ok(RoundingDirection::HalfEven),
            "CEIL" | "CEILING" => Ok(RoundingDirection::Ceiling),
            "FLOOR" => Ok(RoundingDirection::Floor),
            _ => Err(DecimalError::UnknownRounding(s.to_string())),
        }
    }
}

impl Display for RoundingDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RoundingDirection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RoundingDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
