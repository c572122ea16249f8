//! Exchange-specific error types
//!
//! `QuantizeError` is the narrow error of a single quantization call.
//! `ExchangeError` covers everything around it: decoding exchange metadata,
//! looking up symbols and loading configuration.

use ordergrid_core::decimal::DecimalError;
use rust_decimal::Decimal;
use std::fmt::{self, Display};
use thiserror::Error;

/// Result type for exchange operations
pub type Result<T> = std::result::Result<T, ExchangeError>;

/// Which order value failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueField {
    Price,
    Quantity,
}

impl Display for ValueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueField::Price => f.write_str("price"),
            ValueField::Quantity => f.write_str("quantity"),
        }
    }
}

/// Errors raised while quantizing one order value.
///
/// Neither kind is retryable with the same input. Callers must not fall back
/// to the unquantized value.
///
/// `InvalidValue` also reports an intermediate product or quotient that leaves
/// the decimal range while deriving a quantity (`quantity * price`,
/// `min_notional / price`). Both raw inputs may have parsed fine in that case;
/// `field` names the value being derived and the source carries the
/// overflowing expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantizeError {
    #[error("Invalid {field}: {source}")]
    InvalidValue {
        field: ValueField,
        source: DecimalError,
    },

    #[error("Division by zero: minimum notional {min_notional} cannot be met at a zero price")]
    DivisionByZero { min_notional: Decimal },
}

impl QuantizeError {
    pub(crate) fn invalid(field: ValueField, source: DecimalError) -> Self {
        Self::InvalidValue { field, source }
    }

    pub fn is_invalid_value(&self) -> bool {
        matches!(self, Self::InvalidValue { .. })
    }

    pub fn is_division_by_zero(&self) -> bool {
        matches!(self, Self::DivisionByZero { .. })
    }
}

/// Exchange operation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExchangeError {
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Quantization failed: {0}")]
    Quantize(#[from] QuantizeError),
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
