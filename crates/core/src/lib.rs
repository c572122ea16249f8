//! # OrderGrid Core
//!
//! Exact decimal primitives shared by the exchange integrations.
//!
//! ## Principles
//!
//! 1. **Fixed-point arithmetic** - every price and quantity is a `Decimal`
//! 2. **No silent floats** - binary floats pass through an 8-decimal text form
//! 3. **Explicit rounding** - every rounding step names its direction
//! 4. **Unified logging** - `tracing` everywhere, one subscriber

pub mod decimal;
pub mod logging;

// Re-export commonly used items
pub use decimal::{decimal_places, round_to_dp, DecimalError, RawValue, RoundingDirection};
pub use logging::{init_logging, init_logging_with_default};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::decimal::{
        decimal_places, round_to_dp, DecimalError, RawValue, RoundingDirection,
    };
    pub use crate::logging::{init_logging, init_logging_with_default};

    // Common external types
    pub use rust_decimal::Decimal;
    pub use serde::{Deserialize, Serialize};
}
