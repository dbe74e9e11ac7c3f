//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use rmm_quoter_engine::prelude::*;
//! ```

// Quoter
pub use crate::quoter::{SwapQuote, SwapQuoter};

// Boundary calculators
pub use crate::max_swap::{max_delta_in, max_delta_out};

// Reference pricing
pub use crate::pricing::{report_spot_price, target_reserves_given_price};

// Errors
pub use crate::error::QuoteError;

// Curve primitives
pub use rmm_quoter_curve::{CoveredCall, TradingFunction};

// Domain vocabulary
pub use rmm_quoter_domain::enums::SwapDirection;
pub use rmm_quoter_domain::error::FixedPointError;
pub use rmm_quoter_domain::pool::{CurveParameters, LIQUIDITY_DECIMALS, PoolState};
pub use rmm_quoter_domain::value_objects::{FixedPointValue, ImpliedPrice, Price};
