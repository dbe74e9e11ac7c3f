//! Analytical primitives for the covered-call trading curve.
//!
//! The quoting engine consumes these as pure functions over normalized
//! (per-unit-of-liquidity) floating values. The production implementation
//! uses the same closed-form Gaussian approximations as the settlement
//! layer; the [`TradingFunction`](trading_function::TradingFunction) trait
//! lets a test suite substitute an exact solver to bound approximation
//! error.

pub mod gaussian;
pub mod trading_function;

pub use trading_function::{CoveredCall, TradingFunction};
