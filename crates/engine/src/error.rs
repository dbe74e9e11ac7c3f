use rmm_quoter_domain::error::FixedPointError;
use thiserror::Error;

/// Failures of a single quote computation.
///
/// All variants are terminal for the call: the inputs caused them, so
/// nothing is retried and no partial result is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuoteError {
    /// The trade size is negative.
    #[error("trade size must be non-negative")]
    InvalidAmount,
    /// The trade pushes a reserve outside the curve's valid domain, a
    /// normalization produced a non-finite value, or the calibration
    /// parameters themselves are out of range.
    #[error("requested trade leaves the trading curve's domain")]
    CurveDomain,
    /// A computed flow or solved reserve is negative.
    #[error("computed amount is negative")]
    NegativeResult,
    /// The post-trade invariant is below the pre-trade invariant. A quote
    /// that would make the pool worse off is never returned.
    #[error("post-trade invariant fell below the pre-trade invariant")]
    InvariantViolation,
    /// Fixed-point arithmetic failure (precision mismatch, overflow).
    #[error(transparent)]
    Math(#[from] FixedPointError),
}
