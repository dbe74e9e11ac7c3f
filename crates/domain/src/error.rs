use thiserror::Error;

/// Errors raised by fixed-point arithmetic on [`FixedPointValue`].
///
/// All operations are checked: they return an error instead of panicking or
/// silently wrapping.
///
/// [`FixedPointValue`]: crate::value_objects::fixed_point::FixedPointValue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FixedPointError {
    /// Two values with different decimal precisions were combined without an
    /// explicit rescale.
    #[error("decimal precision mismatch: {lhs} vs {rhs}")]
    PrecisionMismatch { lhs: u8, rhs: u8 },
    /// The operation would produce a negative amount, which a
    /// `FixedPointValue` cannot represent.
    #[error("operation would produce a negative amount")]
    NegativeResult,
    /// The result is outside the representable numeric range.
    #[error("arithmetic overflow in fixed-point operation")]
    Overflow,
    /// Division by a zero amount or scalar.
    #[error("division by zero")]
    DivisionByZero,
    /// Decimal precision above the supported maximum of 18.
    #[error("precision {0} exceeds the supported maximum of 18 decimals")]
    UnsupportedPrecision(u8),
}
