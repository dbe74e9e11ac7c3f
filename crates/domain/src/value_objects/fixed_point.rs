use crate::error::FixedPointError;
use primitive_types::U256;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest decimal precision an amount may carry.
pub const MAX_DECIMALS: u8 = 18;

/// A non-negative decimal quantity stored as an integer scaled by an
/// explicit decimal precision (e.g. raw `1_500_000` at 6 decimals is `1.5`).
///
/// All arithmetic is checked. Combining two values requires equal precision;
/// use [`FixedPointValue::rescale`] to coerce explicitly. Scalar operations
/// keep the precision of the left-hand operand. A result below zero is an
/// error, never a wrapped value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedPointValue {
    raw: U256,
    decimals: u8,
}

fn scale_u256(decimals: u8) -> U256 {
    U256::from(10u64.pow(u32::from(decimals)))
}

fn scale_decimal(decimals: u8) -> Decimal {
    Decimal::from(10u64.pow(u32::from(decimals)))
}

impl FixedPointValue {
    /// Creates a value from an already-scaled raw integer.
    pub fn new(raw: U256, decimals: u8) -> Result<Self, FixedPointError> {
        if decimals > MAX_DECIMALS {
            return Err(FixedPointError::UnsupportedPrecision(decimals));
        }
        Ok(Self { raw, decimals })
    }

    /// Zero at the given precision.
    pub fn zero(decimals: u8) -> Result<Self, FixedPointError> {
        Self::new(U256::zero(), decimals)
    }

    /// Quantizes a decimal quantity at the given precision, truncating any
    /// excess fractional digits toward zero.
    ///
    /// Used for amounts the pool pays out, so rounding never overpays.
    pub fn from_decimal(value: Decimal, decimals: u8) -> Result<Self, FixedPointError> {
        Self::quantize(value, decimals, false)
    }

    /// Quantizes a decimal quantity at the given precision, rounding excess
    /// fractional digits up.
    ///
    /// Used for amounts the trader must supply, so rounding never
    /// undercharges.
    pub fn from_decimal_ceil(value: Decimal, decimals: u8) -> Result<Self, FixedPointError> {
        Self::quantize(value, decimals, true)
    }

    fn quantize(value: Decimal, decimals: u8, round_up: bool) -> Result<Self, FixedPointError> {
        if decimals > MAX_DECIMALS {
            return Err(FixedPointError::UnsupportedPrecision(decimals));
        }
        if value.is_sign_negative() && !value.is_zero() {
            return Err(FixedPointError::NegativeResult);
        }
        let scaled = value
            .checked_mul(scale_decimal(decimals))
            .ok_or(FixedPointError::Overflow)?;
        let scaled = if round_up { scaled.ceil() } else { scaled.trunc() };
        let raw = scaled.to_u128().ok_or(FixedPointError::Overflow)?;
        Ok(Self {
            raw: U256::from(raw),
            decimals,
        })
    }

    /// The raw integer representation.
    #[must_use]
    pub fn raw(&self) -> U256 {
        self.raw
    }

    /// The decimal precision tag.
    #[must_use]
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// The normalized decimal view (`raw / 10^decimals`), as handed to the
    /// curve primitives.
    pub fn to_decimal(&self) -> Result<Decimal, FixedPointError> {
        // U256 can exceed Decimal's 96-bit mantissa; going through the
        // string form surfaces that as an error instead of truncating.
        let raw = Decimal::from_str(&self.raw.to_string()).map_err(|_| FixedPointError::Overflow)?;
        raw.checked_div(scale_decimal(self.decimals))
            .ok_or(FixedPointError::Overflow)
    }

    fn ensure_same_precision(&self, other: &Self) -> Result<(), FixedPointError> {
        if self.decimals == other.decimals {
            Ok(())
        } else {
            Err(FixedPointError::PrecisionMismatch {
                lhs: self.decimals,
                rhs: other.decimals,
            })
        }
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self, FixedPointError> {
        self.ensure_same_precision(other)?;
        let raw = self
            .raw
            .checked_add(other.raw)
            .ok_or(FixedPointError::Overflow)?;
        Ok(Self {
            raw,
            decimals: self.decimals,
        })
    }

    pub fn checked_sub(&self, other: &Self) -> Result<Self, FixedPointError> {
        self.ensure_same_precision(other)?;
        let raw = self
            .raw
            .checked_sub(other.raw)
            .ok_or(FixedPointError::NegativeResult)?;
        Ok(Self {
            raw,
            decimals: self.decimals,
        })
    }

    /// Multiplies two quantities, keeping the shared precision.
    ///
    /// `raw = a.raw * b.raw / 10^decimals`, floored.
    pub fn checked_mul(&self, other: &Self) -> Result<Self, FixedPointError> {
        self.ensure_same_precision(other)?;
        let raw = self
            .raw
            .checked_mul(other.raw)
            .ok_or(FixedPointError::Overflow)?
            / scale_u256(self.decimals);
        Ok(Self {
            raw,
            decimals: self.decimals,
        })
    }

    /// Divides two quantities, keeping the shared precision.
    ///
    /// `raw = a.raw * 10^decimals / b.raw`, floored.
    pub fn checked_div(&self, other: &Self) -> Result<Self, FixedPointError> {
        self.ensure_same_precision(other)?;
        if other.raw.is_zero() {
            return Err(FixedPointError::DivisionByZero);
        }
        let raw = self
            .raw
            .checked_mul(scale_u256(self.decimals))
            .ok_or(FixedPointError::Overflow)?
            / other.raw;
        Ok(Self {
            raw,
            decimals: self.decimals,
        })
    }

    /// Multiplies by a plain scalar, preserving this value's precision.
    pub fn mul_scalar(&self, scalar: Decimal) -> Result<Self, FixedPointError> {
        let value = self
            .to_decimal()?
            .checked_mul(scalar)
            .ok_or(FixedPointError::Overflow)?;
        Self::from_decimal(value, self.decimals)
    }

    /// Divides by a plain scalar, preserving this value's precision.
    pub fn div_scalar(&self, scalar: Decimal) -> Result<Self, FixedPointError> {
        if scalar.is_zero() {
            return Err(FixedPointError::DivisionByZero);
        }
        let value = self
            .to_decimal()?
            .checked_div(scalar)
            .ok_or(FixedPointError::Overflow)?;
        Self::from_decimal(value, self.decimals)
    }

    /// Explicitly converts to another precision.
    ///
    /// Scaling up is exact; scaling down floors the dropped digits.
    pub fn rescale(&self, decimals: u8) -> Result<Self, FixedPointError> {
        if decimals > MAX_DECIMALS {
            return Err(FixedPointError::UnsupportedPrecision(decimals));
        }
        let raw = if decimals >= self.decimals {
            self.raw
                .checked_mul(scale_u256(decimals - self.decimals))
                .ok_or(FixedPointError::Overflow)?
        } else {
            self.raw / scale_u256(self.decimals - decimals)
        };
        Ok(Self { raw, decimals })
    }
}

impl fmt::Display for FixedPointValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_decimal() {
            Ok(d) => write!(f, "{d}"),
            Err(_) => write!(f, "{}e-{}", self.raw, self.decimals),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fp(value: Decimal, decimals: u8) -> FixedPointValue {
        FixedPointValue::from_decimal(value, decimals).unwrap()
    }

    #[test]
    fn test_from_decimal_truncates() {
        // 1.5 at 6 decimals -> raw 1_500_000; extra digits drop.
        let v = fp(dec!(1.5), 6);
        assert_eq!(v.raw(), U256::from(1_500_000u64));

        let v = fp(dec!(0.1234567891), 6);
        assert_eq!(v.raw(), U256::from(123_456u64));
    }

    #[test]
    fn test_from_decimal_ceil_rounds_up() {
        let v = FixedPointValue::from_decimal_ceil(dec!(0.1234561), 6).unwrap();
        assert_eq!(v.raw(), U256::from(123_457u64));

        // Exact values don't move.
        let v = FixedPointValue::from_decimal_ceil(dec!(0.123456), 6).unwrap();
        assert_eq!(v.raw(), U256::from(123_456u64));
    }

    #[test]
    fn test_negative_input_rejected() {
        let err = FixedPointValue::from_decimal(dec!(-1), 6).unwrap_err();
        assert_eq!(err, FixedPointError::NegativeResult);
    }

    #[test]
    fn test_unsupported_precision() {
        let err = FixedPointValue::new(U256::from(1u64), 19).unwrap_err();
        assert_eq!(err, FixedPointError::UnsupportedPrecision(19));
    }

    #[test]
    fn test_add_sub_same_precision() {
        let a = fp(dec!(2.5), 18);
        let b = fp(dec!(1.25), 18);

        let sum = a.checked_add(&b).unwrap();
        assert_eq!(sum.to_decimal().unwrap(), dec!(3.75));

        let diff = a.checked_sub(&b).unwrap();
        assert_eq!(diff.to_decimal().unwrap(), dec!(1.25));
    }

    #[test]
    fn test_sub_underflow_is_negative_result() {
        let a = fp(dec!(1), 18);
        let b = fp(dec!(2), 18);
        assert_eq!(
            a.checked_sub(&b).unwrap_err(),
            FixedPointError::NegativeResult
        );
    }

    #[test]
    fn test_precision_mismatch_rejected() {
        let a = fp(dec!(1), 18);
        let b = fp(dec!(1), 6);
        assert_eq!(
            a.checked_add(&b).unwrap_err(),
            FixedPointError::PrecisionMismatch { lhs: 18, rhs: 6 }
        );
    }

    #[test]
    fn test_mul_div() {
        // 2.5 * 4 = 10 at 6 decimals
        let a = fp(dec!(2.5), 6);
        let b = fp(dec!(4), 6);
        assert_eq!(a.checked_mul(&b).unwrap().to_decimal().unwrap(), dec!(10));

        // 10 / 4 = 2.5
        let c = fp(dec!(10), 6);
        assert_eq!(c.checked_div(&b).unwrap().to_decimal().unwrap(), dec!(2.5));
    }

    #[test]
    fn test_div_by_zero() {
        let a = fp(dec!(1), 6);
        let zero = FixedPointValue::zero(6).unwrap();
        assert_eq!(
            a.checked_div(&zero).unwrap_err(),
            FixedPointError::DivisionByZero
        );
    }

    #[test]
    fn test_scalar_ops_preserve_precision() {
        let a = fp(dec!(100), 6);
        let scaled = a.mul_scalar(dec!(0.99)).unwrap();
        assert_eq!(scaled.decimals(), 6);
        assert_eq!(scaled.to_decimal().unwrap(), dec!(99));

        let grossed = a.div_scalar(dec!(0.5)).unwrap();
        assert_eq!(grossed.to_decimal().unwrap(), dec!(200));

        assert_eq!(
            a.mul_scalar(dec!(-1)).unwrap_err(),
            FixedPointError::NegativeResult
        );
    }

    #[test]
    fn test_rescale() {
        // 1.5 at 6 decimals -> 18 decimals is exact.
        let a = fp(dec!(1.5), 6);
        let up = a.rescale(18).unwrap();
        assert_eq!(up.decimals(), 18);
        assert_eq!(up.to_decimal().unwrap(), dec!(1.5));

        // Scaling back down floors dropped digits.
        let b = fp(dec!(0.1234567), 18);
        let down = b.rescale(6).unwrap();
        assert_eq!(down.to_decimal().unwrap(), dec!(0.123456));
    }

    #[test]
    fn test_display() {
        let a = fp(dec!(1.25), 6);
        assert_eq!(a.to_string(), "1.25");
    }
}
