use crate::value_objects::fixed_point::FixedPointValue;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Decimal precision liquidity always uses.
pub const LIQUIDITY_DECIMALS: u8 = 18;

/// Calibration of the covered-call trading curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveParameters {
    /// Strike price, denominated like the stable asset's spot price.
    pub strike: Decimal,
    /// Implied volatility, annualized.
    pub sigma: Decimal,
    /// Time to expiry in years.
    pub tau_years: Decimal,
    /// Fee complement; `1 - gamma` is the fee rate charged on trades.
    pub gamma: Decimal,
}

impl CurveParameters {
    #[must_use]
    pub fn new(strike: Decimal, sigma: Decimal, tau_years: Decimal, gamma: Decimal) -> Self {
        Self {
            strike,
            sigma,
            tau_years,
            gamma,
        }
    }

    /// Checks the calibration lies in the curve's parameter domain.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.strike <= Decimal::ZERO {
            return Err("strike must be positive");
        }
        if self.sigma <= Decimal::ZERO {
            return Err("sigma must be positive");
        }
        if self.tau_years < Decimal::ZERO {
            return Err("tau must be non-negative");
        }
        if self.gamma <= Decimal::ZERO || self.gamma > Decimal::ONE {
            return Err("gamma must lie in (0, 1]");
        }
        Ok(())
    }
}

/// Snapshot of a pool at quoting time.
///
/// Reserves carry their assets' native decimal precisions; liquidity is
/// always at 18 decimals. The quoting engine reasons about reserves per unit
/// of liquidity before evaluating the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    /// Risky-asset reserve.
    pub reserve_risky: FixedPointValue,
    /// Stable-asset reserve.
    pub reserve_stable: FixedPointValue,
    /// Total claim units on the pool, at 18 decimals.
    pub liquidity: FixedPointValue,
    /// Curve calibration this pool trades on.
    pub params: CurveParameters,
}

impl PoolState {
    #[must_use]
    pub fn new(
        reserve_risky: FixedPointValue,
        reserve_stable: FixedPointValue,
        liquidity: FixedPointValue,
        params: CurveParameters,
    ) -> Self {
        Self {
            reserve_risky,
            reserve_stable,
            liquidity,
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_calibration() {
        let good = CurveParameters::new(dec!(1000), dec!(1.0), dec!(1.0), dec!(0.99));
        assert!(good.validate().is_ok());

        let bad_strike = CurveParameters::new(dec!(0), dec!(1.0), dec!(1.0), dec!(0.99));
        assert!(bad_strike.validate().is_err());

        let bad_gamma = CurveParameters::new(dec!(1000), dec!(1.0), dec!(1.0), dec!(1.01));
        assert!(bad_gamma.validate().is_err());

        // gamma == 1 (no fee) is allowed.
        let no_fee = CurveParameters::new(dec!(1000), dec!(1.0), dec!(1.0), dec!(1));
        assert!(no_fee.validate().is_ok());
    }
}
