//! Reference-price helpers built on the curve's spot-price and delta
//! primitives.

use rmm_quoter_curve::TradingFunction;
use rmm_quoter_domain::error::FixedPointError;
use rmm_quoter_domain::pool::{CurveParameters, LIQUIDITY_DECIMALS, PoolState};
use rmm_quoter_domain::value_objects::fixed_point::FixedPointValue;
use rmm_quoter_domain::value_objects::price::Price;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::debug;

use crate::error::QuoteError;
use crate::quoter::{arith, to_f64, validate_pool};

/// Spot price of the risky asset in stable terms at the pool's current
/// per-liquidity reserves.
pub fn report_spot_price<C: TradingFunction>(
    curve: &C,
    pool: &PoolState,
) -> Result<Price, QuoteError> {
    validate_pool(pool)?;
    let liquidity = pool.liquidity.to_decimal()?;
    if liquidity.is_zero() {
        return Err(QuoteError::CurveDomain);
    }
    let risky_per_liq = arith(pool.reserve_risky.to_decimal()?.checked_div(liquidity))?;

    let spot = curve.spot_price(
        to_f64(risky_per_liq)?,
        to_f64(pool.params.strike)?,
        to_f64(pool.params.sigma)?,
        to_f64(pool.params.tau_years)?,
    );
    if !spot.is_finite() {
        debug!(spot, "spot price undefined at current reserves");
        return Err(QuoteError::CurveDomain);
    }
    Ok(Price::new(
        Decimal::from_f64(spot).ok_or(QuoteError::CurveDomain)?,
    ))
}

/// Reserves a pool calibrated to `params` should hold at an external
/// reference price, scaled by `liquidity`.
///
/// The risky side is one minus the option delta at that price; the stable
/// side solves through the trading function at invariant zero.
pub fn target_reserves_given_price<C: TradingFunction>(
    curve: &C,
    params: &CurveParameters,
    reference_price: Price,
    liquidity: FixedPointValue,
    decimals_risky: u8,
    decimals_stable: u8,
) -> Result<(FixedPointValue, FixedPointValue), QuoteError> {
    params.validate().map_err(|reason| {
        debug!(reason, "calibration rejected");
        QuoteError::CurveDomain
    })?;
    if liquidity.decimals() != LIQUIDITY_DECIMALS {
        return Err(FixedPointError::PrecisionMismatch {
            lhs: liquidity.decimals(),
            rhs: LIQUIDITY_DECIMALS,
        }
        .into());
    }
    let liquidity = liquidity.to_decimal()?;

    let strike = to_f64(params.strike)?;
    let sigma = to_f64(params.sigma)?;
    let tau = to_f64(params.tau_years)?;

    let delta = curve.option_delta(strike, sigma, tau, to_f64(reference_price.value)?);
    if !delta.is_finite() || !(0.0..=1.0).contains(&delta) {
        return Err(QuoteError::CurveDomain);
    }
    let risky_per_liq = 1.0 - delta;
    let stable_per_liq = curve
        .stable_given_risky(risky_per_liq, strike, sigma, tau, 0.0)
        .ok_or(QuoteError::CurveDomain)?;

    let scale = |per_liq: f64, decimals: u8| -> Result<FixedPointValue, QuoteError> {
        let value = Decimal::from_f64(per_liq).ok_or(QuoteError::CurveDomain)?;
        Ok(FixedPointValue::from_decimal(
            arith(value.checked_mul(liquidity))?,
            decimals,
        )?)
    };
    Ok((
        scale(risky_per_liq, decimals_risky)?,
        scale(stable_per_liq, decimals_stable)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmm_quoter_curve::CoveredCall;
    use rust_decimal_macros::dec;

    fn params() -> CurveParameters {
        CurveParameters::new(dec!(1000), dec!(1.0), dec!(1.0), dec!(0.99))
    }

    fn pool(risky: Decimal, liquidity: Decimal) -> PoolState {
        PoolState::new(
            FixedPointValue::from_decimal(risky, 18).unwrap(),
            FixedPointValue::from_decimal(dec!(500), 18).unwrap(),
            FixedPointValue::from_decimal(liquidity, 18).unwrap(),
            params(),
        )
    }

    #[test]
    fn test_spot_price_at_half_risky() {
        // strike * exp(Phi^-1(0.5) * vol - vol^2 / 2) = 1000 * exp(-0.5).
        let spot = report_spot_price(&CoveredCall, &pool(dec!(0.5), dec!(1))).unwrap();
        assert!(
            spot.value > dec!(600) && spot.value < dec!(612),
            "spot was {spot}"
        );
    }

    #[test]
    fn test_spot_price_zero_liquidity() {
        let err = report_spot_price(&CoveredCall, &pool(dec!(0.5), dec!(0))).unwrap_err();
        assert_eq!(err, QuoteError::CurveDomain);
    }

    #[test]
    fn test_target_reserves_round_trip_spot() {
        // The delta at the pool's own spot price reproduces its risky
        // reserve; the stable side lands on the curve at invariant zero.
        let pool = pool(dec!(0.5), dec!(1));
        let spot = report_spot_price(&CoveredCall, &pool).unwrap();
        let liquidity = FixedPointValue::from_decimal(dec!(1), 18).unwrap();

        let (risky, stable) =
            target_reserves_given_price(&CoveredCall, &params(), spot, liquidity, 18, 18).unwrap();

        let risky = risky.to_decimal().unwrap();
        assert!(
            (risky - dec!(0.5)).abs() < dec!(0.001),
            "risky target was {risky}"
        );
        // 1000 * Phi(-1) ~= 158.66.
        let stable = stable.to_decimal().unwrap();
        assert!(
            (stable - dec!(158.66)).abs() < dec!(0.5),
            "stable target was {stable}"
        );
    }

    #[test]
    fn test_target_reserves_invalid_price() {
        let liquidity = FixedPointValue::from_decimal(dec!(1), 18).unwrap();
        let err = target_reserves_given_price(
            &CoveredCall,
            &params(),
            Price::new(Decimal::ZERO),
            liquidity,
            18,
            18,
        )
        .unwrap_err();
        assert_eq!(err, QuoteError::CurveDomain);
    }
}
