//! The swap quoting pipeline.
//!
//! All four operations (exact risky-in, exact stable-in, exact risky-out,
//! exact stable-out) run through one shared sequence: validate, normalize,
//! compute the pre-trade invariant, apply the fee-adjusted delta to the
//! known side, invert the curve for the unknown side, de-normalize, derive
//! the flow, and re-check the invariant on the actual post-trade reserves.
//! Direction and mode only select which reserve is adjusted, which inverse
//! is called, and where the fee lands.

use rmm_quoter_curve::TradingFunction;
use rmm_quoter_domain::enums::SwapDirection;
use rmm_quoter_domain::error::FixedPointError;
use rmm_quoter_domain::pool::{LIQUIDITY_DECIMALS, PoolState};
use rmm_quoter_domain::value_objects::fixed_point::FixedPointValue;
use rmm_quoter_domain::value_objects::price::ImpliedPrice;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::QuoteError;

/// Relative tolerance for float noise when a computed flow lands a hair
/// below zero, and for the post-trade invariant comparison. Real violations
/// exceed this by many orders of magnitude; accumulated f64 rounding never
/// does.
const NUMERIC_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 12);
const INVARIANT_TOLERANCE: f64 = 1e-12;

/// Result of a quoting operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwapQuote {
    /// The computed output (exact-in) or gross required input (exact-out),
    /// at the asset's native decimals.
    pub amount: FixedPointValue,
    /// Trading-function value on the post-trade reserves.
    pub invariant_after: f64,
    /// Stable-denominated flow over risky-denominated flow; infinite for a
    /// zero-input trade.
    pub implied_price: ImpliedPrice,
}

/// Quoting engine, generic over the curve primitives so tests can
/// substitute an exact solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapQuoter<C: TradingFunction> {
    curve: C,
}

#[derive(Clone, Copy)]
enum TradeSize {
    ExactIn(Decimal),
    ExactOut(Decimal),
}

impl<C: TradingFunction> SwapQuoter<C> {
    #[must_use]
    pub fn new(curve: C) -> Self {
        Self { curve }
    }

    /// Quotes the amount received for an exact amount paid in.
    ///
    /// The fee is deducted from the input before it reaches the curve; the
    /// full input still enters the reserves.
    pub fn quote_exact_in(
        &self,
        pool: &PoolState,
        direction: SwapDirection,
        amount_in: Decimal,
    ) -> Result<SwapQuote, QuoteError> {
        self.quote(pool, direction, TradeSize::ExactIn(amount_in))
    }

    /// Quotes the gross amount that must be paid in for an exact amount out.
    ///
    /// The fee is applied to the computed input (divided by gamma), not to
    /// the amount removed from reserves.
    pub fn quote_exact_out(
        &self,
        pool: &PoolState,
        direction: SwapDirection,
        amount_out: Decimal,
    ) -> Result<SwapQuote, QuoteError> {
        self.quote(pool, direction, TradeSize::ExactOut(amount_out))
    }

    fn quote(
        &self,
        pool: &PoolState,
        direction: SwapDirection,
        size: TradeSize,
    ) -> Result<SwapQuote, QuoteError> {
        let size_value = match size {
            TradeSize::ExactIn(v) | TradeSize::ExactOut(v) => v,
        };
        if size_value.is_sign_negative() && !size_value.is_zero() {
            return Err(QuoteError::InvalidAmount);
        }
        validate_pool(pool)?;

        let decimals_risky = pool.reserve_risky.decimals();
        let decimals_stable = pool.reserve_stable.decimals();
        let (decimals_in, decimals_out) = match direction {
            SwapDirection::RiskyToStable => (decimals_risky, decimals_stable),
            SwapDirection::StableToRisky => (decimals_stable, decimals_risky),
        };

        let reserve_risky = pool.reserve_risky.to_decimal()?;
        let reserve_stable = pool.reserve_stable.to_decimal()?;
        let liquidity = pool.liquidity.to_decimal()?;
        if liquidity.is_zero() {
            debug!("zero liquidity, per-unit normalization undefined");
            return Err(QuoteError::CurveDomain);
        }

        let strike = to_f64(pool.params.strike)?;
        let sigma = to_f64(pool.params.sigma)?;
        let tau = to_f64(pool.params.tau_years)?;
        let gamma = pool.params.gamma;

        // The invariant is recomputed on this calibration for every call;
        // a stale value would make the post-trade check meaningless.
        let risky_per_liq = arith(reserve_risky.checked_div(liquidity))?;
        let stable_per_liq = arith(reserve_stable.checked_div(liquidity))?;
        let k_before = self.curve.invariant(
            to_f64(risky_per_liq)?,
            to_f64(stable_per_liq)?,
            strike,
            sigma,
            tau,
            0.0,
        );
        if !k_before.is_finite() {
            debug!("pre-trade reserves outside curve domain");
            return Err(QuoteError::CurveDomain);
        }
        trace!(k_before, "pre-trade invariant");

        let amount = match size {
            TradeSize::ExactIn(v) => FixedPointValue::from_decimal(v, decimals_in)?,
            TradeSize::ExactOut(v) => FixedPointValue::from_decimal(v, decimals_out)?,
        };
        if amount.is_zero() {
            // Identity trade: nothing moves, invariant unchanged.
            let zero_decimals = match size {
                TradeSize::ExactIn(_) => decimals_out,
                TradeSize::ExactOut(_) => decimals_in,
            };
            return Ok(SwapQuote {
                amount: FixedPointValue::zero(zero_decimals)?,
                invariant_after: k_before,
                implied_price: ImpliedPrice::Infinite,
            });
        }
        let amount_value = amount.to_decimal()?;
        debug!(?direction, %amount_value, exact_in = matches!(size, TradeSize::ExactIn(_)), "quoting swap");

        let (quote_amount, post_risky, post_stable, stable_flow, risky_flow) = match size {
            TradeSize::ExactIn(_) => {
                let fee_adjusted = arith(amount_value.checked_mul(gamma))?;
                match direction {
                    SwapDirection::RiskyToStable => {
                        let grown = arith(reserve_risky.checked_add(fee_adjusted))?;
                        let x_new = arith(grown.checked_div(liquidity))?;
                        // Checked in Decimal: one raw unit past the bound is
                        // below f64 resolution around 1.0.
                        if x_new > Decimal::ONE {
                            return Err(QuoteError::CurveDomain);
                        }
                        let stable_new_per = self
                            .curve
                            .stable_given_risky(to_f64(x_new)?, strike, sigma, tau, k_before)
                            .ok_or(QuoteError::CurveDomain)?;
                        let stable_new = denormalize(stable_new_per, liquidity, reserve_stable)?;
                        let output_value =
                            clamp_flow(arith(reserve_stable.checked_sub(stable_new))?, reserve_stable)?;
                        let output = FixedPointValue::from_decimal(output_value, decimals_out)?;
                        let output_value = output.to_decimal()?;
                        let post_risky = arith(reserve_risky.checked_add(amount_value))?;
                        check_risky_bound(post_risky, liquidity)?;
                        let post_stable = arith(reserve_stable.checked_sub(output_value))?;
                        (output, post_risky, post_stable, output_value, amount_value)
                    }
                    SwapDirection::StableToRisky => {
                        let grown = arith(reserve_stable.checked_add(fee_adjusted))?;
                        let y_new = arith(grown.checked_div(liquidity))?;
                        let risky_new_per = self
                            .curve
                            .risky_given_stable(to_f64(y_new)?, strike, sigma, tau, k_before)
                            .ok_or(QuoteError::CurveDomain)?;
                        let risky_new = denormalize(risky_new_per, liquidity, reserve_risky)?;
                        let output_value =
                            clamp_flow(arith(reserve_risky.checked_sub(risky_new))?, reserve_risky)?;
                        let output = FixedPointValue::from_decimal(output_value, decimals_out)?;
                        let output_value = output.to_decimal()?;
                        let post_stable = arith(reserve_stable.checked_add(amount_value))?;
                        let post_risky = arith(reserve_risky.checked_sub(output_value))?;
                        (output, post_risky, post_stable, amount_value, output_value)
                    }
                }
            }
            TradeSize::ExactOut(_) => {
                match direction {
                    // Exact stable-out: the trader pays risky.
                    SwapDirection::RiskyToStable => {
                        let shrunk = reserve_stable
                            .checked_sub(amount_value)
                            .filter(|v| !v.is_sign_negative())
                            .ok_or(QuoteError::NegativeResult)?;
                        let y_new = arith(shrunk.checked_div(liquidity))?;
                        let risky_new_per = self
                            .curve
                            .risky_given_stable(to_f64(y_new)?, strike, sigma, tau, k_before)
                            .ok_or(QuoteError::CurveDomain)?;
                        let risky_new = denormalize(risky_new_per, liquidity, reserve_risky)?;
                        let raw_input =
                            clamp_flow(arith(risky_new.checked_sub(reserve_risky))?, reserve_risky)?;
                        let gross = arith(raw_input.checked_div(gamma))?;
                        let input = FixedPointValue::from_decimal_ceil(gross, decimals_in)?;
                        let input_value = input.to_decimal()?;
                        let post_risky = arith(reserve_risky.checked_add(input_value))?;
                        check_risky_bound(post_risky, liquidity)?;
                        let post_stable = shrunk;
                        (input, post_risky, post_stable, amount_value, input_value)
                    }
                    // Exact risky-out: the trader pays stable.
                    SwapDirection::StableToRisky => {
                        let shrunk = reserve_risky
                            .checked_sub(amount_value)
                            .filter(|v| !v.is_sign_negative())
                            .ok_or(QuoteError::NegativeResult)?;
                        let x_new = arith(shrunk.checked_div(liquidity))?;
                        let stable_new_per = self
                            .curve
                            .stable_given_risky(to_f64(x_new)?, strike, sigma, tau, k_before)
                            .ok_or(QuoteError::CurveDomain)?;
                        let stable_new = denormalize(stable_new_per, liquidity, reserve_stable)?;
                        let raw_input =
                            clamp_flow(arith(stable_new.checked_sub(reserve_stable))?, reserve_stable)?;
                        let gross = arith(raw_input.checked_div(gamma))?;
                        let input = FixedPointValue::from_decimal_ceil(gross, decimals_in)?;
                        let input_value = input.to_decimal()?;
                        let post_stable = arith(reserve_stable.checked_add(input_value))?;
                        let post_risky = shrunk;
                        (input, post_risky, post_stable, input_value, amount_value)
                    }
                }
            }
        };

        // Re-validate on the actual traded amounts, not the per-liquidity
        // intermediates.
        let k_after = self.curve.invariant(
            to_f64(arith(post_risky.checked_div(liquidity))?)?,
            to_f64(arith(post_stable.checked_div(liquidity))?)?,
            strike,
            sigma,
            tau,
            0.0,
        );
        if !k_after.is_finite() {
            debug!("post-trade reserves outside curve domain");
            return Err(QuoteError::CurveDomain);
        }
        let invariant_floor = k_before - INVARIANT_TOLERANCE * k_before.abs().max(1.0);
        if k_after < invariant_floor {
            debug!(k_before, k_after, "quote rejected: invariant decreased");
            return Err(QuoteError::InvariantViolation);
        }
        trace!(k_after, "post-trade invariant");

        let implied_price = if risky_flow.is_zero() {
            ImpliedPrice::Infinite
        } else {
            ImpliedPrice::Finite(arith(stable_flow.checked_div(risky_flow))?)
        };

        Ok(SwapQuote {
            amount: quote_amount,
            invariant_after: k_after,
            implied_price,
        })
    }
}

/// Shared pool validation for the quoter and the boundary calculators.
pub(crate) fn validate_pool(pool: &PoolState) -> Result<(), QuoteError> {
    pool.params.validate().map_err(|reason| {
        debug!(reason, "calibration rejected");
        QuoteError::CurveDomain
    })?;
    if pool.liquidity.decimals() != LIQUIDITY_DECIMALS {
        return Err(FixedPointError::PrecisionMismatch {
            lhs: pool.liquidity.decimals(),
            rhs: LIQUIDITY_DECIMALS,
        }
        .into());
    }
    Ok(())
}

pub(crate) fn to_f64(value: Decimal) -> Result<f64, QuoteError> {
    match value.to_f64() {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(QuoteError::CurveDomain),
    }
}

pub(crate) fn arith(value: Option<Decimal>) -> Result<Decimal, QuoteError> {
    value.ok_or(QuoteError::Math(FixedPointError::Overflow))
}

/// Scales a solved per-liquidity reserve back to the full amount. A solved
/// reserve meaningfully below zero is an inconsistent state, not noise.
fn denormalize(
    per_liquidity: f64,
    liquidity: Decimal,
    reference: Decimal,
) -> Result<Decimal, QuoteError> {
    let per_liquidity = Decimal::from_f64(per_liquidity).ok_or(QuoteError::CurveDomain)?;
    let full = arith(per_liquidity.checked_mul(liquidity))?;
    clamp_flow(full, reference)
}

/// Accepts a non-negative delta, forgives sub-tolerance float noise below
/// zero, and rejects anything meaningfully negative.
fn clamp_flow(delta: Decimal, reference: Decimal) -> Result<Decimal, QuoteError> {
    if !delta.is_sign_negative() {
        return Ok(delta);
    }
    let tolerance = reference.abs() * NUMERIC_TOLERANCE;
    if -delta <= tolerance {
        Ok(Decimal::ZERO)
    } else {
        Err(QuoteError::NegativeResult)
    }
}

/// The risky reserve may never exceed one per unit of liquidity. Checked in
/// Decimal because one raw unit past the bound is below f64 resolution.
fn check_risky_bound(post_risky: Decimal, liquidity: Decimal) -> Result<(), QuoteError> {
    if arith(post_risky.checked_div(liquidity))? > Decimal::ONE {
        Err(QuoteError::CurveDomain)
    } else {
        Ok(())
    }
}
