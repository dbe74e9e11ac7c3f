//! Largest valid trade sizes before a reserve crosses a domain boundary.
//!
//! Collaborators call these independently to bound acceptable sizes before
//! asking for a quote.

use primitive_types::U256;
use rmm_quoter_domain::enums::SwapDirection;
use rmm_quoter_domain::pool::PoolState;
use rmm_quoter_domain::value_objects::fixed_point::FixedPointValue;
use rust_decimal::Decimal;

use crate::error::QuoteError;
use crate::quoter::{arith, validate_pool};

/// Largest exact-in deposit before the input-side reserve reaches its
/// domain bound: one per unit of liquidity on the risky side, the strike on
/// the stable side. A pool already sitting on the bound yields zero.
pub fn max_delta_in(
    pool: &PoolState,
    direction: SwapDirection,
) -> Result<FixedPointValue, QuoteError> {
    validate_pool(pool)?;
    let liquidity = pool.liquidity.to_decimal()?;
    if liquidity.is_zero() {
        return Err(QuoteError::CurveDomain);
    }

    let (reserve, bound) = match direction {
        SwapDirection::RiskyToStable => (&pool.reserve_risky, Decimal::ONE),
        SwapDirection::StableToRisky => (&pool.reserve_stable, pool.params.strike),
    };
    let per_liquidity = arith(reserve.to_decimal()?.checked_div(liquidity))?;
    let room = (bound - per_liquidity).max(Decimal::ZERO);
    let amount = arith(room.checked_mul(liquidity))?;
    Ok(FixedPointValue::from_decimal(amount, reserve.decimals())?)
}

/// Largest exact-out withdrawal that keeps the opposite reserve strictly
/// positive: that reserve minus one raw unit.
pub fn max_delta_out(
    pool: &PoolState,
    direction: SwapDirection,
) -> Result<FixedPointValue, QuoteError> {
    validate_pool(pool)?;
    let opposite = match direction {
        SwapDirection::RiskyToStable => pool.reserve_stable,
        SwapDirection::StableToRisky => pool.reserve_risky,
    };
    let one_unit = FixedPointValue::new(U256::one(), opposite.decimals())?;
    opposite
        .checked_sub(&one_unit)
        .map_err(|_| QuoteError::NegativeResult)
}
