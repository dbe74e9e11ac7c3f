//! The covered-call trading function and its inverses.
//!
//! All functions operate on per-unit-of-liquidity reserves: the risky
//! reserve lives in `[0, 1]` and the stable reserve in `[0, strike]`
//! (shifted by the invariant). Out-of-domain inputs yield `None` or NaN so
//! a caller can reject the trade instead of propagating a wrong number.

use crate::gaussian;

/// Analytical primitives of the trading curve.
///
/// The quoting engine is generic over this trait so tests can substitute a
/// slow-but-exact solver for the production approximations.
pub trait TradingFunction {
    /// Trading-function value `k = y - strike * Phi(Phi^-1(1 - x) - sigma * sqrt(tau))`.
    ///
    /// `fee_adjustment` scales the risky reserve by `1 - fee_adjustment`
    /// before evaluation; quoting applies fees explicitly and always passes
    /// zero here. NaN when the adjusted risky reserve is outside `[0, 1]`.
    fn invariant(
        &self,
        risky_per_liq: f64,
        stable_per_liq: f64,
        strike: f64,
        sigma: f64,
        tau_years: f64,
        fee_adjustment: f64,
    ) -> f64;

    /// Solves the curve for the stable reserve:
    /// `y = strike * Phi(Phi^-1(1 - x) - sigma * sqrt(tau)) + k`.
    ///
    /// `None` when `x` is outside `[0, 1]` or the result is non-finite.
    fn stable_given_risky(
        &self,
        risky_per_liq: f64,
        strike: f64,
        sigma: f64,
        tau_years: f64,
        invariant: f64,
    ) -> Option<f64>;

    /// Solves the curve for the risky reserve:
    /// `x = 1 - Phi(Phi^-1((y - k) / strike) + sigma * sqrt(tau))`.
    ///
    /// `None` when `(y - k) / strike` is outside `[0, 1]` or the result is
    /// non-finite.
    fn risky_given_stable(
        &self,
        stable_per_liq: f64,
        strike: f64,
        sigma: f64,
        tau_years: f64,
        invariant: f64,
    ) -> Option<f64>;

    /// Reported spot price of the risky asset in stable terms:
    /// `strike * exp(Phi^-1(1 - x) * sigma * sqrt(tau) - sigma^2 * tau / 2)`.
    fn spot_price(&self, risky_per_liq: f64, strike: f64, sigma: f64, tau_years: f64) -> f64;

    /// Black-Scholes call delta `Phi(d1)` at an external reference price.
    ///
    /// Degenerates to the `price > strike` indicator when `sigma * sqrt(tau)`
    /// is zero. Always in `[0, 1]` for positive price and strike.
    fn option_delta(&self, strike: f64, sigma: f64, tau_years: f64, reference_price: f64) -> f64;
}

/// Production curve built on the settlement-layer Gaussian approximations.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoveredCall;

fn vol_to_expiry(sigma: f64, tau_years: f64) -> f64 {
    sigma * tau_years.sqrt()
}

impl TradingFunction for CoveredCall {
    fn invariant(
        &self,
        risky_per_liq: f64,
        stable_per_liq: f64,
        strike: f64,
        sigma: f64,
        tau_years: f64,
        fee_adjustment: f64,
    ) -> f64 {
        let x = risky_per_liq * (1.0 - fee_adjustment);
        if !(0.0..=1.0).contains(&x) {
            return f64::NAN;
        }
        let vol = vol_to_expiry(sigma, tau_years);
        stable_per_liq - strike * gaussian::cdf(gaussian::quantile(1.0 - x) - vol)
    }

    fn stable_given_risky(
        &self,
        risky_per_liq: f64,
        strike: f64,
        sigma: f64,
        tau_years: f64,
        invariant: f64,
    ) -> Option<f64> {
        if !(0.0..=1.0).contains(&risky_per_liq) {
            return None;
        }
        let vol = vol_to_expiry(sigma, tau_years);
        let stable = strike * gaussian::cdf(gaussian::quantile(1.0 - risky_per_liq) - vol) + invariant;
        stable.is_finite().then_some(stable)
    }

    fn risky_given_stable(
        &self,
        stable_per_liq: f64,
        strike: f64,
        sigma: f64,
        tau_years: f64,
        invariant: f64,
    ) -> Option<f64> {
        let moneyness = (stable_per_liq - invariant) / strike;
        if !(0.0..=1.0).contains(&moneyness) {
            return None;
        }
        let vol = vol_to_expiry(sigma, tau_years);
        let risky = 1.0 - gaussian::cdf(gaussian::quantile(moneyness) + vol);
        risky.is_finite().then_some(risky)
    }

    fn spot_price(&self, risky_per_liq: f64, strike: f64, sigma: f64, tau_years: f64) -> f64 {
        if !(0.0..=1.0).contains(&risky_per_liq) {
            return f64::NAN;
        }
        let vol = vol_to_expiry(sigma, tau_years);
        strike * (gaussian::quantile(1.0 - risky_per_liq) * vol - 0.5 * vol * vol).exp()
    }

    fn option_delta(&self, strike: f64, sigma: f64, tau_years: f64, reference_price: f64) -> f64 {
        if reference_price <= 0.0 || strike <= 0.0 {
            return f64::NAN;
        }
        let vol = vol_to_expiry(sigma, tau_years);
        if vol == 0.0 {
            // At expiry the delta is the exercise indicator.
            return if reference_price > strike { 1.0 } else { 0.0 };
        }
        let d1 = ((reference_price / strike).ln() + 0.5 * vol * vol) / vol;
        gaussian::cdf(d1)
    }
}
