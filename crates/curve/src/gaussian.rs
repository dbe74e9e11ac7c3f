//! Standard normal distribution, closed form.
//!
//! These are the fast approximations the settlement layer evaluates
//! on-chain; quoting must reproduce their numerics, so they are implemented
//! here rather than delegated to a numerics library. The test suite bounds
//! them against an exact reference.

use std::f64::consts::SQRT_2;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Standard normal probability density.
#[must_use]
pub fn pdf(x: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Error function via the Abramowitz-Stegun 7.1.26 rational polynomial.
///
/// Absolute error below 1.5e-7 over the whole real line.
#[must_use]
pub fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

/// Standard normal cumulative distribution.
#[must_use]
pub fn cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / SQRT_2))
}

/// Standard normal quantile (inverse CDF).
///
/// Acklam's rational approximation with one Halley refinement step.
/// `quantile(0)` and `quantile(1)` evaluate to the -inf/+inf limits so that
/// curve states sitting exactly on a reserve bound remain computable;
/// arguments outside `[0, 1]` yield NaN.
#[must_use]
pub fn quantile(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969_683_028_665_376e1,
        2.209_460_984_245_205e2,
        -2.759_285_104_469_687e2,
        1.383_577_518_672_690e2,
        -3.066_479_806_614_716e1,
        2.506_628_277_459_239,
    ];
    const B: [f64; 5] = [
        -5.447_609_879_822_406e1,
        1.615_858_368_580_409e2,
        -1.556_989_798_598_866e2,
        6.680_131_188_771_972e1,
        -1.328_068_155_288_572e1,
    ];
    const C: [f64; 6] = [
        -7.784_894_002_430_293e-3,
        -3.223_964_580_411_365e-1,
        -2.400_758_277_161_838,
        -2.549_732_539_343_734,
        4.374_664_141_464_968,
        2.938_163_982_698_783,
    ];
    const D: [f64; 4] = [
        7.784_695_709_041_462e-3,
        3.224_671_290_700_398e-1,
        2.445_134_137_142_996,
        3.754_408_661_907_416,
    ];
    const P_LOW: f64 = 0.02425;
    const P_HIGH: f64 = 1.0 - P_LOW;

    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }

    let x = if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= P_HIGH {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -((((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0))
    };

    // Halley refinement against the CDF above keeps the quantile consistent
    // with this module's own erf polynomial. Skipped when the density has
    // underflowed to zero in the extreme tails.
    let d = pdf(x);
    if d == 0.0 {
        return x;
    }
    let u = (cdf(x) - p) / d;
    x - u / (1.0 + x * u / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use statrs::distribution::{ContinuousCDF, Normal};

    fn reference() -> Normal {
        Normal::new(0.0, 1.0).unwrap()
    }

    #[test]
    fn test_cdf_against_reference() {
        let n = reference();
        let mut x = -6.0;
        while x <= 6.0 {
            let got = cdf(x);
            let want = n.cdf(x);
            assert!(
                (got - want).abs() < 2e-7,
                "cdf({x}) = {got}, reference {want}"
            );
            x += 0.01;
        }
    }

    #[test]
    fn test_quantile_against_reference() {
        // The quantile is consistent with this module's own cdf, so its
        // distance from the exact inverse grows as cdf error over pdf;
        // 1e-4 covers the worst case at the edges of this range.
        let n = reference();
        let mut p = 1e-3;
        while p < 1.0 - 1e-3 {
            let got = quantile(p);
            let want = n.inverse_cdf(p);
            assert!(
                (got - want).abs() < 1e-4,
                "quantile({p}) = {got}, reference {want}"
            );
            p += 1e-3;
        }
    }

    #[test]
    fn test_quantile_roundtrip() {
        for i in 1..100 {
            let p = f64::from(i) / 100.0;
            let r = cdf(quantile(p));
            assert!((r - p).abs() < 1e-9, "roundtrip at {p} gave {r}");
        }
    }

    #[test]
    fn test_quantile_limits() {
        assert_eq!(quantile(0.0), f64::NEG_INFINITY);
        assert_eq!(quantile(1.0), f64::INFINITY);
        assert!(quantile(-0.1).is_nan());
        assert!(quantile(1.1).is_nan());
        assert!(quantile(f64::NAN).is_nan());
    }

    #[test]
    fn test_cdf_limits() {
        assert_eq!(cdf(f64::INFINITY), 1.0);
        assert_eq!(cdf(f64::NEG_INFINITY), 0.0);
        assert!((cdf(0.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_pdf_symmetry() {
        assert!((pdf(1.5) - pdf(-1.5)).abs() < 1e-15);
        assert!((pdf(0.0) - FRAC_1_SQRT_2PI).abs() < 1e-15);
    }
}
