//! Inverse standard normal CDF for the sampling hot path.

/// Acklam's rational approximation of `Φ⁻¹(p)` (relative error below 1.2e-9).
///
/// Returns `NaN` outside `[0, 1]` and `∓∞` at the endpoints.
#[inline]
pub fn inverse_normal_cdf(p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }

    const A: [f64; 6] = [
        -3.969_683_028_665_376e1,
        2.209_460_984_245_205e2,
        -2.759_285_104_469_687e2,
        1.383_577_518_672_69e2,
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
    const P_LOW: f64 = 0.024_25;

    let tail = |q: f64| {
        C[0].mul_add(q, C[1])
            .mul_add(q, C[2])
            .mul_add(q, C[3])
            .mul_add(q, C[4])
            .mul_add(q, C[5])
            / D[0].mul_add(q, D[1]).mul_add(q, D[2]).mul_add(q, D[3]).mul_add(q, 1.0)
    };

    if p < P_LOW {
        tail((-2.0 * p.ln()).sqrt())
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        A[0].mul_add(r, A[1])
            .mul_add(r, A[2])
            .mul_add(r, A[3])
            .mul_add(r, A[4])
            .mul_add(r, A[5])
            * q
            / B[0]
                .mul_add(r, B[1])
                .mul_add(r, B[2])
                .mul_add(r, B[3])
                .mul_add(r, B[4])
                .mul_add(r, 1.0)
    } else {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use statrs::distribution::{ContinuousCDF, Normal};

    #[test]
    fn matches_reference_quantiles() {
        let cases = [
            (0.05, -1.644_853_626_951_472_2),
            (0.5, 0.0),
            (0.95, 1.644_853_626_951_472_2),
            (0.975, 1.959_963_984_540_054),
            (0.001, -3.090_232_306_167_813_5),
        ];
        for (p, expected) in cases {
            assert_abs_diff_eq!(inverse_normal_cdf(p), expected, epsilon = 1.0e-8);
        }
    }

    #[test]
    fn round_trips_through_exact_cdf() {
        let normal = Normal::standard();
        for i in 1..1000 {
            let p = i as f64 / 1000.0;
            let back = normal.cdf(inverse_normal_cdf(p));
            assert_abs_diff_eq!(back, p, epsilon = 1.0e-8);
        }
    }

    #[test]
    fn handles_domain_edges() {
        assert!(inverse_normal_cdf(-0.1).is_nan());
        assert!(inverse_normal_cdf(f64::NAN).is_nan());
        assert_eq!(inverse_normal_cdf(0.0), f64::NEG_INFINITY);
        assert_eq!(inverse_normal_cdf(1.0), f64::INFINITY);
        assert!(inverse_normal_cdf(f64::EPSILON).is_finite());
    }
}
