//! Thin wrappers over statrs distributions.
//!
//! Constructors panic on invalid parameters; callers validate degrees of
//! freedom before reaching these helpers.

use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, Normal, StudentsT};

#[inline]
pub(crate) fn std_normal() -> Normal {
    Normal::new(0.0, 1.0).expect("valid standard normal")
}

/// CDF of the standard normal at x.
#[inline]
pub(crate) fn normal_cdf(x: f64) -> f64 {
    std_normal().cdf(x)
}

/// One-sided survival function for the standard normal:
/// SF(z) = 0.5 * erfc(z / sqrt(2))
#[inline]
pub(crate) fn normal_sf(z: f64) -> f64 {
    0.5 * statrs::function::erf::erfc(z / std::f64::consts::SQRT_2)
}

/// Inverse CDF (quantile) of the standard normal at probability p.
#[inline]
pub(crate) fn normal_quantile(p: f64) -> f64 {
    std_normal().inverse_cdf(p)
}

/// Upper-tail probability of Student's t(df) at value x.
#[inline]
pub(crate) fn t_sf(x: f64, df: f64) -> f64 {
    1.0 - StudentsT::new(0.0, 1.0, df).expect("valid df for t-distribution").cdf(x)
}

/// Upper-tail probability of the chi-squared(df) distribution at value x.
#[inline]
pub(crate) fn chi_squared_sf(x: f64, df: f64) -> f64 {
    1.0 - ChiSquared::new(df).expect("valid df for chi-squared").cdf(x)
}

/// Upper-tail probability of the F(d1, d2) distribution at value x.
#[inline]
pub(crate) fn f_sf(x: f64, d1: f64, d2: f64) -> f64 {
    1.0 - FisherSnedecor::new(d1, d2).expect("valid dof for F-distribution").cdf(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_sf_matches_cdf() {
        for &z in &[-2.0, -0.5, 0.0, 0.5, 1.96, 3.0] {
            let sf = normal_sf(z);
            let from_cdf = 1.0 - normal_cdf(z);
            assert!((sf - from_cdf).abs() < 1e-12, "z={z}: sf={sf}, 1-cdf={from_cdf}");
        }
    }

    #[test]
    fn test_normal_quantile_round_trip() {
        for &p in &[0.025, 0.25, 0.5, 0.75, 0.975] {
            let z = normal_quantile(p);
            assert!((normal_cdf(z) - p).abs() < 1e-8);
        }
    }

    #[test]
    fn test_t_sf_known_value() {
        // t(df=inf-like) at 1.96 approaches the normal tail 0.025.
        assert!((t_sf(1.96, 1e6) - 0.025).abs() < 1e-4);
    }
}
