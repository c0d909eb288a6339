//! Normality testing via the Shapiro-Wilk W statistic.
//!
//! Implements Royston's AS R94 algorithm: approximate weights from expected
//! normal order statistics (Blom scores), the W statistic as a squared
//! correlation, and a normalizing transformation of W to a standard normal
//! deviate for the p-value. Valid for 3 <= n <= ~5000.
//!
//! ## References
//!
//! - Shapiro SS, Wilk MB (1965). An analysis of variance test for normality
//!   (complete samples). *Biometrika* 52:591-611.
//! - Royston P (1995). Remark AS R94: A remark on Algorithm AS 181: The W-test
//!   for normality. *Applied Statistics* 44:547-551.

use crate::descriptive::{mean, validate_sample};
use crate::dist::{normal_quantile, normal_sf};
use cs_core::{Error, Result, TestOutcome};

// Polynomial coefficients from AS R94, ascending powers.

// Corrections to the two largest weights, polynomials in 1/sqrt(n).
const WEIGHT_N: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const WEIGHT_N1: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];

// Null mean/log-sd of the transformed W, 4 <= n <= 11 (polynomials in n).
const SMALL_GAMMA: [f64; 2] = [-2.273, 0.459];
const SMALL_MEAN: [f64; 4] = [0.5440, -0.39978, 0.025054, -0.0006714];
const SMALL_LOG_SD: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];

// Null mean/log-sd of ln(1 - W), n >= 12 (polynomials in ln n).
const LARGE_MEAN: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const LARGE_LOG_SD: [f64; 3] = [-0.4803, -0.082676, 0.0030302];

/// Evaluate a polynomial with ascending coefficients at x.
fn poly(coeffs: &[f64], x: f64) -> f64 {
    let mut acc = 0.0;
    for &c in coeffs.iter().rev() {
        acc = acc * x + c;
    }
    acc
}

/// Shapiro-Wilk test of the null hypothesis that `x` was drawn from a normal
/// distribution. Returns the W statistic and its p-value.
///
/// # Errors
/// Validation error for n < 3 or non-finite input; computation error for a
/// constant sample (zero spread).
pub fn shapiro_wilk(x: &[f64]) -> Result<TestOutcome> {
    validate_sample("sample", x)?;
    let n = x.len();
    if n < 3 {
        return Err(Error::Validation(format!(
            "Shapiro-Wilk requires at least 3 observations, got {n}"
        )));
    }

    let mut xs = x.to_vec();
    xs.sort_by(|a, b| a.total_cmp(b));
    if xs[n - 1] - xs[0] <= 0.0 {
        return Err(Error::Computation("sample is constant; W is undefined".to_string()));
    }

    let nf = n as f64;

    // Expected normal order statistics (Blom scores).
    let m: Vec<f64> =
        (0..n).map(|i| normal_quantile((i as f64 + 1.0 - 0.375) / (nf + 0.25))).collect();
    let m_sum_sq: f64 = m.iter().map(|v| v * v).sum();
    let rsn = 1.0 / nf.sqrt();

    // Approximate weights: polynomial-corrected endpoints, rescaled interior.
    let mut a = vec![0.0_f64; n];
    if n == 3 {
        a[0] = -std::f64::consts::FRAC_1_SQRT_2;
        a[2] = std::f64::consts::FRAC_1_SQRT_2;
    } else {
        let a_n = m[n - 1] / m_sum_sq.sqrt() + poly(&WEIGHT_N, rsn);
        if n > 5 {
            let a_n1 = m[n - 2] / m_sum_sq.sqrt() + poly(&WEIGHT_N1, rsn);
            let phi = (m_sum_sq - 2.0 * m[n - 1] * m[n - 1] - 2.0 * m[n - 2] * m[n - 2])
                / (1.0 - 2.0 * a_n * a_n - 2.0 * a_n1 * a_n1);
            let phi_sqrt = phi.sqrt();
            for i in 2..(n - 2) {
                a[i] = m[i] / phi_sqrt;
            }
            a[n - 1] = a_n;
            a[n - 2] = a_n1;
            a[0] = -a_n;
            a[1] = -a_n1;
        } else {
            let phi = (m_sum_sq - 2.0 * m[n - 1] * m[n - 1]) / (1.0 - 2.0 * a_n * a_n);
            let phi_sqrt = phi.sqrt();
            for i in 1..(n - 1) {
                a[i] = m[i] / phi_sqrt;
            }
            a[n - 1] = a_n;
            a[0] = -a_n;
        }
    }

    // W = (sum a_i x_(i))^2 / sum (x_i - xbar)^2
    let xbar = mean(&xs);
    let ssq: f64 = xs.iter().map(|v| (v - xbar) * (v - xbar)).sum();
    let num: f64 = a.iter().zip(&xs).map(|(ai, xi)| ai * xi).sum::<f64>();
    let w = ((num * num) / ssq).min(1.0);

    let p_value = shapiro_p_value(w, n);
    Ok(TestOutcome::new(w, p_value.clamp(0.0, 1.0)))
}

/// Transform W to a normal deviate and return the upper-tail probability.
fn shapiro_p_value(w: f64, n: usize) -> f64 {
    let nf = n as f64;
    if n == 3 {
        // Exact small-sample form.
        let p = 6.0 / std::f64::consts::PI * (w.sqrt().asin() - 0.75_f64.sqrt().asin());
        return p.clamp(0.0, 1.0);
    }

    let ln1mw = (1.0 - w).ln();
    if n <= 11 {
        let gamma = poly(&SMALL_GAMMA, nf);
        if ln1mw >= gamma {
            // W so small the transform is out of range; overwhelming evidence
            // against normality.
            return 0.0;
        }
        let y = -(gamma - ln1mw).ln();
        let mu = poly(&SMALL_MEAN, nf);
        let sigma = poly(&SMALL_LOG_SD, nf).exp();
        normal_sf((y - mu) / sigma)
    } else {
        let ln_n = nf.ln();
        let mu = poly(&LARGE_MEAN, ln_n);
        let sigma = poly(&LARGE_LOG_SD, ln_n).exp();
        normal_sf((ln1mw - mu) / sigma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Blom scores for n points; a sample shaped exactly like expected normal
    /// order statistics should look as normal as a sample of that size can.
    fn normal_scores(n: usize) -> Vec<f64> {
        let nf = n as f64;
        (0..n)
            .map(|i| crate::dist::normal_quantile((i as f64 + 1.0 - 0.375) / (nf + 0.25)))
            .collect()
    }

    #[test]
    fn test_normal_scores_not_rejected() {
        for n in [10, 20, 50] {
            let x = normal_scores(n);
            let r = shapiro_wilk(&x).unwrap();
            assert!(r.statistic > 0.98, "n={n}: W = {}", r.statistic);
            assert!(r.p_value > 0.5, "n={n}: p = {}", r.p_value);
        }
    }

    #[test]
    fn test_exponential_growth_rejected() {
        // Heavily right-skewed: powers of two.
        let x: Vec<f64> = (0..20).map(|k| (2.0_f64).powi(k)).collect();
        let r = shapiro_wilk(&x).unwrap();
        assert!(r.p_value < 0.001, "p = {}", r.p_value);
    }

    #[test]
    fn test_w_in_unit_interval() {
        let x = [3.1, 4.5, 2.2, 8.0, 5.5, 6.1, 4.4, 3.9, 7.2, 5.0, 4.8, 6.6];
        let r = shapiro_wilk(&x).unwrap();
        assert!(r.statistic > 0.0 && r.statistic <= 1.0);
        assert!((0.0..=1.0).contains(&r.p_value));
    }

    #[test]
    fn test_small_sample_branch() {
        // n in 4..=11 exercises the -ln(gamma - ln(1-W)) transform.
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let r = shapiro_wilk(&x).unwrap();
        assert!(r.statistic > 0.9, "W = {}", r.statistic);
        assert!((0.0..=1.0).contains(&r.p_value));
    }

    #[test]
    fn test_n3_exact_branch() {
        let r = shapiro_wilk(&[1.0, 2.0, 3.0]).unwrap();
        // Evenly spaced n=3 attains the maximal W of 1 within rounding.
        assert!(r.statistic > 0.99, "W = {}", r.statistic);
        assert!(r.p_value > 0.9, "p = {}", r.p_value);
    }

    #[test]
    fn test_too_small_rejected() {
        assert!(shapiro_wilk(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_constant_sample_rejected() {
        assert!(shapiro_wilk(&[5.0, 5.0, 5.0, 5.0]).is_err());
    }
}
