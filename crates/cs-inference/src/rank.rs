//! Rank-based (distribution-free) comparisons: Mann-Whitney U and
//! Kruskal-Wallis.
//!
//! Both tests rank the pooled observations (midranks for ties) and use the
//! large-sample normal / chi-squared approximations with the standard tie
//! correction, matching the behavior of the usual reference implementations
//! on samples of the size this tool targets.

use crate::descriptive::validate_sample;
use crate::dist::{chi_squared_sf, normal_sf};
use cs_core::{Error, Result, TestOutcome};

/// Assign 1-based midranks to `values`, averaging within tie runs.
///
/// Returns the ranks (in input order) and the tie term sum(t^3 - t) over tie
/// groups, used by the variance corrections below.
pub(crate) fn midranks(values: &[f64]) -> (Vec<f64>, f64) {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));

    let mut ranks = vec![0.0_f64; n];
    let mut tie_term = 0.0_f64;

    let mut start = 0;
    while start < n {
        let mut end = start + 1;
        while end < n && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Average rank of positions start..end (1-based).
        let avg = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = avg;
        }
        let t = (end - start) as f64;
        tie_term += t * t * t - t;
        start = end;
    }

    (ranks, tie_term)
}

/// Mann-Whitney U test of the null hypothesis that two independent samples
/// come from the same distribution.
///
/// The statistic is U of the first sample; the two-sided p-value uses the
/// normal approximation with tie correction and a 0.5 continuity correction.
///
/// # Errors
/// Validation error for empty input; computation error when every pooled
/// observation is identical (zero rank variance).
pub fn mann_whitney_u(a: &[f64], b: &[f64]) -> Result<TestOutcome> {
    validate_sample("sample a", a)?;
    validate_sample("sample b", b)?;

    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let n = n1 + n2;

    let pooled: Vec<f64> = a.iter().chain(b.iter()).copied().collect();
    let (ranks, tie_term) = midranks(&pooled);

    let r1: f64 = ranks[..a.len()].iter().sum();
    let u1 = r1 - n1 * (n1 + 1.0) / 2.0;
    let u2 = n1 * n2 - u1;

    let variance = n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    if variance <= 0.0 {
        return Err(Error::Computation(
            "all pooled observations are identical; U variance is zero".to_string(),
        ));
    }

    let mu = n1 * n2 / 2.0;
    let big_u = u1.max(u2);
    let z = (big_u - mu - 0.5) / variance.sqrt();
    let p_value = (2.0 * normal_sf(z)).clamp(0.0, 1.0);

    Ok(TestOutcome::new(u1, p_value))
}

/// Kruskal-Wallis H test of the null hypothesis that k independent samples
/// come from the same distribution, with the standard tie correction and a
/// chi-squared(k-1) p-value.
pub fn kruskal_wallis(groups: &[Vec<f64>]) -> Result<TestOutcome> {
    let k = groups.len();
    if k < 2 {
        return Err(Error::Validation(format!(
            "Kruskal-Wallis requires at least 2 groups, got {k}"
        )));
    }
    for (j, g) in groups.iter().enumerate() {
        validate_sample(&format!("group {j}"), g)?;
    }

    let n_total: usize = groups.iter().map(|g| g.len()).sum();
    let nf = n_total as f64;

    let pooled: Vec<f64> = groups.iter().flatten().copied().collect();
    let (ranks, tie_term) = midranks(&pooled);

    // Per-group rank sums.
    let mut h = 0.0_f64;
    let mut offset = 0;
    for g in groups {
        let r: f64 = ranks[offset..offset + g.len()].iter().sum();
        h += r * r / g.len() as f64;
        offset += g.len();
    }
    h = 12.0 / (nf * (nf + 1.0)) * h - 3.0 * (nf + 1.0);

    let correction = 1.0 - tie_term / (nf * nf * nf - nf);
    if correction <= 0.0 {
        return Err(Error::Computation(
            "all pooled observations are identical; H is undefined".to_string(),
        ));
    }
    h /= correction;

    let p_value = chi_squared_sf(h, (k - 1) as f64).clamp(0.0, 1.0);
    Ok(TestOutcome::new(h, p_value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midranks_with_ties() {
        let (ranks, tie_term) = midranks(&[3.0, 1.0, 3.0, 2.0]);
        // Sorted: 1 (rank 1), 2 (rank 2), 3, 3 (ranks 3.5 each).
        assert_eq!(ranks, vec![3.5, 1.0, 3.5, 2.0]);
        // One tie group of size 2: 2^3 - 2 = 6.
        assert!((tie_term - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_mann_whitney_u_complement() {
        let a = [1.0, 4.0, 2.5, 7.0, 3.0];
        let b = [2.0, 6.5, 5.0, 8.0];
        let r = mann_whitney_u(&a, &b).unwrap();
        let r_swapped = mann_whitney_u(&b, &a).unwrap();
        // U1 + U2 = n1 * n2; swapping the samples swaps the statistic.
        assert!((r.statistic + r_swapped.statistic - 20.0).abs() < 1e-12);
        // The two-sided p-value is symmetric.
        assert!((r.p_value - r_swapped.p_value).abs() < 1e-12);
    }

    #[test]
    fn test_mann_whitney_identical_samples() {
        let x: Vec<f64> = (0..15).map(|i| i as f64).collect();
        let r = mann_whitney_u(&x, &x).unwrap();
        // Complete overlap: U1 = n1*n2/2 and p is at the top of the scale.
        assert!((r.statistic - 112.5).abs() < 1e-9);
        assert!(r.p_value > 0.9, "p = {}", r.p_value);
    }

    #[test]
    fn test_mann_whitney_separated_samples() {
        let a: Vec<f64> = (0..15).map(|i| i as f64).collect();
        let b: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let r = mann_whitney_u(&a, &b).unwrap();
        assert!((r.statistic - 0.0).abs() < 1e-12);
        assert!(r.p_value < 1e-4, "p = {}", r.p_value);
    }

    #[test]
    fn test_kruskal_identical_groups() {
        let g: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let r = kruskal_wallis(&[g.clone(), g.clone(), g]).unwrap();
        assert!(r.statistic < 0.5, "H = {}", r.statistic);
        assert!(r.p_value > 0.5, "p = {}", r.p_value);
    }

    #[test]
    fn test_kruskal_separated_groups() {
        let a: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let b: Vec<f64> = (0..10).map(|i| 50.0 + i as f64).collect();
        let c: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let r = kruskal_wallis(&[a, b, c]).unwrap();
        assert!(r.p_value < 1e-4, "p = {}", r.p_value);
    }

    #[test]
    fn test_degenerate_input_rejected() {
        assert!(mann_whitney_u(&[], &[1.0]).is_err());
        assert!(mann_whitney_u(&[2.0, 2.0], &[2.0, 2.0]).is_err());
        assert!(kruskal_wallis(&[vec![1.0, 2.0]]).is_err());
    }
}
