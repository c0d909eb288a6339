//! Variance-homogeneity testing (Levene / Brown-Forsythe).
//!
//! Levene's test transforms each observation into its absolute deviation from
//! a group center and runs a one-way ANOVA on the deviations. Median centering
//! (Brown-Forsythe) is the default; it is robust to non-normal groups, which
//! is the situation this check feeds (see [`crate::policy`]).

use crate::descriptive::{mean, median, validate_sample};
use crate::dist::f_sf;
use cs_core::{Error, Result, TestOutcome};
use serde::{Deserialize, Serialize};

/// Centering used for the Levene transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeveneCenter {
    /// Deviations from the group median (Brown-Forsythe). Robust default.
    #[default]
    Median,
    /// Deviations from the group mean (original Levene).
    Mean,
}

/// Levene's test of the null hypothesis that all groups share equal variance.
///
/// Returns the W statistic and its p-value from F(k-1, N-k).
///
/// # Errors
/// Validation error for fewer than 2 groups or any group with fewer than 2
/// observations; computation error when all deviations are zero.
pub fn levene(groups: &[Vec<f64>], center: LeveneCenter) -> Result<TestOutcome> {
    let k = groups.len();
    if k < 2 {
        return Err(Error::Validation(format!("Levene requires at least 2 groups, got {k}")));
    }
    for (j, g) in groups.iter().enumerate() {
        validate_sample(&format!("group {j}"), g)?;
        if g.len() < 2 {
            return Err(Error::Validation(format!(
                "Levene requires at least 2 observations per group; group {j} has {}",
                g.len()
            )));
        }
    }
    let n_total: usize = groups.iter().map(|g| g.len()).sum();

    // Absolute deviations from the group center.
    let mut z_groups: Vec<Vec<f64>> = Vec::with_capacity(k);
    for g in groups {
        let c = match center {
            LeveneCenter::Median => median(g)?,
            LeveneCenter::Mean => mean(g),
        };
        z_groups.push(g.iter().map(|v| (v - c).abs()).collect());
    }

    let z_means: Vec<f64> = z_groups.iter().map(|z| mean(z)).collect();
    let grand_sum: f64 = z_groups.iter().map(|z| z.iter().sum::<f64>()).sum();
    let grand_mean = grand_sum / n_total as f64;

    let between: f64 = z_groups
        .iter()
        .zip(&z_means)
        .map(|(z, zm)| z.len() as f64 * (zm - grand_mean) * (zm - grand_mean))
        .sum();
    let within: f64 = z_groups
        .iter()
        .zip(&z_means)
        .map(|(z, zm)| z.iter().map(|v| (v - zm) * (v - zm)).sum::<f64>())
        .sum();

    if within <= 0.0 {
        return Err(Error::Computation(
            "zero within-group spread of deviations; W is undefined".to_string(),
        ));
    }

    let df_between = (k - 1) as f64;
    let df_within = (n_total - k) as f64;
    let w = (df_within / df_between) * (between / within);
    let p_value = f_sf(w, df_between, df_within).clamp(0.0, 1.0);

    Ok(TestOutcome::new(w, p_value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_groups_not_rejected() {
        let g = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let r = levene(&[g.clone(), g], LeveneCenter::Median).unwrap();
        // Identical groups have identical deviation profiles: W = 0, p = 1.
        assert!(r.statistic.abs() < 1e-12, "W = {}", r.statistic);
        assert!((r.p_value - 1.0).abs() < 1e-9, "p = {}", r.p_value);
    }

    #[test]
    fn test_very_different_spread_rejected() {
        let tight: Vec<f64> = (0..20).map(|i| 10.0 + 0.01 * i as f64).collect();
        let wide: Vec<f64> = (0..20).map(|i| 10.0 + 5.0 * i as f64).collect();
        let r = levene(&[tight, wide], LeveneCenter::Median).unwrap();
        assert!(r.p_value < 0.001, "p = {}", r.p_value);
    }

    #[test]
    fn test_mean_and_median_centers_agree_on_symmetric_data() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let b = vec![2.0, 4.0, 6.0, 8.0, 10.0];
        let w_median = levene(&[a.clone(), b.clone()], LeveneCenter::Median).unwrap();
        let w_mean = levene(&[a, b], LeveneCenter::Mean).unwrap();
        // Symmetric groups: mean equals median, so the statistics coincide.
        assert!((w_median.statistic - w_mean.statistic).abs() < 1e-9);
    }

    #[test]
    fn test_three_groups_supported() {
        let a = vec![1.0, 2.0, 3.0, 4.0];
        let b = vec![1.5, 2.5, 3.5, 4.5];
        let c = vec![1.2, 2.1, 3.3, 4.4];
        let r = levene(&[a, b, c], LeveneCenter::Median).unwrap();
        assert!((0.0..=1.0).contains(&r.p_value));
    }

    #[test]
    fn test_single_group_rejected() {
        assert!(levene(&[vec![1.0, 2.0]], LeveneCenter::Median).is_err());
    }

    #[test]
    fn test_constant_groups_rejected() {
        let err = levene(&[vec![1.0, 1.0, 1.0], vec![2.0, 2.0, 2.0]], LeveneCenter::Median);
        assert!(err.is_err());
    }
}
