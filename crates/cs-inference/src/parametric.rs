//! Parametric comparisons: independent two-sample t-test and one-way ANOVA.

use crate::descriptive::{mean, sample_variance, validate_sample};
use crate::dist::{f_sf, t_sf};
use cs_core::{Error, Result, TestOutcome};

/// Independent two-sample t-test of the null hypothesis of equal means.
///
/// `equal_var = true` uses the pooled-variance statistic with n1 + n2 - 2
/// degrees of freedom; `equal_var = false` uses Welch's statistic with
/// Satterthwaite degrees of freedom. The p-value is two-sided.
///
/// # Errors
/// Validation error when either sample has fewer than 2 observations;
/// computation error when both samples have zero variance.
pub fn t_test_ind(a: &[f64], b: &[f64], equal_var: bool) -> Result<TestOutcome> {
    validate_sample("sample a", a)?;
    validate_sample("sample b", b)?;
    if a.len() < 2 || b.len() < 2 {
        return Err(Error::Validation(format!(
            "t-test requires at least 2 observations per sample, got {} and {}",
            a.len(),
            b.len()
        )));
    }

    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let m1 = mean(a);
    let m2 = mean(b);
    let v1 = sample_variance(a);
    let v2 = sample_variance(b);

    let (se, df) = if equal_var {
        let df = n1 + n2 - 2.0;
        let pooled = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / df;
        ((pooled * (1.0 / n1 + 1.0 / n2)).sqrt(), df)
    } else {
        let se2 = v1 / n1 + v2 / n2;
        let df = se2 * se2
            / ((v1 / n1) * (v1 / n1) / (n1 - 1.0) + (v2 / n2) * (v2 / n2) / (n2 - 1.0));
        (se2.sqrt(), df)
    };

    if se <= 0.0 || !se.is_finite() {
        return Err(Error::Computation("zero variance in both samples".to_string()));
    }

    let t = (m1 - m2) / se;
    let p_value = (2.0 * t_sf(t.abs(), df)).clamp(0.0, 1.0);
    Ok(TestOutcome::new(t, p_value))
}

/// One-way analysis of variance: F-test of the null hypothesis that all group
/// means are equal, with (k-1, N-k) degrees of freedom.
pub fn one_way_anova(groups: &[Vec<f64>]) -> Result<TestOutcome> {
    let k = groups.len();
    if k < 2 {
        return Err(Error::Validation(format!("ANOVA requires at least 2 groups, got {k}")));
    }
    for (j, g) in groups.iter().enumerate() {
        validate_sample(&format!("group {j}"), g)?;
        if g.len() < 2 {
            return Err(Error::Validation(format!(
                "ANOVA requires at least 2 observations per group; group {j} has {}",
                g.len()
            )));
        }
    }

    let n_total: usize = groups.iter().map(|g| g.len()).sum();
    let grand_sum: f64 = groups.iter().map(|g| g.iter().sum::<f64>()).sum();
    let grand_mean = grand_sum / n_total as f64;

    let mut ss_between = 0.0_f64;
    let mut ss_within = 0.0_f64;
    for g in groups {
        let m = mean(g);
        ss_between += g.len() as f64 * (m - grand_mean) * (m - grand_mean);
        ss_within += g.iter().map(|v| (v - m) * (v - m)).sum::<f64>();
    }

    if ss_within <= 0.0 {
        return Err(Error::Computation(
            "zero within-group variance; F is undefined".to_string(),
        ));
    }

    let df_between = (k - 1) as f64;
    let df_within = (n_total - k) as f64;
    let f = (ss_between / df_between) / (ss_within / df_within);
    let p_value = f_sf(f, df_between, df_within).clamp(0.0, 1.0);

    Ok(TestOutcome::new(f, p_value))
}
