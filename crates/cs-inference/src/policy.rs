//! Decide-and-test policy: parametric versus rank-based test selection.
//!
//! The classical procedure checks normality per group and variance
//! homogeneity across groups before picking the comparison test. How many
//! groups must fail normality before the parametric path is abandoned is a
//! judgment call, so it is a configurable policy rather than a hardcoded
//! rule.

use serde::{Deserialize, Serialize};

/// Default significance threshold used across the tool.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Which family of comparison test the assumption checks point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestVariant {
    /// Distribution assumptions hold: t-test / one-way ANOVA.
    Parametric,
    /// Assumptions violated: Mann-Whitney U / Kruskal-Wallis.
    NonParametric,
}

/// How many groups must fail the normality check before the parametric path
/// is abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NormalityPolicy {
    /// A single failing group is enough to switch to the rank-based test.
    #[default]
    AnyNonNormal,
    /// Every group must fail before the rank-based test is chosen.
    AllNonNormal,
}

/// Pick the comparison test from the assumption-check p-values.
///
/// The parametric test is chosen only when the per-group normality checks
/// pass under `policy` *and* the variance-homogeneity check passes; any
/// violation selects the rank-based test.
pub fn choose_test(
    normality_pvalues: &[f64],
    homogeneity_pvalue: f64,
    alpha: f64,
    policy: NormalityPolicy,
) -> TestVariant {
    let failed = normality_pvalues.iter().filter(|&&p| p <= alpha).count();
    let normality_violated = match policy {
        NormalityPolicy::AnyNonNormal => failed > 0,
        NormalityPolicy::AllNonNormal => {
            !normality_pvalues.is_empty() && failed == normality_pvalues.len()
        }
    };

    if normality_violated || homogeneity_pvalue <= alpha {
        TestVariant::NonParametric
    } else {
        TestVariant::Parametric
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_assumptions_pass() {
        let v = choose_test(&[0.3, 0.8], 0.4, 0.05, NormalityPolicy::AnyNonNormal);
        assert_eq!(v, TestVariant::Parametric);
    }

    #[test]
    fn test_one_group_fails_any_policy() {
        // The historical analysis went non-parametric when a single group
        // failed, even though the other passed.
        let v = choose_test(&[0.0007, 0.8382], 0.868, 0.05, NormalityPolicy::AnyNonNormal);
        assert_eq!(v, TestVariant::NonParametric);
    }

    #[test]
    fn test_one_group_fails_all_policy() {
        let v = choose_test(&[0.0007, 0.8382], 0.868, 0.05, NormalityPolicy::AllNonNormal);
        assert_eq!(v, TestVariant::Parametric);
    }

    #[test]
    fn test_all_groups_fail_all_policy() {
        let v = choose_test(&[0.0086, 0.0358], 0.39, 0.05, NormalityPolicy::AllNonNormal);
        assert_eq!(v, TestVariant::NonParametric);
    }

    #[test]
    fn test_homogeneity_failure_overrides() {
        let v = choose_test(&[0.5, 0.6], 0.01, 0.05, NormalityPolicy::AnyNonNormal);
        assert_eq!(v, TestVariant::NonParametric);
    }
}
