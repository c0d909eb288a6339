//! Decide-and-test orchestration.
//!
//! These report builders run the classical sequence in one pass: per-group
//! normality checks, a variance-homogeneity check, the policy decision
//! between the parametric and rank-based comparison, and the chosen test
//! itself. The result is a serializable report; interpretation (printing,
//! JSON artifacts) is left to the caller.

use crate::descriptive::{mean, GroupLevelSummary};
use crate::normality::shapiro_wilk;
use crate::parametric::{one_way_anova, t_test_ind};
use crate::policy::{choose_test, NormalityPolicy, TestVariant};
use crate::rank::{kruskal_wallis, mann_whitney_u};
use crate::variance::{levene, LeveneCenter};
use cs_core::{Error, Result, TestOutcome};
use serde::Serialize;

/// One per-group normality check.
#[derive(Debug, Clone, Serialize)]
pub struct NormalityCheck {
    /// Group label.
    pub group: String,
    /// Shapiro-Wilk W and p-value.
    pub outcome: TestOutcome,
    /// Whether the normality null survives at the report's alpha.
    pub normal: bool,
}

/// Report for the two-group comparison.
#[derive(Debug, Clone, Serialize)]
pub struct TwoGroupReport {
    /// Per-group summaries (exactly two), in label order.
    pub groups: Vec<GroupLevelSummary>,
    /// Per-group Shapiro-Wilk checks.
    pub normality: Vec<NormalityCheck>,
    /// Levene variance-homogeneity check across both groups.
    pub homogeneity: TestOutcome,
    /// Which test family the policy selected.
    pub variant: TestVariant,
    /// Name of the test that was run.
    pub test_name: String,
    /// Statistic and p-value of the chosen test.
    pub test: TestOutcome,
    /// Whether the equal-distributions null is rejected at alpha.
    pub reject_null: bool,
    /// Significance level used throughout.
    pub alpha: f64,
}

/// Report for the k-group comparison.
#[derive(Debug, Clone, Serialize)]
pub struct KGroupReport {
    /// Per-group summaries, in label order.
    pub groups: Vec<GroupLevelSummary>,
    /// Per-group Shapiro-Wilk checks.
    pub normality: Vec<NormalityCheck>,
    /// Levene variance-homogeneity check across all groups.
    pub homogeneity: TestOutcome,
    /// Which test family the policy selected.
    pub variant: TestVariant,
    /// Name of the test that was run.
    pub test_name: String,
    /// Statistic and p-value of the chosen test.
    pub test: TestOutcome,
    /// Whether the equal-means null is rejected at alpha.
    pub reject_null: bool,
    /// Significance level used throughout.
    pub alpha: f64,
}

fn validate_alpha(alpha: f64) -> Result<()> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(Error::Validation(format!("alpha must be in (0, 1), got {alpha}")));
    }
    Ok(())
}

/// Run the assumption checks shared by both report builders.
fn assumption_checks(
    groups: &[(String, Vec<f64>)],
    alpha: f64,
    center: LeveneCenter,
) -> Result<(Vec<GroupLevelSummary>, Vec<NormalityCheck>, TestOutcome)> {
    let mut summaries = Vec::with_capacity(groups.len());
    let mut normality = Vec::with_capacity(groups.len());
    for (label, g) in groups {
        if g.is_empty() {
            return Err(Error::Validation(format!("group '{label}' is empty")));
        }
        summaries.push(GroupLevelSummary { label: label.clone(), n: g.len(), mean: mean(g) });

        let outcome = shapiro_wilk(g)?;
        normality.push(NormalityCheck {
            group: label.clone(),
            normal: outcome.p_value > alpha,
            outcome,
        });
    }

    let samples: Vec<Vec<f64>> = groups.iter().map(|(_, g)| g.clone()).collect();
    let homogeneity = levene(&samples, center)?;

    Ok((summaries, normality, homogeneity))
}

/// Two-group decide-and-test: Shapiro-Wilk per group, Levene across groups,
/// then the pooled t-test or Mann-Whitney U according to `policy`.
pub fn two_group_report(
    groups: &[(String, Vec<f64>)],
    alpha: f64,
    policy: NormalityPolicy,
    center: LeveneCenter,
) -> Result<TwoGroupReport> {
    validate_alpha(alpha)?;
    if groups.len() != 2 {
        return Err(Error::Validation(format!(
            "two-group comparison requires exactly 2 groups, got {}",
            groups.len()
        )));
    }

    let (summaries, normality, homogeneity) = assumption_checks(groups, alpha, center)?;
    let normality_pvalues: Vec<f64> = normality.iter().map(|c| c.outcome.p_value).collect();
    let variant = choose_test(&normality_pvalues, homogeneity.p_value, alpha, policy);

    let (test_name, test) = match variant {
        TestVariant::Parametric => {
            ("two_sample_t".to_string(), t_test_ind(&groups[0].1, &groups[1].1, true)?)
        }
        TestVariant::NonParametric => {
            ("mann_whitney_u".to_string(), mann_whitney_u(&groups[0].1, &groups[1].1)?)
        }
    };

    Ok(TwoGroupReport {
        groups: summaries,
        normality,
        homogeneity,
        variant,
        reject_null: test.reject_at(alpha),
        test_name,
        test,
        alpha,
    })
}

/// K-group decide-and-test: Shapiro-Wilk per group, Levene across groups,
/// then one-way ANOVA or Kruskal-Wallis according to `policy`.
pub fn k_group_report(
    groups: &[(String, Vec<f64>)],
    alpha: f64,
    policy: NormalityPolicy,
    center: LeveneCenter,
) -> Result<KGroupReport> {
    validate_alpha(alpha)?;
    if groups.len() < 2 {
        return Err(Error::Validation(format!(
            "k-group comparison requires at least 2 groups, got {}",
            groups.len()
        )));
    }

    let (summaries, normality, homogeneity) = assumption_checks(groups, alpha, center)?;
    let normality_pvalues: Vec<f64> = normality.iter().map(|c| c.outcome.p_value).collect();
    let variant = choose_test(&normality_pvalues, homogeneity.p_value, alpha, policy);

    let samples: Vec<Vec<f64>> = groups.iter().map(|(_, g)| g.clone()).collect();
    let (test_name, test) = match variant {
        TestVariant::Parametric => ("one_way_anova".to_string(), one_way_anova(&samples)?),
        TestVariant::NonParametric => ("kruskal_wallis".to_string(), kruskal_wallis(&samples)?),
    };

    Ok(KGroupReport {
        groups: summaries,
        normality,
        homogeneity,
        variant,
        reject_null: test.reject_at(alpha),
        test_name,
        test,
        alpha,
    })
}
