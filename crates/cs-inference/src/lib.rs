//! # cs-inference
//!
//! Statistical procedures for cohortstat.
//!
//! This crate provides:
//! - Descriptive summaries (mean, std, quartiles)
//! - Normality testing (Shapiro-Wilk)
//! - Variance-homogeneity testing (Levene / Brown-Forsythe)
//! - Two-group comparison (Student/Welch t, Mann-Whitney U)
//! - Multi-group comparison (one-way ANOVA, Kruskal-Wallis)
//! - Post-hoc pairwise comparison (Tukey HSD)
//! - The decide-and-test policy that picks parametric vs rank-based tests
//!
//! All procedures operate on plain `&[f64]` samples; the orchestration in
//! [`compare`] assembles them into serializable reports.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Decide-and-test orchestration: assumption checks, test choice, reports.
pub mod compare;
/// Descriptive statistics: mean, variance, quantiles, per-sample summaries.
pub mod descriptive;
mod dist;
/// Normality testing via the Shapiro-Wilk W statistic.
pub mod normality;
/// Parametric comparisons: two-sample t-test and one-way ANOVA.
pub mod parametric;
/// Parametric-vs-rank-based decision policy.
pub mod policy;
/// Post-hoc pairwise comparison: Tukey's honestly significant difference.
pub mod posthoc;
/// Rank-based comparisons: Mann-Whitney U and Kruskal-Wallis.
pub mod rank;
/// Variance-homogeneity testing (Levene / Brown-Forsythe).
pub mod variance;

pub use compare::{k_group_report, two_group_report, KGroupReport, NormalityCheck, TwoGroupReport};
pub use descriptive::{summarize, GroupLevelSummary, SampleSummary};
pub use normality::shapiro_wilk;
pub use parametric::{one_way_anova, t_test_ind};
pub use policy::{choose_test, NormalityPolicy, TestVariant, DEFAULT_ALPHA};
pub use posthoc::{tukey_hsd, PairwiseMeanComparison, TukeyHsdReport};
pub use rank::{kruskal_wallis, mann_whitney_u};
pub use variance::{levene, LeveneCenter};
