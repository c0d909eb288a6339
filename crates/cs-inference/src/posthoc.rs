//! Post-hoc pairwise comparison: Tukey's honestly significant difference.
//!
//! After a significant k-group comparison, Tukey HSD identifies which pairs
//! of group means differ while holding the family-wise error rate at alpha.
//! Adjusted p-values and critical values come from the studentized range
//! distribution Q(k, df), whose CDF is evaluated by a double Gauss-Legendre
//! quadrature: an inner integral for the range of k standard normals, and an
//! outer integral over the chi-scale density of the pooled standard-deviation
//! estimate.
//!
//! ## References
//!
//! - Tukey JW (1949). Comparing individual means in the analysis of variance.
//!   *Biometrics* 5:99-114.
//! - Copenhaver MD, Holland B (1988). Computation of the distribution of the
//!   maximum studentized range statistic. *J Stat Comput Simul* 30:1-15.

use crate::descriptive::{mean, GroupLevelSummary};
use crate::dist::normal_cdf;
use cs_core::{Error, Result};
use serde::Serialize;
use statrs::function::gamma::ln_gamma;

// ---------------------------------------------------------------------------
// Report structures
// ---------------------------------------------------------------------------

/// A single pairwise mean comparison from a Tukey HSD analysis.
#[derive(Debug, Clone, Serialize)]
pub struct PairwiseMeanComparison {
    /// First group label.
    pub group_a: String,
    /// Second group label.
    pub group_b: String,
    /// Mean difference, `mean_b - mean_a`.
    pub mean_diff: f64,
    /// Family-wise adjusted p-value from the studentized range distribution.
    pub p_adjusted: f64,
    /// Lower simultaneous confidence bound for the mean difference.
    pub ci_lower: f64,
    /// Upper simultaneous confidence bound.
    pub ci_upper: f64,
    /// Whether the null of equal means is rejected at the family-wise alpha.
    pub reject: bool,
}

/// Full Tukey HSD report over all unordered group pairs.
#[derive(Debug, Clone, Serialize)]
pub struct TukeyHsdReport {
    /// Per-group summaries, in label order.
    pub groups: Vec<GroupLevelSummary>,
    /// Pairwise comparisons, in (group_a, group_b) label order.
    pub pairwise: Vec<PairwiseMeanComparison>,
    /// Studentized range critical value q(1-alpha; k, df).
    pub q_critical: f64,
    /// Within-group (error) degrees of freedom, N - k.
    pub df_within: usize,
    /// Mean squared error (pooled within-group variance).
    pub mse: f64,
    /// Family-wise error rate.
    pub alpha: f64,
}

// ---------------------------------------------------------------------------
// Tukey HSD
// ---------------------------------------------------------------------------

/// Tukey HSD pairwise comparison of all group means at family-wise error
/// rate `alpha`. Groups are labelled; pairs are emitted in label order.
///
/// # Errors
/// Validation error for fewer than 2 groups, any group with fewer than 2
/// observations, or alpha outside (0, 1); computation error for zero pooled
/// within-group variance.
pub fn tukey_hsd(groups: &[(String, Vec<f64>)], alpha: f64) -> Result<TukeyHsdReport> {
    let k = groups.len();
    if k < 2 {
        return Err(Error::Validation(format!("Tukey HSD requires at least 2 groups, got {k}")));
    }
    if !(0.0..1.0).contains(&alpha) || alpha <= 0.0 {
        return Err(Error::Validation(format!("alpha must be in (0, 1), got {alpha}")));
    }
    for (label, g) in groups {
        if g.len() < 2 {
            return Err(Error::Validation(format!(
                "Tukey HSD requires at least 2 observations per group; '{label}' has {}",
                g.len()
            )));
        }
        if g.iter().any(|v| !v.is_finite()) {
            return Err(Error::Validation(format!(
                "group '{label}' must contain only finite values"
            )));
        }
    }

    let n_total: usize = groups.iter().map(|(_, g)| g.len()).sum();
    let df = n_total - k;
    let dff = df as f64;

    // Pooled within-group variance.
    let means: Vec<f64> = groups.iter().map(|(_, g)| mean(g)).collect();
    let ss_within: f64 = groups
        .iter()
        .zip(&means)
        .map(|((_, g), m)| g.iter().map(|v| (v - m) * (v - m)).sum::<f64>())
        .sum();
    if ss_within <= 0.0 {
        return Err(Error::Computation(
            "zero pooled within-group variance; Tukey HSD is undefined".to_string(),
        ));
    }
    let mse = ss_within / dff;

    let q_critical = studentized_range_quantile(1.0 - alpha, k, dff)?;

    let summaries: Vec<GroupLevelSummary> = groups
        .iter()
        .zip(&means)
        .map(|((label, g), &m)| GroupLevelSummary { label: label.clone(), n: g.len(), mean: m })
        .collect();

    let mut pairwise = Vec::with_capacity(k * (k - 1) / 2);
    for i in 0..k {
        for j in (i + 1)..k {
            let ni = groups[i].1.len() as f64;
            let nj = groups[j].1.len() as f64;
            // Tukey-Kramer standard error for unbalanced groups.
            let se = (mse * 0.5 * (1.0 / ni + 1.0 / nj)).sqrt();
            let diff = means[j] - means[i];
            let q = diff.abs() / se;

            let p_adjusted = (1.0 - studentized_range_cdf(q, k, dff)).clamp(0.0, 1.0);
            let half_width = q_critical * se;

            pairwise.push(PairwiseMeanComparison {
                group_a: groups[i].0.clone(),
                group_b: groups[j].0.clone(),
                mean_diff: diff,
                p_adjusted,
                ci_lower: diff - half_width,
                ci_upper: diff + half_width,
                reject: p_adjusted < alpha,
            });
        }
    }

    Ok(TukeyHsdReport {
        groups: summaries,
        pairwise,
        q_critical,
        df_within: df,
        mse,
        alpha,
    })
}

// ---------------------------------------------------------------------------
// Studentized range distribution
// ---------------------------------------------------------------------------

/// P(range of k independent standard normals <= w).
///
/// Uses the classical representation with the position of the maximum as the
/// outer variable:
///
///   P = k * integral phi(z) * [Phi(z) - Phi(z - w)]^{k-1} dz
///
/// The normal density kills the integrand beyond |z| ~ 8, so the integral is
/// taken over [-8, 8] in panels of width 2 with a 32-point rule per panel.
fn normal_range_cdf(w: f64, k: usize) -> f64 {
    if w <= 0.0 {
        return 0.0;
    }
    let (nodes, weights) = gauss_legendre_32();
    let km1 = (k - 1) as i32;
    let inv_sqrt_2pi = 1.0 / (2.0 * std::f64::consts::PI).sqrt();

    let mut total = 0.0_f64;
    for panel in 0..8 {
        let a = -8.0 + 2.0 * panel as f64;
        let mid = a + 1.0;
        for i in 0..GL_NPOINTS {
            let z = mid + nodes[i];
            let phi = inv_sqrt_2pi * (-0.5 * z * z).exp();
            let cell = normal_cdf(z) - normal_cdf(z - w);
            total += weights[i] * phi * cell.powi(km1);
        }
    }
    (k as f64 * total).clamp(0.0, 1.0)
}

/// CDF of the studentized range Q(k, df) at value q.
///
/// Integrates the range probability over the distribution of u = S/sigma,
/// where S^2 is an independent chi-squared(df)/df variance estimate:
///
///   P(Q <= q) = integral_0^inf f(u) * P(range <= q*u) du
///   f(u) = 2 * (df/2)^{df/2} / Gamma(df/2) * u^{df-1} * exp(-df*u^2/2)
///
/// The density of u concentrates around 1 with SD ~ 1/sqrt(2*df); the outer
/// integral covers mean +/- 12 SD in four Gauss-Legendre panels.
fn studentized_range_cdf(q: f64, k: usize, df: f64) -> f64 {
    if q <= 0.0 {
        return 0.0;
    }

    let half_df = df / 2.0;
    let log_norm = (2.0_f64).ln() + half_df * half_df.ln() - ln_gamma(half_df);

    let sd = 1.0 / (2.0 * df).sqrt();
    let lo = (1.0 - 12.0 * sd).max(0.0);
    let hi = 1.0 + 12.0 * sd;

    let (nodes, weights) = gauss_legendre_32();
    let n_panels = 4;
    let panel_len = (hi - lo) / n_panels as f64;

    let mut integral = 0.0_f64;
    for panel in 0..n_panels {
        let a = lo + panel as f64 * panel_len;
        let mid = a + panel_len / 2.0;
        let half_len = panel_len / 2.0;
        for i in 0..GL_NPOINTS {
            let u = mid + half_len * nodes[i];
            if u <= 0.0 {
                continue;
            }
            let log_density = log_norm + (df - 1.0) * u.ln() - df * u * u / 2.0;
            integral += weights[i] * half_len * log_density.exp() * normal_range_cdf(q * u, k);
        }
    }

    integral.clamp(0.0, 1.0)
}

/// Quantile of the studentized range Q(k, df) by bisection on the CDF.
fn studentized_range_quantile(p: f64, k: usize, df: f64) -> Result<f64> {
    if !(0.0..1.0).contains(&p) || p <= 0.0 {
        return Err(Error::Validation(format!("quantile level must be in (0, 1), got {p}")));
    }

    // Bracket the root. The 99.9% point is well below 100 for any k, df >= 1
    // seen in practice; the doubling loop handles the rest.
    let mut hi = 10.0_f64;
    while studentized_range_cdf(hi, k, df) < p {
        hi *= 2.0;
        if hi > 1e4 {
            return Err(Error::Computation(format!(
                "failed to bracket studentized range quantile at p={p}, k={k}, df={df}"
            )));
        }
    }

    let mut lo = 0.0_f64;
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if studentized_range_cdf(mid, k, df) < p {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo < 1e-10 {
            break;
        }
    }
    Ok(0.5 * (lo + hi))
}

/// 32-point Gauss-Legendre nodes and weights on [-1, 1].
///
/// Precomputed for high-accuracy numerical integration.
fn gauss_legendre_32() -> ([f64; 32], [f64; 32]) {
    let mut nodes = [0.0; 32];
    let mut weights = [0.0; 32];

    // 32-point Gauss-Legendre: positive half-nodes (symmetric rule).
    let half_nodes: [f64; 16] = [
        0.04830766568773831,
        0.14447196158279649,
        0.23928736225213707,
        0.33186860228212767,
        0.42135127613063534,
        0.50689990893222942,
        0.58771575724076233,
        0.66304426693021520,
        0.73218211874028968,
        0.79448379596794241,
        0.84936761373256997,
        0.89632115576605212,
        0.93490607593773969,
        0.96476225558750643,
        0.98561151154526834,
        0.99726386184948156,
    ];
    let half_weights: [f64; 16] = [
        0.09654008851472780,
        0.09563872007927486,
        0.09384439908080457,
        0.09117387869576389,
        0.08765209300440381,
        0.08331192422694676,
        0.07819389578707031,
        0.07234579410884851,
        0.06582222277636185,
        0.05868409347853555,
        0.05099805926237618,
        0.04283589802222668,
        0.03427386291302143,
        0.02539206530926206,
        0.01627439473090567,
        0.00701861000947009,
    ];

    // Fill the arrays: negative nodes first (reversed), then positive.
    for i in 0..16 {
        nodes[i] = -half_nodes[15 - i];
        weights[i] = half_weights[15 - i];
        nodes[16 + i] = half_nodes[i];
        weights[16 + i] = half_weights[i];
    }

    (nodes, weights)
}

/// Number of active quadrature points in the Gauss-Legendre rule.
const GL_NPOINTS: usize = 32;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::t_sf;

    #[test]
    fn test_range_cdf_monotone() {
        let mut prev = 0.0;
        for i in 1..=40 {
            let w = i as f64 * 0.2;
            let p = normal_range_cdf(w, 3);
            assert!(p >= prev - 1e-12, "range CDF not monotone at w={w}");
            prev = p;
        }
        assert!(prev > 0.999, "range CDF should approach 1, got {prev}");
    }

    #[test]
    fn test_k2_identity_with_t_distribution() {
        // For k = 2 the studentized range is |t| * sqrt(2), so
        // 1 - Ptukey(|t|*sqrt(2); 2, df) equals the two-sided t p-value.
        for &(t, df) in &[(1.0, 10.0), (2.0, 10.0), (2.5, 30.0), (1.5, 61.0)] {
            let p_range = 1.0 - studentized_range_cdf(t * std::f64::consts::SQRT_2, 2, df);
            let p_t = 2.0 * t_sf(t, df);
            assert!(
                (p_range - p_t).abs() < 2e-4,
                "t={t}, df={df}: range p = {p_range}, t p = {p_t}"
            );
        }
    }

    #[test]
    fn test_critical_value_against_tables() {
        // Published studentized range table: q(0.95; k=3, df=60) = 3.40.
        let q = studentized_range_quantile(0.95, 3, 60.0).unwrap();
        assert!((q - 3.40).abs() < 0.02, "q = {q}");
        // q(0.95; k=3, df=10) = 3.88.
        let q = studentized_range_quantile(0.95, 3, 10.0).unwrap();
        assert!((q - 3.88).abs() < 0.02, "q = {q}");
    }

    #[test]
    fn test_quantile_round_trip() {
        let q = studentized_range_quantile(0.9, 4, 20.0).unwrap();
        let p = studentized_range_cdf(q, 4, 20.0);
        assert!((p - 0.9).abs() < 1e-6, "round trip gave {p}");
    }

    #[test]
    fn test_tukey_separated_pair_rejected() {
        // Three groups: A and B overlap, C is far away.
        let groups = vec![
            ("A".to_string(), vec![10.0, 11.0, 12.0, 13.0, 14.0, 15.0]),
            ("B".to_string(), vec![10.5, 11.5, 12.5, 13.5, 14.5, 15.5]),
            ("C".to_string(), vec![30.0, 31.0, 32.0, 33.0, 34.0, 35.0]),
        ];
        let report = tukey_hsd(&groups, 0.05).unwrap();
        assert_eq!(report.pairwise.len(), 3);

        let ab = &report.pairwise[0];
        assert_eq!((ab.group_a.as_str(), ab.group_b.as_str()), ("A", "B"));
        assert!(!ab.reject, "A-B should not reject, p = {}", ab.p_adjusted);

        let ac = &report.pairwise[1];
        assert!(ac.reject, "A-C should reject, p = {}", ac.p_adjusted);
        assert!((ac.mean_diff - 20.0).abs() < 1e-9);
        assert!(ac.ci_lower > 0.0, "A-C interval excludes zero");

        let bc = &report.pairwise[2];
        assert!(bc.reject, "B-C should reject, p = {}", bc.p_adjusted);
    }

    #[test]
    fn test_tukey_ci_contains_diff() {
        let groups = vec![
            ("x".to_string(), vec![1.0, 2.0, 3.0, 4.0]),
            ("y".to_string(), vec![2.0, 3.0, 4.0, 5.0]),
            ("z".to_string(), vec![1.5, 2.5, 3.5, 4.5]),
        ];
        let report = tukey_hsd(&groups, 0.05).unwrap();
        for pw in &report.pairwise {
            assert!(pw.ci_lower <= pw.mean_diff && pw.mean_diff <= pw.ci_upper);
            assert!((0.0..=1.0).contains(&pw.p_adjusted));
            // Non-rejected pairs have intervals covering zero and vice versa.
            assert_eq!(pw.reject, !(pw.ci_lower <= 0.0 && pw.ci_upper >= 0.0));
        }
    }

    #[test]
    fn test_tukey_validation() {
        assert!(tukey_hsd(&[("only".to_string(), vec![1.0, 2.0])], 0.05).is_err());
        let same = vec![
            ("a".to_string(), vec![1.0, 1.0]),
            ("b".to_string(), vec![1.0, 1.0]),
        ];
        assert!(tukey_hsd(&same, 0.05).is_err());
        let ok = vec![
            ("a".to_string(), vec![1.0, 2.0]),
            ("b".to_string(), vec![2.0, 3.0]),
        ];
        assert!(tukey_hsd(&ok, 1.5).is_err());
    }
}
