//! Analysis subcommands: summary, compare, anova, posthoc.

use anyhow::Result;
use std::path::PathBuf;

use cs_inference::{
    k_group_report, summarize, tukey_hsd, two_group_report, KGroupReport, LeveneCenter,
    NormalityPolicy, TestVariant, TwoGroupReport,
};

use crate::table::{Column, Table};
use crate::write_json;

pub fn parse_policy(s: &str) -> Result<NormalityPolicy> {
    match s.to_lowercase().replace('-', "_").as_str() {
        "any" | "any_non_normal" => Ok(NormalityPolicy::AnyNonNormal),
        "all" | "all_non_normal" => Ok(NormalityPolicy::AllNonNormal),
        _ => anyhow::bail!("unknown normality policy '{}' — expected any or all", s),
    }
}

pub fn parse_center(s: &str) -> Result<LeveneCenter> {
    match s.to_lowercase().as_str() {
        "median" => Ok(LeveneCenter::Median),
        "mean" => Ok(LeveneCenter::Mean),
        _ => anyhow::bail!("unknown Levene center '{}' — expected median or mean", s),
    }
}

fn load_table(input: &PathBuf) -> Result<Table> {
    tracing::info!(path = %input.display(), "loading table");
    let table = Table::read_csv(input)?;
    tracing::info!(rows = table.n_rows(), cols = table.n_cols(), "table loaded");
    Ok(table)
}

fn banner(title: &str) {
    println!("{:~^70}", format!(" {title} "));
}

// ---------------------------------------------------------------------------
// summary
// ---------------------------------------------------------------------------

pub fn cmd_summary(input: &PathBuf, head: usize, output: Option<&PathBuf>) -> Result<()> {
    let table = load_table(input)?;

    banner("SHAPE");
    println!("{} rows x {} columns", table.n_rows(), table.n_cols());

    banner("TYPES");
    for (name, col) in table.columns() {
        println!("{name}: {}", col.dtype());
    }

    banner("HEAD");
    println!("{}", table.head_text(head));

    banner("MISSING VALUES");
    for (name, count) in table.missing_counts() {
        println!("{name}: {count}");
    }

    banner("DESCRIBE");
    let mut describe = serde_json::Map::new();
    for (name, col) in table.columns() {
        if let Column::Float(cells) = col {
            let values: Vec<f64> = cells.iter().flatten().copied().collect();
            if values.is_empty() {
                continue;
            }
            let s = summarize(&values)?;
            println!(
                "{name}: count={} mean={:.5} std={:.5} min={:.5} 25%={:.5} 50%={:.5} 75%={:.5} max={:.5}",
                s.count, s.mean, s.std, s.min, s.q25, s.median, s.q75, s.max
            );
            describe.insert(name.clone(), serde_json::to_value(&s)?);
        }
    }

    let output_json = serde_json::json!({
        "shape": { "rows": table.n_rows(), "cols": table.n_cols() },
        "dtypes": table.columns()
            .map(|(n, c)| (n.clone(), c.dtype()))
            .collect::<std::collections::BTreeMap<_, _>>(),
        "missing": table.missing_counts().into_iter()
            .collect::<std::collections::BTreeMap<_, _>>(),
        "describe": describe,
    });

    if output.is_some() {
        write_json(output, output_json)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// compare / anova
// ---------------------------------------------------------------------------

fn load_groups(
    input: &PathBuf,
    group: &str,
    value: &str,
) -> Result<Vec<(String, Vec<f64>)>> {
    let table = load_table(input)?;
    let clean = table.drop_nulls();
    tracing::info!(
        dropped = table.n_rows() - clean.n_rows(),
        remaining = clean.n_rows(),
        "dropped rows with missing values"
    );
    clean.numeric_by_group(group, value)
}

fn print_assumptions(
    normality: &[cs_inference::NormalityCheck],
    homogeneity: &cs_core::TestOutcome,
    variant: TestVariant,
) {
    banner("ASSUMPTION CHECKS");
    for check in normality {
        println!(
            "Shapiro-Wilk [{}]: Test Stat = {:.4}, p-value = {:.4} ({})",
            check.group,
            check.outcome.statistic,
            check.outcome.p_value,
            if check.normal { "normal" } else { "non-normal" }
        );
    }
    println!(
        "Levene: Test Stat = {:.4}, p-value = {:.4}",
        homogeneity.statistic, homogeneity.p_value
    );
    println!(
        "Selected: {}",
        match variant {
            TestVariant::Parametric => "parametric",
            TestVariant::NonParametric => "non-parametric",
        }
    );
}

pub fn cmd_compare(
    input: &PathBuf,
    group: &str,
    value: &str,
    alpha: f64,
    policy_str: &str,
    center_str: &str,
    output: Option<&PathBuf>,
) -> Result<()> {
    let policy = parse_policy(policy_str)?;
    let center = parse_center(center_str)?;
    let groups = load_groups(input, group, value)?;

    let report: TwoGroupReport = two_group_report(&groups, alpha, policy, center)?;

    banner("GROUPS");
    for g in &report.groups {
        println!("{}: n = {}, mean = {:.5}", g.label, g.n, g.mean);
    }
    print_assumptions(&report.normality, &report.homogeneity, report.variant);

    banner("RESULT");
    println!(
        "{}: Test Stat = {:.4}, p-value = {:.4}",
        report.test_name, report.test.statistic, report.test.p_value
    );
    if report.reject_null {
        println!("Reject null hypothesis at alpha = {}", report.alpha);
    } else {
        println!("Fail to reject null hypothesis at alpha = {}", report.alpha);
    }

    if output.is_some() {
        write_json(output, serde_json::to_value(&report)?)?;
    }
    Ok(())
}

pub fn cmd_anova(
    input: &PathBuf,
    group: &str,
    value: &str,
    alpha: f64,
    policy_str: &str,
    center_str: &str,
    output: Option<&PathBuf>,
) -> Result<()> {
    let policy = parse_policy(policy_str)?;
    let center = parse_center(center_str)?;
    let groups = load_groups(input, group, value)?;

    let report: KGroupReport = k_group_report(&groups, alpha, policy, center)?;

    banner("GROUPS");
    for g in &report.groups {
        println!("{}: n = {}, mean = {:.5}", g.label, g.n, g.mean);
    }
    print_assumptions(&report.normality, &report.homogeneity, report.variant);

    banner("RESULT");
    println!(
        "{}: Test Stat = {:.4}, p-value = {:.4}",
        report.test_name, report.test.statistic, report.test.p_value
    );
    if report.reject_null {
        println!("Reject null hypothesis at alpha = {}", report.alpha);
    } else {
        println!("Fail to reject null hypothesis at alpha = {}", report.alpha);
    }

    if output.is_some() {
        write_json(output, serde_json::to_value(&report)?)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// posthoc
// ---------------------------------------------------------------------------

pub fn cmd_posthoc(
    input: &PathBuf,
    group: &str,
    value: &str,
    alpha: f64,
    output: Option<&PathBuf>,
) -> Result<()> {
    let groups = load_groups(input, group, value)?;
    let report = tukey_hsd(&groups, alpha)?;

    banner("TUKEY HSD");
    println!(
        "{:>8} {:>8} {:>10} {:>8} {:>10} {:>10} {:>7}",
        "group1", "group2", "meandiff", "p-adj", "lower", "upper", "reject"
    );
    for pw in &report.pairwise {
        println!(
            "{:>8} {:>8} {:>10.4} {:>8.4} {:>10.4} {:>10.4} {:>7}",
            pw.group_a, pw.group_b, pw.mean_diff, pw.p_adjusted, pw.ci_lower, pw.ci_upper, pw.reject
        );
    }

    if output.is_some() {
        write_json(output, serde_json::to_value(&report)?)?;
    }
    Ok(())
}
