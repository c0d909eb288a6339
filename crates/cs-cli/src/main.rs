//! cohortstat CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod analyze;
mod table;

#[derive(Parser)]
#[command(name = "cohortstat")]
#[command(about = "cohortstat - Group comparison over tabular cohort data")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe a table: shape, column types, head, missing cells, summaries
    Summary {
        /// Input table (CSV/TSV with a header row)
        #[arg(short, long)]
        input: PathBuf,

        /// Number of leading rows to print
        #[arg(long, default_value = "5")]
        head: usize,

        /// Output file for results (pretty JSON). Defaults to stdout-only text.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Two-group comparison with automatic parametric/rank-based selection
    Compare {
        /// Input table (CSV/TSV with a header row)
        #[arg(short, long)]
        input: PathBuf,

        /// Categorical column defining the two groups
        #[arg(short, long)]
        group: String,

        /// Numeric column to compare
        #[arg(short, long)]
        value: String,

        /// Significance level for all checks and the final test
        #[arg(long, default_value_t = cs_inference::DEFAULT_ALPHA)]
        alpha: f64,

        /// Normality policy: any (one non-normal group suffices) or all
        #[arg(long, default_value = "any")]
        policy: String,

        /// Levene centering: median (Brown-Forsythe) or mean
        #[arg(long, default_value = "median")]
        center: String,

        /// Output file for the report (pretty JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Multi-group comparison (one-way ANOVA or Kruskal-Wallis)
    Anova {
        /// Input table (CSV/TSV with a header row)
        #[arg(short, long)]
        input: PathBuf,

        /// Categorical column defining the groups
        #[arg(short, long)]
        group: String,

        /// Numeric column to compare
        #[arg(short, long)]
        value: String,

        /// Significance level for all checks and the final test
        #[arg(long, default_value_t = cs_inference::DEFAULT_ALPHA)]
        alpha: f64,

        /// Normality policy: any (one non-normal group suffices) or all
        #[arg(long, default_value = "any")]
        policy: String,

        /// Levene centering: median (Brown-Forsythe) or mean
        #[arg(long, default_value = "median")]
        center: String,

        /// Output file for the report (pretty JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Tukey HSD pairwise post-hoc comparison
    Posthoc {
        /// Input table (CSV/TSV with a header row)
        #[arg(short, long)]
        input: PathBuf,

        /// Categorical column defining the groups
        #[arg(short, long)]
        group: String,

        /// Numeric column to compare
        #[arg(short, long)]
        value: String,

        /// Family-wise significance level
        #[arg(long, default_value_t = cs_inference::DEFAULT_ALPHA)]
        alpha: f64,

        /// Output file for the report (pretty JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::Summary { input, head, output } => {
            analyze::cmd_summary(&input, head, output.as_ref())
        }
        Commands::Compare { input, group, value, alpha, policy, center, output } => {
            analyze::cmd_compare(&input, &group, &value, alpha, &policy, &center, output.as_ref())
        }
        Commands::Anova { input, group, value, alpha, policy, center, output } => {
            analyze::cmd_anova(&input, &group, &value, alpha, &policy, &center, output.as_ref())
        }
        Commands::Posthoc { input, group, value, alpha, output } => {
            analyze::cmd_posthoc(&input, &group, &value, alpha, output.as_ref())
        }
        Commands::Version => {
            println!("cohortstat {}", cs_core::VERSION);
            Ok(())
        }
    }
}

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
