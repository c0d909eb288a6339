//! Descriptive statistics over numeric samples.

use cs_core::{Error, Result};
use serde::Serialize;

/// Moments-plus-quartiles summary of one numeric sample.
#[derive(Debug, Clone, Serialize)]
pub struct SampleSummary {
    /// Number of observations.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Unbiased sample standard deviation (n-1 denominator); 0 for n < 2.
    pub std: f64,
    /// Minimum.
    pub min: f64,
    /// Lower quartile (linear interpolation).
    pub q25: f64,
    /// Median.
    pub median: f64,
    /// Upper quartile.
    pub q75: f64,
    /// Maximum.
    pub max: f64,
}

/// Per-group label / size / mean triple used in comparison reports.
#[derive(Debug, Clone, Serialize)]
pub struct GroupLevelSummary {
    /// Group label.
    pub label: String,
    /// Number of observations in the group.
    pub n: usize,
    /// Group mean.
    pub mean: f64,
}

/// Arithmetic mean. Returns 0 for an empty slice.
pub fn mean(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    x.iter().sum::<f64>() / x.len() as f64
}

/// Unbiased sample variance (n-1 denominator). Returns 0 for n < 2.
pub fn sample_variance(x: &[f64]) -> f64 {
    let n = x.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(x);
    x.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (n - 1) as f64
}

/// Unbiased sample standard deviation.
pub fn sample_std(x: &[f64]) -> f64 {
    sample_variance(x).sqrt()
}

/// Quantile by linear interpolation between order statistics (R type 7).
/// `q` must be in [0, 1].
pub fn quantile(x: &[f64], q: f64) -> Result<f64> {
    if x.is_empty() {
        return Err(Error::Validation("quantile of an empty sample".to_string()));
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(Error::Validation(format!("quantile level must be in [0, 1], got {q}")));
    }
    let mut sorted = x.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Sample median (50% quantile, linear interpolation).
pub fn median(x: &[f64]) -> Result<f64> {
    quantile(x, 0.5)
}

/// Validate that a sample is non-empty and fully finite.
pub(crate) fn validate_sample(name: &str, x: &[f64]) -> Result<()> {
    if x.is_empty() {
        return Err(Error::Validation(format!("{name} must be non-empty")));
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(Error::Validation(format!("{name} must contain only finite values")));
    }
    Ok(())
}

/// Full descriptive summary of a sample.
pub fn summarize(x: &[f64]) -> Result<SampleSummary> {
    validate_sample("sample", x)?;
    let mut sorted = x.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    Ok(SampleSummary {
        count: x.len(),
        mean: mean(x),
        std: sample_std(x),
        min: sorted[0],
        q25: quantile(x, 0.25)?,
        median: quantile(x, 0.5)?,
        q75: quantile(x, 0.75)?,
        max: sorted[sorted.len() - 1],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_variance() {
        let x = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&x) - 5.0).abs() < 1e-12);
        // Sum of squared deviations = 32, n-1 = 7.
        assert!((sample_variance(&x) - 32.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_interpolation() {
        let x = [1.0, 2.0, 3.0, 4.0];
        // pos = 0.25 * 3 = 0.75 -> 1 + 0.75 * (2 - 1) = 1.75
        assert!((quantile(&x, 0.25).unwrap() - 1.75).abs() < 1e-12);
        assert!((quantile(&x, 0.5).unwrap() - 2.5).abs() < 1e-12);
        assert!((quantile(&x, 1.0).unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_summarize() {
        let x = [3.0, 1.0, 2.0, 5.0, 4.0];
        let s = summarize(&x).unwrap();
        assert_eq!(s.count, 5);
        assert!((s.mean - 3.0).abs() < 1e-12);
        assert!((s.min - 1.0).abs() < 1e-12);
        assert!((s.median - 3.0).abs() < 1e-12);
        assert!((s.max - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_sample_rejected() {
        assert!(summarize(&[]).is_err());
        assert!(quantile(&[], 0.5).is_err());
    }
}
