//! Common data types for cohortstat

use serde::{Deserialize, Serialize};

/// Outcome of a single hypothesis test: the test statistic and its p-value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Value of the test statistic (W, U, H, t, F, ... depending on the test).
    pub statistic: f64,

    /// Two-sided p-value in [0, 1].
    pub p_value: f64,
}

impl TestOutcome {
    /// Create a new test outcome.
    pub fn new(statistic: f64, p_value: f64) -> Self {
        Self { statistic, p_value }
    }

    /// Whether the null hypothesis is rejected at significance level `alpha`.
    pub fn reject_at(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_at() {
        let outcome = TestOutcome::new(7.51, 0.0234);
        assert!(outcome.reject_at(0.05));
        assert!(!outcome.reject_at(0.01));
    }
}
