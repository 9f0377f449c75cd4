//! Summarises the login check from the metrics Goose collected.

use goose::metrics::GooseMetrics;
use num_format::{Locale, ToFormattedString};
use serde::Serialize;
use std::fmt;

use crate::login::CHECK_NAME;

/// Passed and failed checks over a whole load test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    pub name: String,
    pub passed: usize,
    pub failed: usize,
}

impl CheckSummary {
    pub fn new(name: &str, passed: usize, failed: usize) -> Self {
        CheckSummary {
            name: name.to_string(),
            passed,
            failed,
        }
    }

    /// Tally the login check for requests to `path`.
    ///
    /// Goose aggregates requests as `"{method} {name}"`; every login is a POST and
    /// every failed check marked its request as failed, so successes are passed checks.
    pub fn from_metrics(metrics: &GooseMetrics, path: &str) -> Self {
        match metrics.requests.get(&format!("POST {}", path)) {
            Some(aggregate) => {
                CheckSummary::new(CHECK_NAME, aggregate.success_count, aggregate.fail_count)
            }
            None => CheckSummary::new(CHECK_NAME, 0, 0),
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    /// Share of passed checks, from 0.0 to 1.0. Zero when nothing ran.
    pub fn pass_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.passed as f64 / total as f64,
        }
    }
}

impl fmt::Display for CheckSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.total() == 0 {
            return write!(f, "- {}\n  ↳ no requests completed", self.name);
        }
        let mark = if self.failed == 0 { "✓" } else { "✗" };
        write!(
            f,
            "{} {}\n  ↳ {:.2}% passed: ✓ {} / ✗ {}",
            mark,
            self.name,
            self.pass_rate() * 100.0,
            self.passed.to_formatted_string(&Locale::en),
            self.failed.to_formatted_string(&Locale::en),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_rate() {
        assert_eq!(CheckSummary::new(CHECK_NAME, 0, 0).pass_rate(), 0.0);
        assert_eq!(CheckSummary::new(CHECK_NAME, 10, 0).pass_rate(), 1.0);
        assert_eq!(CheckSummary::new(CHECK_NAME, 0, 10).pass_rate(), 0.0);
        assert_eq!(CheckSummary::new(CHECK_NAME, 3, 1).pass_rate(), 0.75);
    }

    #[test]
    fn display() {
        assert_eq!(
            CheckSummary::new(CHECK_NAME, 12_345, 0).to_string(),
            "✓ status is 200\n  ↳ 100.00% passed: ✓ 12,345 / ✗ 0"
        );
        assert_eq!(
            CheckSummary::new(CHECK_NAME, 1, 3).to_string(),
            "✗ status is 200\n  ↳ 25.00% passed: ✓ 1 / ✗ 3"
        );
        assert_eq!(
            CheckSummary::new(CHECK_NAME, 0, 0).to_string(),
            "- status is 200\n  ↳ no requests completed"
        );
    }
}
