//! Severity mapping
//!
//! Thresholds are inclusive lower bounds on the anomaly score.

use super::types::Severity;

pub const CRITICAL_MIN: f64 = 0.8;
pub const HIGH_MIN: f64 = 0.6;
pub const MEDIUM_MIN: f64 = 0.4;

/// Map an anomaly score to a severity level
pub fn severity_for(score: f64) -> Severity {
    if score >= CRITICAL_MIN {
        Severity::Critical
    } else if score >= HIGH_MIN {
        Severity::High
    } else if score >= MEDIUM_MIN {
        Severity::Medium
    } else {
        Severity::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_inclusive() {
        assert_eq!(severity_for(0.8), Severity::Critical);
        assert_eq!(severity_for(0.7999), Severity::High);
        assert_eq!(severity_for(0.6), Severity::High);
        assert_eq!(severity_for(0.5999), Severity::Medium);
        assert_eq!(severity_for(0.4), Severity::Medium);
        assert_eq!(severity_for(0.3999), Severity::Low);
        assert_eq!(severity_for(0.0), Severity::Low);
        assert_eq!(severity_for(1.0), Severity::Critical);
    }

    #[test]
    fn test_monotonic_over_unit_interval() {
        let mut previous = severity_for(0.0);
        for step in 0..=10_000 {
            let current = severity_for(step as f64 / 10_000.0);
            assert!(current >= previous, "severity dropped at step {}", step);
            previous = current;
        }
    }

    #[test]
    fn test_equal_scores_equal_severity() {
        for score in [0.12, 0.45, 0.61, 0.93] {
            assert_eq!(severity_for(score), severity_for(score));
        }
    }
}
