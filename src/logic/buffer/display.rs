//! Display Buffer - newest-first window of recent alerts
//!
//! Counts here are windowed: eviction lowers them.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::logic::alert::{Alert, Severity};

#[derive(Debug, Clone)]
pub struct DisplayBuffer {
    alerts: VecDeque<Alert>,
    cap: usize,
}

/// Resident alert counts per severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl SeverityCounts {
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Low => self.low,
            Severity::Medium => self.medium,
            Severity::High => self.high,
            Severity::Critical => self.critical,
        }
    }

    fn bump(&mut self, severity: Severity) {
        match severity {
            Severity::Low => self.low += 1,
            Severity::Medium => self.medium += 1,
            Severity::High => self.high += 1,
            Severity::Critical => self.critical += 1,
        }
    }
}

impl DisplayBuffer {
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            alerts: VecDeque::with_capacity(cap + 1),
            cap,
        }
    }

    /// Prepend; returns the evicted tail entry, if any
    pub fn insert(&mut self, alert: Alert) -> Option<Alert> {
        self.alerts.push_front(alert);
        if self.alerts.len() > self.cap {
            self.alerts.pop_back()
        } else {
            None
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn total_count(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.alerts.iter().any(|a| a.id() == id)
    }

    /// Newest first
    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    pub fn latest(&self, n: usize) -> Vec<Alert> {
        self.alerts.iter().take(n).cloned().collect()
    }

    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.alerts.iter().filter(|a| a.severity() == severity).count()
    }

    pub fn severity_counts(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for alert in &self.alerts {
            counts.bump(alert.severity());
        }
        counts
    }

    /// Critical + high
    pub fn high_severity_count(&self) -> usize {
        self.alerts.iter().filter(|a| a.severity().is_high()).count()
    }

    /// Resident alerts whose own timestamp falls within `window` of `now`
    pub fn recent_count(&self, now: DateTime<Utc>, window: Duration) -> usize {
        self.alerts
            .iter()
            .filter(|a| now - a.timestamp() < window)
            .count()
    }

    pub fn clear(&mut self) {
        self.alerts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(id: &str, score: f64) -> Alert {
        Alert::new(
            id.to_string(),
            Utc::now(),
            "10.1.1.1".to_string(),
            score,
            "Test".to_string(),
            "Bot Attack".to_string(),
        )
    }

    #[test]
    fn test_cap_plus_one_evicts_oldest() {
        let mut buffer = DisplayBuffer::new(3);
        for i in 0..3 {
            assert!(buffer.insert(alert(&format!("a{}", i), 0.5)).is_none());
        }
        let evicted = buffer.insert(alert("a3", 0.5)).unwrap();

        assert_eq!(evicted.id(), "a0");
        assert_eq!(buffer.total_count(), 3);
        let ids: Vec<&str> = buffer.iter().map(|a| a.id()).collect();
        assert_eq!(ids, vec!["a3", "a2", "a1"]);
    }

    #[test]
    fn test_counts_reflect_residents_only() {
        let mut buffer = DisplayBuffer::new(2);
        buffer.insert(alert("crit", 0.95));
        buffer.insert(alert("low", 0.1));
        assert_eq!(buffer.count_by_severity(Severity::Critical), 1);
        assert_eq!(buffer.high_severity_count(), 1);

        // Evicts "crit"
        buffer.insert(alert("med", 0.45));
        assert_eq!(buffer.count_by_severity(Severity::Critical), 0);
        assert_eq!(buffer.high_severity_count(), 0);

        let counts = buffer.severity_counts();
        assert_eq!(counts.low, 1);
        assert_eq!(counts.medium, 1);
        assert_eq!(counts.get(Severity::Critical), 0);
    }

    #[test]
    fn test_contains_and_latest() {
        let mut buffer = DisplayBuffer::new(10);
        buffer.insert(alert("x", 0.3));
        buffer.insert(alert("y", 0.3));
        assert!(buffer.contains("x"));
        assert!(!buffer.contains("z"));
        assert_eq!(buffer.latest(1)[0].id(), "y");
    }

    #[test]
    fn test_zero_cap_is_raised_to_one() {
        let mut buffer = DisplayBuffer::new(0);
        buffer.insert(alert("a", 0.3));
        buffer.insert(alert("b", 0.3));
        assert_eq!(buffer.cap(), 1);
        assert_eq!(buffer.latest(5).len(), 1);
    }
}
