//! Traffic chart series & alert rate window

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// One sample on the traffic chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficPoint {
    pub at: DateTime<Utc>,
    /// Resident alerts stamped within the recent window
    pub recent_alerts: usize,
    /// Accepted alerts over the last minute
    pub alerts_per_minute: usize,
}

impl TrafficPoint {
    /// Anomaly marker is only drawn when something happened
    pub fn anomaly_marker(&self) -> Option<usize> {
        (self.recent_alerts > 0).then_some(self.recent_alerts)
    }

    pub fn label(&self) -> String {
        self.at.format("%H:%M:%S").to_string()
    }
}

/// Fixed-length chart series, oldest point dropped first
#[derive(Debug, Clone)]
pub struct TrafficSeries {
    points: VecDeque<TrafficPoint>,
    cap: usize,
}

impl TrafficSeries {
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            points: VecDeque::with_capacity(cap + 1),
            cap,
        }
    }

    pub fn push(&mut self, point: TrafficPoint) {
        self.points.push_back(point);
        while self.points.len() > self.cap {
            self.points.pop_front();
        }
    }

    /// Oldest first
    pub fn points(&self) -> impl Iterator<Item = &TrafficPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

/// Sliding window of acceptance instants
#[derive(Debug, Clone)]
pub struct RateWindow {
    hits: VecDeque<DateTime<Utc>>,
    window: Duration,
}

impl RateWindow {
    pub fn new(window: Duration) -> Self {
        Self {
            hits: VecDeque::new(),
            window,
        }
    }

    pub fn record(&mut self, at: DateTime<Utc>) {
        self.hits.push_back(at);
        self.prune(at);
    }

    /// Hits within the window ending at `now`
    pub fn count(&mut self, now: DateTime<Utc>) -> usize {
        self.prune(now);
        self.hits.len()
    }

    fn prune(&mut self, now: DateTime<Utc>) {
        while let Some(oldest) = self.hits.front() {
            if now - *oldest >= self.window {
                self.hits.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn clear(&mut self) {
        self.hits.clear();
    }
}
