//! Synthetic fallback alerts
//!
//! Keeps the feed moving while the backend is unreachable.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::logic::alert::{RawAlert, RawTimestamp};

const SYNTHETIC_EVENT_TYPE: &str = "Demo Alert";
const SYNTHETIC_ATTACK_TYPES: [&str; 3] = ["SQL Injection", "XSS Attack", "Bot Attack"];

/// Generates plausible alert records. No id: the normalizer assigns one.
#[derive(Debug)]
pub struct SyntheticGenerator {
    rng: StdRng,
}

impl SyntheticGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sequence, for tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn next_alert(&mut self, now: DateTime<Utc>) -> RawAlert {
        let host: u8 = self.rng.gen_range(0..255);
        let score: f64 = self.rng.gen_range(0.5..1.0);
        let attack_type = SYNTHETIC_ATTACK_TYPES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(SYNTHETIC_ATTACK_TYPES[0]);

        RawAlert {
            id: None,
            timestamp: Some(RawTimestamp::Text(now.to_rfc3339())),
            source_ip: Some(format!("192.168.1.{}", host)),
            anomaly_score: Some(score),
            event_type: Some(SYNTHETIC_EVENT_TYPE.to_string()),
            attack_type: Some(attack_type.to_string()),
        }
    }
}

impl Default for SyntheticGenerator {
    fn default() -> Self {
        Self::new()
    }
}
