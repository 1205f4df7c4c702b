//! Alert Normalizer
//!
//! Turns a partially populated `RawAlert` into a canonical `Alert`.
//! Dedup is not done here: the pipeline owns the seen-id set.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use super::types::{Alert, RawAlert, RawTimestamp};
use crate::constants::{DEFAULT_ATTACK_TYPE, DEFAULT_EVENT_TYPE, DEFAULT_SCORE, UNKNOWN_SOURCE_IP};

/// Epoch values above this are treated as milliseconds
const EPOCH_MILLIS_THRESHOLD: f64 = 1e12;

#[derive(Debug, Default)]
pub struct AlertNormalizer {
    next_seq: u64,
}

impl AlertNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill defaults and derive severity/category
    pub fn normalize(&mut self, raw: RawAlert, received_at: DateTime<Utc>) -> Alert {
        let id = raw
            .id
            .map(|id| id.into_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| self.synthesize_id(received_at));

        Alert::new(
            id,
            parse_timestamp(raw.timestamp, received_at),
            non_empty_or(raw.source_ip, UNKNOWN_SOURCE_IP),
            normalize_score(raw.anomaly_score),
            non_empty_or(raw.event_type, DEFAULT_EVENT_TYPE),
            non_empty_or(raw.attack_type, DEFAULT_ATTACK_TYPE),
        )
    }

    /// `alert_<millis>_<seq>`: two id-less records in the same millisecond stay distinct
    fn synthesize_id(&mut self, received_at: DateTime<Utc>) -> String {
        let seq = self.next_seq;
        self.next_seq += 1;
        format!("alert_{}_{}", received_at.timestamp_millis(), seq)
    }
}

/// Missing or non-finite scores take the default; the rest is clamped to [0, 1]
pub fn normalize_score(score: Option<f64>) -> f64 {
    match score {
        Some(s) if s.is_finite() => s.clamp(0.0, 1.0),
        _ => DEFAULT_SCORE,
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_timestamp(raw: Option<RawTimestamp>, received_at: DateTime<Utc>) -> DateTime<Utc> {
    match raw {
        Some(RawTimestamp::Text(text)) => parse_text_timestamp(&text).unwrap_or_else(|| {
            log::debug!("Unparseable alert timestamp {:?}, using receipt time", text);
            received_at
        }),
        Some(RawTimestamp::Epoch(value)) if value.is_finite() && value >= 0.0 => {
            let millis = if value > EPOCH_MILLIS_THRESHOLD {
                value
            } else {
                value * 1000.0
            };
            Utc.timestamp_millis_opt(millis as i64)
                .single()
                .unwrap_or(received_at)
        }
        _ => received_at,
    }
}

fn parse_text_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    // Naive ISO-8601 (no offset) is taken as UTC
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::alert::types::{AttackCategory, RawId, Severity};

    fn received() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_defaults_for_empty_record() {
        let mut normalizer = AlertNormalizer::new();
        let alert = normalizer.normalize(RawAlert::default(), received());

        assert_eq!(alert.id(), format!("alert_{}_0", received().timestamp_millis()));
        assert_eq!(alert.timestamp(), received());
        assert_eq!(alert.source_ip(), "unknown");
        assert_eq!(alert.anomaly_score(), 0.5);
        assert_eq!(alert.event_type(), "Anomaly Detected");
        assert_eq!(alert.attack_type(), "Unknown");
        assert_eq!(alert.severity(), Severity::Medium);
        assert_eq!(alert.category(), AttackCategory::NormalTraffic);
    }

    #[test]
    fn test_synthesized_ids_are_unique_within_a_millisecond() {
        let mut normalizer = AlertNormalizer::new();
        let a = normalizer.normalize(RawAlert::default(), received());
        let b = normalizer.normalize(RawAlert::default(), received());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_populated_record_is_kept() {
        let raw = RawAlert {
            id: Some(RawId::Text("evt-9".to_string())),
            timestamp: Some(RawTimestamp::Text("2024-03-10T08:00:00Z".to_string())),
            source_ip: Some("203.0.113.7".to_string()),
            anomaly_score: Some(0.91),
            event_type: Some("Suspicious request".to_string()),
            attack_type: Some("XSS".to_string()),
        };
        let alert = AlertNormalizer::new().normalize(raw, received());

        assert_eq!(alert.id(), "evt-9");
        assert_eq!(alert.timestamp(), Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap());
        assert_eq!(alert.source_ip(), "203.0.113.7");
        assert_eq!(alert.severity(), Severity::Critical);
        assert_eq!(alert.category(), AttackCategory::XssAttack);
    }

    #[test]
    fn test_empty_strings_count_as_missing() {
        let raw = RawAlert {
            id: Some(RawId::Text(String::new())),
            source_ip: Some(String::new()),
            event_type: Some(String::new()),
            ..Default::default()
        };
        let alert = AlertNormalizer::new().normalize(raw, received());
        assert!(alert.id().starts_with("alert_"));
        assert_eq!(alert.source_ip(), "unknown");
        assert_eq!(alert.event_type(), "Anomaly Detected");
    }

    #[test]
    fn test_score_normalization() {
        assert_eq!(normalize_score(None), 0.5);
        assert_eq!(normalize_score(Some(f64::NAN)), 0.5);
        assert_eq!(normalize_score(Some(0.0)), 0.0);
        assert_eq!(normalize_score(Some(1.7)), 1.0);
        assert_eq!(normalize_score(Some(-0.2)), 0.0);
        assert_eq!(normalize_score(Some(0.42)), 0.42);
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap();

        let naive = parse_timestamp(
            Some(RawTimestamp::Text("2023-11-14T22:13:20.250".to_string())),
            received(),
        );
        assert_eq!(naive.timestamp(), expected.timestamp());

        let offset = parse_timestamp(
            Some(RawTimestamp::Text("2023-11-15T00:13:20+02:00".to_string())),
            received(),
        );
        assert_eq!(offset, expected);

        let secs = parse_timestamp(Some(RawTimestamp::Epoch(1_700_000_000.0)), received());
        assert_eq!(secs, expected);

        let millis = parse_timestamp(Some(RawTimestamp::Epoch(1_700_000_000_000.0)), received());
        assert_eq!(millis, expected);

        let garbage = parse_timestamp(Some(RawTimestamp::Text("yesterday".to_string())), received());
        assert_eq!(garbage, received());
    }
}
