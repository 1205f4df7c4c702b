//! Alert Types
//!
//! Core types for alert ingestion.
//! No classification logic here - only data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::classify;
use super::severity::severity_for;

// ============================================================================
// SEVERITY
// ============================================================================

/// Four-level severity derived from the anomaly score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Critical => "🔴",
            Severity::High => "🟠",
            Severity::Medium => "🟡",
            Severity::Low => "🟢",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Severity::Critical => "#dc2626", // Red
            Severity::High => "#ea580c",     // Orange
            Severity::Medium => "#ca8a04",   // Yellow
            Severity::Low => "#16a34a",      // Green
        }
    }

    /// Critical and high count towards the "high severity" KPI
    pub fn is_high(&self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ATTACK CATEGORY
// ============================================================================

/// Bucket used by the lifetime tally
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AttackCategory {
    #[serde(rename = "SQL Injection")]
    SqlInjection,
    #[serde(rename = "XSS Attack")]
    XssAttack,
    #[serde(rename = "Bot Attack")]
    BotAttack,
    #[serde(rename = "Directory Traversal")]
    DirectoryTraversal,
    #[serde(rename = "Command Injection")]
    CommandInjection,
    #[serde(rename = "Normal Traffic")]
    NormalTraffic,
}

impl AttackCategory {
    /// Display order, also the tally slot order
    pub const ALL: [AttackCategory; 6] = [
        AttackCategory::SqlInjection,
        AttackCategory::XssAttack,
        AttackCategory::BotAttack,
        AttackCategory::DirectoryTraversal,
        AttackCategory::CommandInjection,
        AttackCategory::NormalTraffic,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AttackCategory::SqlInjection => "SQL Injection",
            AttackCategory::XssAttack => "XSS Attack",
            AttackCategory::BotAttack => "Bot Attack",
            AttackCategory::DirectoryTraversal => "Directory Traversal",
            AttackCategory::CommandInjection => "Command Injection",
            AttackCategory::NormalTraffic => "Normal Traffic",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            AttackCategory::SqlInjection => "#ef4444",
            AttackCategory::XssAttack => "#f97316",
            AttackCategory::BotAttack => "#eab308",
            AttackCategory::DirectoryTraversal => "#8b5cf6",
            AttackCategory::CommandInjection => "#ec4899",
            AttackCategory::NormalTraffic => "#22c55e",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            AttackCategory::SqlInjection => 0,
            AttackCategory::XssAttack => 1,
            AttackCategory::BotAttack => 2,
            AttackCategory::DirectoryTraversal => 3,
            AttackCategory::CommandInjection => 4,
            AttackCategory::NormalTraffic => 5,
        }
    }

    pub fn is_attack(&self) -> bool {
        *self != AttackCategory::NormalTraffic
    }
}

impl std::fmt::Display for AttackCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// RAW ALERT (inbound)
// ============================================================================

/// Identity as sent by the backend; database ids arrive as numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    pub fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Timestamp as sent by the backend: ISO-8601 text or epoch seconds / millis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Text(String),
    Epoch(f64),
}

/// Loosely-typed alert record. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAlert {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RawId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<RawTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anomaly_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_type: Option<String>,
}

// ============================================================================
// ALERT (canonical)
// ============================================================================

/// Normalized alert. Severity and category are derived on construction
/// and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    id: String,
    timestamp: DateTime<Utc>,
    source_ip: String,
    anomaly_score: f64,
    event_type: String,
    attack_type: String,
    severity: Severity,
    category: AttackCategory,
}

impl Alert {
    pub fn new(
        id: String,
        timestamp: DateTime<Utc>,
        source_ip: String,
        anomaly_score: f64,
        event_type: String,
        attack_type: String,
    ) -> Self {
        let severity = severity_for(anomaly_score);
        let category = classify(&attack_type);
        Self {
            id,
            timestamp,
            source_ip,
            anomaly_score,
            event_type,
            attack_type,
            severity,
            category,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn source_ip(&self) -> &str {
        &self.source_ip
    }

    pub fn anomaly_score(&self) -> f64 {
        self.anomaly_score
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn attack_type(&self) -> &str {
        &self.attack_type
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn category(&self) -> AttackCategory {
        self.category
    }

    /// Relative age for the alert feed: "42s ago", "5m ago", "3h ago"
    pub fn age_label(&self, now: DateTime<Utc>) -> String {
        let secs = (now - self.timestamp).num_seconds().max(0);
        let mins = secs / 60;
        if secs < 60 {
            format!("{}s ago", secs)
        } else if mins < 60 {
            format!("{}m ago", mins)
        } else {
            format!("{}h ago", mins / 60)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn alert_at(ts: DateTime<Utc>) -> Alert {
        Alert::new(
            "a-1".to_string(),
            ts,
            "10.0.0.1".to_string(),
            0.85,
            "Probe".to_string(),
            "SQL Injection".to_string(),
        )
    }

    #[test]
    fn test_derived_fields_follow_inputs() {
        let alert = alert_at(Utc::now());
        assert_eq!(alert.severity(), Severity::Critical);
        assert_eq!(alert.category(), AttackCategory::SqlInjection);
    }

    #[test]
    fn test_raw_alert_accepts_partial_payloads() {
        let raw: RawAlert = serde_json::from_str(r#"{"anomaly_score": 0.7}"#).unwrap();
        assert_eq!(raw.anomaly_score, Some(0.7));
        assert!(raw.id.is_none());
        assert!(raw.source_ip.is_none());

        let raw: RawAlert =
            serde_json::from_str(r#"{"id": 42, "timestamp": 1700000000, "anomaly_score": null}"#).unwrap();
        assert_eq!(raw.id.map(RawId::into_string), Some("42".to_string()));
        assert_eq!(raw.timestamp, Some(RawTimestamp::Epoch(1_700_000_000.0)));
        assert!(raw.anomaly_score.is_none());
    }

    #[test]
    fn test_age_label() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(alert_at(now - Duration::seconds(42)).age_label(now), "42s ago");
        assert_eq!(alert_at(now - Duration::minutes(5)).age_label(now), "5m ago");
        assert_eq!(alert_at(now - Duration::minutes(185)).age_label(now), "3h ago");
        // Clock skew from the backend never shows negative ages
        assert_eq!(alert_at(now + Duration::seconds(30)).age_label(now), "0s ago");
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&AttackCategory::DirectoryTraversal).unwrap();
        assert_eq!(json, "\"Directory Traversal\"");
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
    }
}
