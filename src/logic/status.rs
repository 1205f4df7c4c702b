//! Connection & backend status indicators
//!
//! Side channel only: nothing in the alert flow depends on these values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transport health shown next to the alert feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Degraded,
    Offline,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "🟢 PROTECTED",
            ConnectionStatus::Degraded => "🟡 DEGRADED",
            ConnectionStatus::Offline => "🔴 OFFLINE",
        }
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Degraded => "degraded",
            ConnectionStatus::Offline => "offline",
        };
        write!(f, "{}", s)
    }
}

/// `GET /api/v1/status` body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub system_status: Option<String>,
    #[serde(default)]
    pub ml_models_loaded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendHealth {
    Operational,
    Degraded,
    Offline,
}

/// Last result of the backend status probe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendStatus {
    pub health: BackendHealth,
    pub ml_models_loaded: bool,
    pub checked_at: DateTime<Utc>,
}

impl BackendStatus {
    pub fn from_response(response: &StatusResponse, checked_at: DateTime<Utc>) -> Self {
        let health = match response.system_status.as_deref() {
            Some("operational") => BackendHealth::Operational,
            _ => BackendHealth::Degraded,
        };
        Self {
            health,
            ml_models_loaded: response.ml_models_loaded,
            checked_at,
        }
    }

    pub fn offline(checked_at: DateTime<Utc>) -> Self {
        Self {
            health: BackendHealth::Offline,
            ml_models_loaded: false,
            checked_at,
        }
    }

    pub fn models_label(&self) -> &'static str {
        match (self.health, self.ml_models_loaded) {
            (BackendHealth::Offline, _) => "ML Models: ❌ Unreachable",
            (_, true) => "ML Models: ✅ Active",
            (_, false) => "ML Models: ⚠️ Fallback",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_health_mapping() {
        let now = Utc::now();
        let ok: StatusResponse =
            serde_json::from_str(r#"{"system_status":"operational","ml_models_loaded":true}"#).unwrap();
        let status = BackendStatus::from_response(&ok, now);
        assert_eq!(status.health, BackendHealth::Operational);
        assert_eq!(status.models_label(), "ML Models: ✅ Active");

        let partial: StatusResponse = serde_json::from_str(r#"{"system_status":"maintenance"}"#).unwrap();
        let status = BackendStatus::from_response(&partial, now);
        assert_eq!(status.health, BackendHealth::Degraded);
        assert!(!status.ml_models_loaded);

        let empty: StatusResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(BackendStatus::from_response(&empty, now).health, BackendHealth::Degraded);

        assert_eq!(BackendStatus::offline(now).health, BackendHealth::Offline);
    }

    #[test]
    fn test_connection_status_display() {
        assert_eq!(ConnectionStatus::Offline.to_string(), "offline");
        assert_eq!(ConnectionStatus::Connected.label(), "🟢 PROTECTED");
    }
}
