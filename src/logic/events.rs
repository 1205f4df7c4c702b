//! Pipeline Events
//!
//! Broadcast to rendering/chart sinks. The bundled sink just logs.

use chrono::Utc;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};

use super::alert::Alert;
use super::buffer::TrafficPoint;
use super::pipeline::{AlertOrigin, PipelineState};
use super::status::{BackendStatus, ConnectionStatus};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PipelineEvent {
    AlertAdded { alert: Alert, origin: AlertOrigin },
    StateChanged(PipelineState),
    ConnectionChanged(ConnectionStatus),
    BackendChecked(BackendStatus),
    TrafficSampled(TrafficPoint),
}

/// One feed line per alert, as the dashboard card would show it
pub fn describe_alert(alert: &Alert, origin: AlertOrigin) -> String {
    let origin_tag = match origin {
        AlertOrigin::Synthetic => " (demo)",
        _ => "",
    };
    format!(
        "{} {} [{}] ip={} score={:.1}% type={} ({}){}",
        alert.severity().icon(),
        alert.event_type(),
        alert.severity().as_str().to_uppercase(),
        alert.source_ip(),
        alert.anomaly_score() * 100.0,
        alert.attack_type(),
        alert.age_label(Utc::now()),
        origin_tag,
    )
}

/// Logging sink: drains the event channel until it closes
pub async fn log_events(mut rx: broadcast::Receiver<PipelineEvent>) {
    loop {
        match rx.recv().await {
            Ok(PipelineEvent::AlertAdded { alert, origin }) => {
                if alert.severity().is_high() {
                    log::warn!("🚨 {}", describe_alert(&alert, origin));
                } else {
                    log::info!("{}", describe_alert(&alert, origin));
                }
            }
            Ok(PipelineEvent::StateChanged(state)) => {
                log::debug!("State changed: {}", state);
            }
            Ok(PipelineEvent::ConnectionChanged(status)) => {
                log::info!("Connection status: {}", status.label());
            }
            Ok(PipelineEvent::BackendChecked(status)) => {
                log::info!("Backend {:?} - {}", status.health, status.models_label());
            }
            Ok(PipelineEvent::TrafficSampled(point)) => {
                log::debug!(
                    "Traffic {}: {} recent, {} alerts/min",
                    point.label(),
                    point.recent_alerts,
                    point.alerts_per_minute
                );
            }
            Err(RecvError::Lagged(skipped)) => {
                log::warn!("Event sink lagged, {} events skipped", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_alert() {
        let alert = Alert::new(
            "d-1".to_string(),
            Utc::now(),
            "192.168.1.20".to_string(),
            0.873,
            "Demo Alert".to_string(),
            "XSS Attack".to_string(),
        );
        let line = describe_alert(&alert, AlertOrigin::Synthetic);
        assert!(line.starts_with("🔴 Demo Alert [CRITICAL]"));
        assert!(line.contains("score=87.3%"));
        assert!(line.contains("type=XSS Attack"));
        assert!(line.ends_with("(demo)"));
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let json = serde_json::to_value(PipelineEvent::ConnectionChanged(ConnectionStatus::Degraded)).unwrap();
        assert_eq!(json["type"], "connection_changed");
        assert_eq!(json["data"], "degraded");
    }
}
