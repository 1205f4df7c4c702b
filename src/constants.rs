//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change the default backend, only edit this file.

/// Default backend base URL
///
/// This is the fallback URL when no environment variable is set.
/// For development: http://localhost:8000
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Backend routes
pub const STREAM_PATH: &str = "/ws/alerts";
pub const ALERTS_PATH: &str = "/api/v1/alerts";
pub const STATUS_PATH: &str = "/api/v1/status";
pub const PREDICT_PATH: &str = "/api/v1/predict";

/// Delay before re-opening a dropped stream (seconds)
pub const DEFAULT_RECONNECT_DELAY_SECS: u64 = 5;

/// Synthetic alert interval while degraded (seconds)
pub const DEFAULT_FALLBACK_INTERVAL_SECS: u64 = 5;

/// Alert list polling interval (milliseconds)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;

/// Backend status probe interval (seconds)
pub const DEFAULT_STATUS_INTERVAL_SECS: u64 = 30;

/// Traffic chart sampling interval (seconds)
pub const DEFAULT_CHART_INTERVAL_SECS: u64 = 5;

/// Summary log interval (seconds)
pub const DEFAULT_SUMMARY_INTERVAL_SECS: u64 = 60;

/// Demo traffic burst interval (seconds)
pub const DEFAULT_DEMO_TRAFFIC_INTERVAL_SECS: u64 = 30;

/// HTTP request timeout (seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Display buffer cap
pub const DEFAULT_BUFFER_CAP: usize = 100;

/// Traffic chart points kept
pub const DEFAULT_SERIES_CAP: usize = 30;

/// Window for "recent" alert counts and alerts/min (seconds)
pub const RECENT_WINDOW_SECS: i64 = 60;

/// Event channel capacity
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

// ============================================
// Alert field defaults
// ============================================

pub const DEFAULT_SCORE: f64 = 0.5;
pub const UNKNOWN_SOURCE_IP: &str = "unknown";
pub const DEFAULT_EVENT_TYPE: &str = "Anomaly Detected";
pub const DEFAULT_ATTACK_TYPE: &str = "Unknown";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Anomaly Watch";
