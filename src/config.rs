//! Configuration module

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::ConfigError;

/// How alerts are pulled from the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Persistent WebSocket stream
    Stream,
    /// Periodic `GET /api/v1/alerts`
    Poll,
}

impl FromStr for TransportMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stream" | "websocket" | "ws" => Ok(Self::Stream),
            "poll" | "polling" => Ok(Self::Poll),
            _ => Err(()),
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream => write!(f, "stream"),
            Self::Poll => write!(f, "poll"),
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Backend base URL (`http://host:port`)
    pub api_base: String,

    /// WebSocket URL for the alert stream
    pub stream_url: String,

    /// Streaming or polling
    pub transport: TransportMode,

    pub poll_interval: Duration,
    pub reconnect_delay: Duration,
    pub fallback_interval: Duration,

    /// Emit synthetic alerts while degraded
    pub fallback_enabled: bool,

    /// Display buffer cap
    pub buffer_cap: usize,

    /// `None` keeps every seen id for the whole session
    pub seen_capacity: Option<usize>,

    pub status_interval: Duration,
    pub chart_interval: Duration,
    pub series_cap: usize,
    pub summary_interval: Duration,
    pub http_timeout: Duration,

    /// Periodically send crafted requests to the predict endpoint
    pub demo_traffic: bool,
    pub demo_traffic_interval: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            api_base: constants::DEFAULT_API_BASE.to_string(),
            stream_url: stream_url_for(constants::DEFAULT_API_BASE),
            transport: TransportMode::Stream,
            poll_interval: Duration::from_millis(constants::DEFAULT_POLL_INTERVAL_MS),
            reconnect_delay: Duration::from_secs(constants::DEFAULT_RECONNECT_DELAY_SECS),
            fallback_interval: Duration::from_secs(constants::DEFAULT_FALLBACK_INTERVAL_SECS),
            fallback_enabled: true,
            buffer_cap: constants::DEFAULT_BUFFER_CAP,
            seen_capacity: None,
            status_interval: Duration::from_secs(constants::DEFAULT_STATUS_INTERVAL_SECS),
            chart_interval: Duration::from_secs(constants::DEFAULT_CHART_INTERVAL_SECS),
            series_cap: constants::DEFAULT_SERIES_CAP,
            summary_interval: Duration::from_secs(constants::DEFAULT_SUMMARY_INTERVAL_SECS),
            http_timeout: Duration::from_secs(constants::DEFAULT_HTTP_TIMEOUT_SECS),
            demo_traffic: false,
            demo_traffic_interval: Duration::from_secs(constants::DEFAULT_DEMO_TRAFFIC_INTERVAL_SECS),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base = lookup("ALERT_API_BASE")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.api_base);

        let stream_url = lookup("ALERT_STREAM_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| stream_url_for(&api_base));

        let transport = match lookup("ALERT_TRANSPORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "ALERT_TRANSPORT",
                value: raw.clone(),
            })?,
            None => defaults.transport,
        };

        let buffer_cap = number_or(&lookup, "ALERT_BUFFER_CAP", defaults.buffer_cap);
        if buffer_cap == 0 {
            return Err(ConfigError::InvalidValue {
                key: "ALERT_BUFFER_CAP",
                value: "0".to_string(),
            });
        }

        let seen_capacity = match number_or(&lookup, "ALERT_SEEN_CAPACITY", 0usize) {
            0 => None,
            n => Some(n),
        };

        Ok(Self {
            api_base,
            stream_url,
            transport,
            poll_interval: Duration::from_millis(
                number_or(&lookup, "ALERT_POLL_INTERVAL_MS", constants::DEFAULT_POLL_INTERVAL_MS).max(1),
            ),
            reconnect_delay: secs_or(&lookup, "ALERT_RECONNECT_DELAY_SECS", defaults.reconnect_delay),
            fallback_interval: secs_or(&lookup, "ALERT_FALLBACK_INTERVAL_SECS", defaults.fallback_interval),
            fallback_enabled: flag_or(&lookup, "ALERT_FALLBACK_ENABLED", defaults.fallback_enabled),
            buffer_cap,
            seen_capacity,
            status_interval: secs_or(&lookup, "STATUS_CHECK_INTERVAL_SECS", defaults.status_interval),
            chart_interval: secs_or(&lookup, "CHART_INTERVAL_SECS", defaults.chart_interval),
            series_cap: number_or(&lookup, "TRAFFIC_SERIES_CAP", defaults.series_cap).max(1),
            summary_interval: secs_or(&lookup, "SUMMARY_INTERVAL_SECS", defaults.summary_interval),
            http_timeout: secs_or(&lookup, "HTTP_TIMEOUT_SECS", defaults.http_timeout),
            demo_traffic: flag_or(&lookup, "DEMO_TRAFFIC_ENABLED", defaults.demo_traffic),
            demo_traffic_interval: secs_or(
                &lookup,
                "DEMO_TRAFFIC_INTERVAL_SECS",
                defaults.demo_traffic_interval,
            ),
        })
    }
}

/// Derive the stream URL from an http(s) base: `https://x` -> `wss://x/ws/alerts`
pub fn stream_url_for(api_base: &str) -> String {
    let base = api_base.trim_end_matches('/');
    let ws_base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        base.to_string()
    };
    format!("{}{}", ws_base, constants::STREAM_PATH)
}

fn number_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
        None => default,
    }
}

fn secs_or<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    Duration::from_secs(number_or(lookup, key, default.as_secs()).max(1))
}

fn flag_or<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => {
            log::warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }
    }
}
