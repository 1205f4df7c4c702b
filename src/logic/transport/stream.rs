//! Alert Stream
//!
//! WebSocket connector plus the frame decoder shared by every stream source.

use futures_util::future;
use futures_util::stream::{BoxStream, StreamExt};
use serde::Deserialize;
use tokio_tungstenite::tungstenite::Message;

use super::StreamConnector;
use crate::error::{MalformedPayloadError, TransportError};
use crate::logic::alert::RawAlert;

/// Text frames of one open connection; ends when the peer closes
pub type FrameStream = BoxStream<'static, Result<String, TransportError>>;

/// Envelope types that carry an alert in `data`
const ALERT_MESSAGE_TYPES: [&str; 2] = ["anomaly_alert", "alert"];

#[derive(Debug, Clone, PartialEq)]
pub enum StreamMessage {
    Alert(RawAlert),
    /// Keep-alives and hello messages; ignored by the pipeline
    Control(String),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// Decode one text frame
pub fn decode_message(text: &str) -> Result<StreamMessage, MalformedPayloadError> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("ping") || trimmed.eq_ignore_ascii_case("pong") {
        return Ok(StreamMessage::Control(trimmed.to_ascii_lowercase()));
    }

    let value: serde_json::Value =
        serde_json::from_str(trimmed).map_err(|e| MalformedPayloadError::new(e.to_string()))?;

    let is_envelope = value
        .as_object()
        .ok_or_else(|| MalformedPayloadError::new("expected a JSON object"))?
        .get("type")
        .map_or(false, |t| t.is_string());

    if !is_envelope {
        let raw: RawAlert =
            serde_json::from_value(value).map_err(|e| MalformedPayloadError::new(e.to_string()))?;
        return Ok(StreamMessage::Alert(raw));
    }

    let envelope: Envelope =
        serde_json::from_value(value).map_err(|e| MalformedPayloadError::new(e.to_string()))?;

    if !ALERT_MESSAGE_TYPES.contains(&envelope.kind.as_str()) {
        return Ok(StreamMessage::Control(envelope.kind));
    }

    match envelope.data {
        Some(data @ serde_json::Value::Object(_)) => serde_json::from_value(data)
            .map(StreamMessage::Alert)
            .map_err(|e| MalformedPayloadError::new(e.to_string())),
        _ => Err(MalformedPayloadError::new(format!(
            "{} message without a data object",
            envelope.kind
        ))),
    }
}

// ============================================================================
// WEBSOCKET
// ============================================================================

#[derive(Debug, Clone)]
pub struct WebSocketConnector {
    url: String,
}

impl WebSocketConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl StreamConnector for WebSocketConnector {
    async fn connect(&self) -> Result<FrameStream, TransportError> {
        let (socket, _response) = tokio_tungstenite::connect_async(self.url.as_str())
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        log::debug!("WebSocket open: {}", self.url);

        // Binary, ping and pong frames carry no alerts
        let frames = socket.filter_map(|message| {
            future::ready(match message {
                Ok(Message::Text(text)) => Some(Ok(text)),
                Ok(_) => None,
                Err(e) => Some(Err(TransportError::Stream(e.to_string()))),
            })
        });

        Ok(frames.boxed())
    }
}
