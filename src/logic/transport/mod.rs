//! Transport Module - Backend to Pipeline Communication
//!
//! This module handles:
//! - WebSocket alert stream with reconnect
//! - Alert list polling
//! - Synthetic fallback alerts while the backend is unreachable
//! - Backend status probing
//! - Demo traffic through the predict endpoint

#![allow(async_fn_in_trait)]

pub mod client;
pub mod fallback;
pub mod poller;
pub mod stream;
pub mod supervisor;
pub mod traffic;


pub use client::{AlertBatch, BackendClient, PredictRequest, PredictResponse};
pub use fallback::SyntheticGenerator;
pub use poller::poll_once;
pub use stream::{decode_message, FrameStream, StreamMessage, WebSocketConnector};
pub use supervisor::{watch_backend_status, Supervisor, SupervisorConfig};
pub use traffic::{alert_from_prediction, run_demo_traffic, DemoTrafficGenerator};

use crate::error::TransportError;
use crate::logic::status::StatusResponse;

/// Opens the persistent alert stream
pub trait StreamConnector {
    async fn connect(&self) -> Result<FrameStream, TransportError>;
}

/// Returns the backend's current alert list
pub trait AlertFeed {
    async fn fetch_alerts(&self) -> Result<AlertBatch, TransportError>;
}

/// Backend health endpoint
pub trait StatusProbe {
    async fn fetch_status(&self) -> Result<StatusResponse, TransportError>;
}

/// Backend prediction endpoint
pub trait PredictionService {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, TransportError>;
}
