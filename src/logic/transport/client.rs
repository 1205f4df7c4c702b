//! Backend API Client
//!
//! HTTP client for the anomaly-detection backend: alert list, status and predict.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{AlertFeed, PredictionService, StatusProbe};
use crate::constants::{ALERTS_PATH, PREDICT_PATH, STATUS_PATH};
use crate::error::TransportError;
use crate::logic::alert::{RawAlert, RawId};
use crate::logic::status::StatusResponse;

/// Backend API client
#[derive(Debug, Clone)]
pub struct BackendClient {
    api_base: String,
    http_client: reqwest::Client,
}

// Request/Response types

/// Decoded alert list; undecodable entries are only counted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertBatch {
    pub alerts: Vec<RawAlert>,
    pub malformed: usize,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AlertsBody {
    List(Vec<serde_json::Value>),
    Wrapped { alerts: Vec<serde_json::Value> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictRequest {
    pub timestamp: String,
    pub method: String,
    pub path: String,
    pub query: String,
    pub user_agent: String,
    pub ip: String,
    pub country: String,
    pub referer: String,
    pub content_length: u64,
    pub request_size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub is_anomaly: bool,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, alias = "threat_type")]
    pub attack_type: Option<String>,
    #[serde(default)]
    pub event_id: Option<RawId>,
    #[serde(default)]
    pub source_ip: Option<String>,
    #[serde(default)]
    pub anomaly_score: Option<f64>,
}

impl BackendClient {
    /// Create new backend client
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, TransportError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// `GET /api/v1/alerts`
    pub async fn fetch_alerts(&self) -> Result<AlertBatch, TransportError> {
        let response = self
            .http_client
            .get(self.url(ALERTS_PATH))
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TransportError::Server(response.status().as_u16()));
        }

        let body: AlertsBody = response
            .json()
            .await
            .map_err(|e| TransportError::Parse(e.to_string()))?;

        let entries = match body {
            AlertsBody::List(entries) | AlertsBody::Wrapped { alerts: entries } => entries,
        };

        let mut batch = AlertBatch::default();
        for entry in entries {
            match serde_json::from_value::<RawAlert>(entry) {
                Ok(raw) => batch.alerts.push(raw),
                Err(e) => {
                    log::warn!("Skipping undecodable alert entry: {}", e);
                    batch.malformed += 1;
                }
            }
        }
        Ok(batch)
    }

    /// `GET /api/v1/status`
    pub async fn fetch_status(&self) -> Result<StatusResponse, TransportError> {
        let response = self
            .http_client
            .get(self.url(STATUS_PATH))
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| TransportError::Parse(e.to_string()))
        } else {
            Err(TransportError::Server(response.status().as_u16()))
        }
    }

    /// `POST /api/v1/predict`
    pub async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, TransportError> {
        let response = self
            .http_client
            .post(self.url(PREDICT_PATH))
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| TransportError::Parse(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            log::warn!("Predict request failed ({}): {}", status, error_text);
            Err(TransportError::Server(status))
        }
    }
}

impl AlertFeed for BackendClient {
    async fn fetch_alerts(&self) -> Result<AlertBatch, TransportError> {
        BackendClient::fetch_alerts(self).await
    }
}

impl StatusProbe for BackendClient {
    async fn fetch_status(&self) -> Result<StatusResponse, TransportError> {
        BackendClient::fetch_status(self).await
    }
}

impl PredictionService for BackendClient {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, TransportError> {
        BackendClient::predict(self, request).await
    }
}
