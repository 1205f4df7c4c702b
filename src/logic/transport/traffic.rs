//! Demo Traffic Generator
//!
//! Sends crafted attack-looking requests to the predict endpoint and feeds
//! detections back into the pipeline. Opt-in via `DEMO_TRAFFIC_ENABLED`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};

use super::client::{PredictRequest, PredictResponse};
use super::PredictionService;
use crate::constants::DEFAULT_ATTACK_TYPE;
use crate::logic::alert::{RawAlert, RawTimestamp};
use crate::logic::pipeline::{AlertOrigin, PipelineHandle};

const ATTACK_PATTERNS: [&str; 4] = [
    "/?id=1' OR '1'='1",
    "/search?q=<script>alert(1)</script>",
    "/admin?debug=true",
    "/login?user=admin'--",
];

const SCANNER_USER_AGENTS: [&str; 3] = ["sqlmap/1.6.12", "Nikto/2.1.6", "python-requests/2.28.1"];

const BURST_SIZE: usize = 3;
const BURST_SPACING: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct DemoTrafficGenerator {
    rng: StdRng,
    burst_size: usize,
    spacing: Duration,
}

impl DemoTrafficGenerator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            burst_size: BURST_SIZE,
            spacing: BURST_SPACING,
        }
    }

    pub fn craft_request(&mut self, now: DateTime<Utc>) -> PredictRequest {
        let pattern = ATTACK_PATTERNS
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(ATTACK_PATTERNS[0]);
        let user_agent = SCANNER_USER_AGENTS
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(SCANNER_USER_AGENTS[0]);
        let (path, query) = pattern.split_once('?').unwrap_or((pattern, ""));
        let host: u8 = self.rng.gen_range(0..255);

        PredictRequest {
            timestamp: now.to_rfc3339(),
            method: "GET".to_string(),
            path: path.to_string(),
            query: query.to_string(),
            user_agent: user_agent.to_string(),
            ip: format!("192.168.1.{}", host),
            country: "US".to_string(),
            referer: String::new(),
            content_length: 0,
            request_size: pattern.len() as u64,
        }
    }

    /// Send one burst; returns how many detections were ingested
    pub async fn run_burst<S: PredictionService>(&mut self, service: &S, handle: &PipelineHandle) -> usize {
        let mut ingested = 0;
        for i in 0..self.burst_size {
            if i > 0 {
                sleep(self.spacing).await;
            }

            let request = self.craft_request(Utc::now());
            match service.predict(&request).await {
                Ok(response) => {
                    log::debug!(
                        "Predict {}?{}: anomaly={} confidence={:.2}",
                        request.path,
                        request.query,
                        response.is_anomaly,
                        response.confidence
                    );
                    if let Some(raw) = alert_from_prediction(&response, &request) {
                        if handle.ingest(raw, AlertOrigin::Demo).is_some() {
                            ingested += 1;
                        }
                    }
                }
                Err(e) => log::warn!("Demo traffic request failed: {}", e),
            }
        }
        ingested
    }
}

impl Default for DemoTrafficGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Detections become alerts; clean verdicts produce nothing
pub fn alert_from_prediction(response: &PredictResponse, request: &PredictRequest) -> Option<RawAlert> {
    if !response.is_anomaly {
        return None;
    }

    let attack_type = response
        .attack_type
        .clone()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_ATTACK_TYPE.to_string());

    Some(RawAlert {
        id: response.event_id.clone(),
        timestamp: Some(RawTimestamp::Text(request.timestamp.clone())),
        source_ip: Some(
            response
                .source_ip
                .clone()
                .filter(|ip| !ip.is_empty())
                .unwrap_or_else(|| request.ip.clone()),
        ),
        anomaly_score: Some(response.confidence),
        event_type: Some(format!("ML Detected: {}", attack_type)),
        attack_type: Some(attack_type),
    })
}

/// Burst forever, first burst one period after start
pub async fn run_demo_traffic<S: PredictionService>(service: &S, handle: &PipelineHandle, period: Duration) {
    let mut generator = DemoTrafficGenerator::new();
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let ingested = generator.run_burst(service, handle).await;
        log::info!("Demo traffic burst done, {} detections", ingested);
    }
}
