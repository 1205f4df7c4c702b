//! Transport Supervisor
//!
//! Drives one ingest strategy forever:
//! - streaming: connect, read frames, reconnect after a fixed delay
//! - polling: fetch the alert list every interval
//!
//! While the pipeline is Degraded a synthetic generator keeps the feed
//! alive. It stops as soon as the pipeline is Live again.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use futures_util::StreamExt;
use tokio::time::{interval, interval_at, sleep, Instant, Interval, MissedTickBehavior};

use super::fallback::SyntheticGenerator;
use super::poller::poll_once;
use super::stream::{decode_message, StreamMessage};
use super::{AlertFeed, StatusProbe, StreamConnector};
use crate::config::PipelineConfig;
use crate::logic::pipeline::{AlertOrigin, PipelineHandle, PipelineState};
use crate::logic::status::{BackendStatus, ConnectionStatus};

/// `tokio::time::interval` rejects a zero period
const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    pub reconnect_delay: Duration,
    pub fallback_interval: Duration,
    pub fallback_enabled: bool,
    pub poll_interval: Duration,
}

impl From<&PipelineConfig> for SupervisorConfig {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            reconnect_delay: config.reconnect_delay,
            fallback_interval: config.fallback_interval,
            fallback_enabled: config.fallback_enabled,
            poll_interval: config.poll_interval,
        }
    }
}

pub struct Supervisor {
    handle: PipelineHandle,
    config: SupervisorConfig,
    synthetic: SyntheticGenerator,
    /// Present only while degraded with fallback enabled
    fallback: Option<Interval>,
    ever_live: bool,
}

impl Supervisor {
    pub fn new(handle: PipelineHandle, config: SupervisorConfig) -> Self {
        Self::with_generator(handle, config, SyntheticGenerator::new())
    }

    pub fn with_generator(handle: PipelineHandle, config: SupervisorConfig, synthetic: SyntheticGenerator) -> Self {
        Self {
            handle,
            config,
            synthetic,
            fallback: None,
            ever_live: false,
        }
    }

    pub fn fallback_active(&self) -> bool {
        self.fallback.is_some()
    }

    // ========================================================================
    // STREAMING
    // ========================================================================

    /// Never returns; cancel by dropping the future
    pub async fn run_streaming<C: StreamConnector>(&mut self, connector: &C) {
        loop {
            self.handle.transition(PipelineState::Connecting);

            match self.wait_with_fallback(connector.connect()).await {
                Ok(mut frames) => {
                    log::info!("✅ Alert stream connected");
                    self.go_live();

                    loop {
                        match self.wait_with_fallback(frames.next()).await {
                            Some(Ok(text)) => self.handle_frame(&text),
                            Some(Err(e)) => {
                                log::warn!("Alert stream error: {}", e);
                                break;
                            }
                            None => {
                                log::warn!("Alert stream closed by backend");
                                break;
                            }
                        }
                    }

                    self.degrade(ConnectionStatus::Degraded);
                }
                Err(e) => {
                    log::warn!("Alert stream unavailable: {}", e);
                    self.degrade(self.failure_status());
                }
            }

            log::info!("Reconnecting in {:?}", self.config.reconnect_delay);
            self.wait_with_fallback(sleep(self.config.reconnect_delay)).await;
        }
    }

    fn handle_frame(&self, text: &str) {
        match decode_message(text) {
            Ok(StreamMessage::Alert(raw)) => {
                self.handle.ingest(raw, AlertOrigin::Stream);
            }
            Ok(StreamMessage::Control(kind)) => log::debug!("Control message: {}", kind),
            Err(e) => {
                log::warn!("Dropping frame: {}", e);
                self.handle.record_malformed(1);
            }
        }
    }

    // ========================================================================
    // POLLING
    // ========================================================================

    /// Never returns; cancel by dropping the future
    pub async fn run_polling<F: AlertFeed>(&mut self, feed: &F) {
        self.handle.transition(PipelineState::Connecting);

        let handle = self.handle.clone();
        let mut ticker = interval(self.config.poll_interval.max(MIN_PERIOD));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            self.wait_with_fallback(ticker.tick()).await;

            match self.wait_with_fallback(poll_once(feed, &handle)).await {
                Ok(_) => self.go_live(),
                Err(e) => {
                    log::warn!("Alert poll failed: {}", e);
                    self.degrade(self.failure_status());
                }
            }
        }
    }

    // ========================================================================
    // STATE
    // ========================================================================

    fn go_live(&mut self) {
        self.ever_live = true;
        self.handle.set_connection(ConnectionStatus::Connected);
        self.handle.transition(PipelineState::Live);
        if self.fallback.take().is_some() {
            log::info!("Backend reachable again, synthetic fallback stopped");
        }
    }

    /// Offline until the first success, degraded afterwards
    fn failure_status(&self) -> ConnectionStatus {
        if self.ever_live {
            ConnectionStatus::Degraded
        } else {
            ConnectionStatus::Offline
        }
    }

    fn degrade(&mut self, status: ConnectionStatus) {
        self.handle.set_connection(status);
        self.handle.transition(PipelineState::Degraded);

        // An already running generator keeps its schedule
        if self.config.fallback_enabled && self.fallback.is_none() {
            let period = self.config.fallback_interval.max(MIN_PERIOD);
            log::info!("🔄 Synthetic fallback every {:?}", period);
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            self.fallback = Some(ticker);
        }
    }

    fn emit_synthetic(&mut self) {
        let raw = self.synthetic.next_alert(Utc::now());
        self.handle.ingest(raw, AlertOrigin::Synthetic);
    }

    /// Await `fut`, emitting synthetic alerts in the meantime if fallback is running
    async fn wait_with_fallback<F: Future>(&mut self, fut: F) -> F::Output {
        tokio::pin!(fut);
        loop {
            tokio::select! {
                output = &mut fut => return output,
                _ = next_tick(&mut self.fallback) => self.emit_synthetic(),
            }
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

// ============================================================================
// STATUS PROBE
// ============================================================================

/// Probe backend health every `period`, first probe immediately.
/// Display only: the ingest path never reads the result.
pub async fn watch_backend_status<P: StatusProbe>(probe: &P, handle: &PipelineHandle, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let status = match probe.fetch_status().await {
            Ok(response) => BackendStatus::from_response(&response, Utc::now()),
            Err(e) => {
                log::warn!("Backend status check failed: {}", e);
                BackendStatus::offline(Utc::now())
            }
        };
        handle.set_backend(status);
    }
}
