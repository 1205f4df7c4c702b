//! Alert Pipeline - owns every piece of ingestion state
//!
//! `AlertPipeline` holds the display buffer, seen-id set and category tally.
//! `PipelineHandle` shares it between the transport tasks and readers; the
//! only mutation path is `ingest`.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::broadcast;

use super::alert::{Alert, AlertNormalizer, RawAlert};
use super::buffer::{
    CategoryShare, CategoryTally, DisplayBuffer, RateWindow, SeenIdSet, SeverityCounts, TrafficPoint,
    TrafficSeries,
};
use super::events::PipelineEvent;
use super::status::{BackendStatus, ConnectionStatus};
use crate::config::PipelineConfig;
use crate::constants::{EVENT_CHANNEL_CAPACITY, RECENT_WINDOW_SECS};

// ============================================================================
// STATE
// ============================================================================

/// `Idle -> Connecting -> Live <-> Degraded`, `Degraded -> Connecting` on retry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    Idle,
    Connecting,
    Live,
    Degraded,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PipelineState::Idle => "idle",
            PipelineState::Connecting => "connecting",
            PipelineState::Live => "live",
            PipelineState::Degraded => "degraded",
        };
        write!(f, "{}", s)
    }
}

/// Where an alert came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertOrigin {
    Stream,
    Poll,
    Synthetic,
    Demo,
}

/// Running ingest counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub accepted: u64,
    pub duplicates: u64,
    pub malformed: u64,
    pub synthetic: u64,
}

/// Point-in-time view for dashboards and the summary log
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    pub state: PipelineState,
    pub connection: ConnectionStatus,
    pub backend: Option<BackendStatus>,
    pub total_alerts: usize,
    pub severity: SeverityCounts,
    pub high_severity: usize,
    pub attacks_detected: u64,
    pub categories: Vec<CategoryShare>,
    pub alerts_per_minute: usize,
    pub stats: IngestStats,
}

// ============================================================================
// PIPELINE
// ============================================================================

#[derive(Debug)]
pub struct AlertPipeline {
    normalizer: AlertNormalizer,
    seen: SeenIdSet,
    buffer: DisplayBuffer,
    tally: CategoryTally,
    rate: RateWindow,
    series: TrafficSeries,
    state: PipelineState,
    connection: ConnectionStatus,
    backend: Option<BackendStatus>,
    stats: IngestStats,
}

impl AlertPipeline {
    pub fn new(config: &PipelineConfig) -> Self {
        Self::with_limits(config.buffer_cap, config.seen_capacity, config.series_cap)
    }

    pub fn with_limits(buffer_cap: usize, seen_capacity: Option<usize>, series_cap: usize) -> Self {
        Self {
            normalizer: AlertNormalizer::new(),
            seen: SeenIdSet::with_capacity(seen_capacity),
            buffer: DisplayBuffer::new(buffer_cap),
            tally: CategoryTally::new(),
            rate: RateWindow::new(Duration::seconds(RECENT_WINDOW_SECS)),
            series: TrafficSeries::new(series_cap),
            state: PipelineState::Idle,
            connection: ConnectionStatus::Offline,
            backend: None,
            stats: IngestStats::default(),
        }
    }

    /// Normalize, dedup, then buffer and tally. Duplicates return `None`.
    pub fn ingest(&mut self, raw: RawAlert, origin: AlertOrigin, now: DateTime<Utc>) -> Option<Alert> {
        let alert = self.normalizer.normalize(raw, now);

        // A capped set may have forgotten an id that is still on screen.
        // Unbounded, the set already holds every resident id.
        let duplicate = !self.seen.insert(alert.id())
            || (self.seen.capacity().is_some() && self.buffer.contains(alert.id()));
        if duplicate {
            self.stats.duplicates += 1;
            log::debug!("Duplicate alert {} dropped", alert.id());
            return None;
        }

        self.tally.record(alert.category());
        self.rate.record(now);
        self.buffer.insert(alert.clone());

        self.stats.accepted += 1;
        if origin == AlertOrigin::Synthetic {
            self.stats.synthetic += 1;
        }
        Some(alert)
    }

    pub fn record_malformed(&mut self, count: u64) {
        self.stats.malformed += count;
    }

    /// Returns `true` if the state actually changed
    pub fn set_state(&mut self, state: PipelineState) -> bool {
        let changed = self.state != state;
        self.state = state;
        changed
    }

    pub fn set_connection(&mut self, status: ConnectionStatus) -> bool {
        let changed = self.connection != status;
        self.connection = status;
        changed
    }

    pub fn set_backend(&mut self, status: BackendStatus) {
        self.backend = Some(status);
    }

    /// Append a chart point computed from the current buffer
    pub fn sample_traffic(&mut self, now: DateTime<Utc>) -> TrafficPoint {
        let point = TrafficPoint {
            at: now,
            recent_alerts: self
                .buffer
                .recent_count(now, Duration::seconds(RECENT_WINDOW_SECS)),
            alerts_per_minute: self.rate.count(now),
        };
        self.series.push(point.clone());
        point
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.connection
    }

    pub fn backend(&self) -> Option<&BackendStatus> {
        self.backend.as_ref()
    }

    pub fn buffer(&self) -> &DisplayBuffer {
        &self.buffer
    }

    pub fn tally(&self) -> &CategoryTally {
        &self.tally
    }

    pub fn seen(&self) -> &SeenIdSet {
        &self.seen
    }

    pub fn series(&self) -> &TrafficSeries {
        &self.series
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    pub fn summary(&mut self, now: DateTime<Utc>) -> PipelineSummary {
        PipelineSummary {
            state: self.state,
            connection: self.connection,
            backend: self.backend.clone(),
            total_alerts: self.buffer.total_count(),
            severity: self.buffer.severity_counts(),
            high_severity: self.buffer.high_severity_count(),
            attacks_detected: self.tally.attacks_detected(),
            categories: self.tally.shares(),
            alerts_per_minute: self.rate.count(now),
            stats: self.stats,
        }
    }

    /// Full reset, as on a page reload
    pub fn reset(&mut self) {
        self.seen.clear();
        self.buffer.clear();
        self.tally.reset();
        self.rate.clear();
        self.series.clear();
        self.stats = IngestStats::default();
        self.state = PipelineState::Idle;
    }
}

// ============================================================================
// HANDLE
// ============================================================================

/// Shared access to one pipeline plus its event channel
#[derive(Clone)]
pub struct PipelineHandle {
    inner: Arc<RwLock<AlertPipeline>>,
    events: broadcast::Sender<PipelineEvent>,
}

impl PipelineHandle {
    pub fn new(pipeline: AlertPipeline) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(RwLock::new(pipeline)),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.events.subscribe()
    }

    /// Read-only access; never hold across an await
    pub fn read<R>(&self, f: impl FnOnce(&AlertPipeline) -> R) -> R {
        f(&self.inner.read())
    }

    pub fn ingest(&self, raw: RawAlert, origin: AlertOrigin) -> Option<Alert> {
        let accepted = self.inner.write().ingest(raw, origin, Utc::now());
        if let Some(alert) = &accepted {
            self.emit(PipelineEvent::AlertAdded {
                alert: alert.clone(),
                origin,
            });
        }
        accepted
    }

    /// Source order is preserved; returns the number accepted
    pub fn ingest_batch(&self, batch: Vec<RawAlert>, origin: AlertOrigin) -> usize {
        batch
            .into_iter()
            .filter_map(|raw| self.ingest(raw, origin))
            .count()
    }

    pub fn record_malformed(&self, count: u64) {
        if count > 0 {
            self.inner.write().record_malformed(count);
        }
    }

    pub fn transition(&self, state: PipelineState) {
        let changed = self.inner.write().set_state(state);
        if changed {
            log::info!("Pipeline state -> {}", state);
            self.emit(PipelineEvent::StateChanged(state));
        }
    }

    pub fn set_connection(&self, status: ConnectionStatus) {
        let changed = self.inner.write().set_connection(status);
        if changed {
            self.emit(PipelineEvent::ConnectionChanged(status));
        }
    }

    pub fn set_backend(&self, status: BackendStatus) {
        self.inner.write().set_backend(status.clone());
        self.emit(PipelineEvent::BackendChecked(status));
    }

    pub fn sample_traffic(&self) -> TrafficPoint {
        let point = self.inner.write().sample_traffic(Utc::now());
        self.emit(PipelineEvent::TrafficSampled(point.clone()));
        point
    }

    pub fn summary(&self) -> PipelineSummary {
        self.inner.write().summary(Utc::now())
    }

    pub fn reset(&self) {
        self.inner.write().reset();
        log::info!("Pipeline reset");
        self.emit(PipelineEvent::StateChanged(PipelineState::Idle));
    }

    pub fn state(&self) -> PipelineState {
        self.inner.read().state()
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.inner.read().connection()
    }

    fn emit(&self, event: PipelineEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
