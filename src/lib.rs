//! Anomaly Watch - Real-time Alert Ingestion
//!
//! Pulls anomaly alerts from a detection backend and keeps a bounded,
//! deduplicated, classified view of them for dashboards.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐   RawAlert   ┌────────────┐   Alert   ┌───────────────┐
//! │ Transport      │ ───────────► │ Normalizer │ ────────► │ AlertPipeline │
//! │ stream / poll  │              │ + dedup    │           │ buffer, tally │
//! │ / fallback     │              └────────────┘           └───────┬───────┘
//! └────────────────┘                                               │ events
//!                                                                  ▼
//!                                                          rendering sinks
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logic;

pub use config::{PipelineConfig, TransportMode};
pub use error::{ConfigError, MalformedPayloadError, TransportError};
pub use logic::alert::{Alert, AttackCategory, RawAlert, Severity};
pub use logic::events::PipelineEvent;
pub use logic::pipeline::{AlertOrigin, AlertPipeline, PipelineHandle, PipelineState, PipelineSummary};
pub use logic::status::{BackendStatus, ConnectionStatus};
