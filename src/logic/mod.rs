//! Logic Module - Alert Ingestion Pipeline
//!
//! - `alert/` - normalization, severity, attack category
//! - `buffer/` - display buffer, seen ids, tally, traffic series
//! - `pipeline` - state owner and shared handle
//! - `transport/` - stream, polling, fallback, status probe
//! - `events` - broadcast to rendering sinks
//! - `status` - connection and backend indicators

pub mod alert;
pub mod buffer;
pub mod events;
pub mod pipeline;
pub mod status;
pub mod transport;
