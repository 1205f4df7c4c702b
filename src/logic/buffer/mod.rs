//! Buffer Module - windowed display state & lifetime counters

pub mod display;
pub mod seen;
pub mod series;
pub mod tally;

pub use display::{DisplayBuffer, SeverityCounts};
pub use seen::SeenIdSet;
pub use series::{RateWindow, TrafficPoint, TrafficSeries};
pub use tally::{CategoryShare, CategoryTally};
