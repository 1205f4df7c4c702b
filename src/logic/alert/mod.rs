//! Alert Module - Normalization & Classification
//!
//! - `types` - Alert, RawAlert, Severity, AttackCategory
//! - `severity` - score -> severity thresholds
//! - `category` - attack type -> tally bucket
//! - `normalizer` - defaults for partially populated records

pub mod category;
pub mod normalizer;
pub mod severity;
pub mod types;

pub use category::classify;
pub use normalizer::AlertNormalizer;
pub use severity::severity_for;
pub use types::{Alert, AttackCategory, RawAlert, RawId, RawTimestamp, Severity};
