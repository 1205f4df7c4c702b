//! Alert list polling

use super::AlertFeed;
use crate::error::TransportError;
use crate::logic::pipeline::{AlertOrigin, PipelineHandle};

/// One poll: fetch the list and ingest it in source order.
/// Returns how many records were new.
pub async fn poll_once<F: AlertFeed>(feed: &F, handle: &PipelineHandle) -> Result<usize, TransportError> {
    let batch = feed.fetch_alerts().await?;

    if batch.malformed > 0 {
        log::warn!("Poll returned {} undecodable entries", batch.malformed);
        handle.record_malformed(batch.malformed as u64);
    }

    let received = batch.alerts.len();
    let accepted = handle.ingest_batch(batch.alerts, AlertOrigin::Poll);
    log::debug!("Poll: {} received, {} new", received, accepted);
    Ok(accepted)
}
