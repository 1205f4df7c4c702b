//! Anomaly Watch - Main Entry Point
//!
//! Single-threaded: every task below shares one `current_thread` runtime
//! and ends when Ctrl+C arrives.

use std::time::Duration;

use anyhow::Context;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use anomaly_watch::config::{PipelineConfig, TransportMode};
use anomaly_watch::constants::{APP_NAME, APP_VERSION};
use anomaly_watch::logic::events::log_events;
use anomaly_watch::logic::pipeline::{AlertPipeline, PipelineHandle};
use anomaly_watch::logic::transport::{
    run_demo_traffic, watch_backend_status, BackendClient, Supervisor, SupervisorConfig, WebSocketConnector,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PipelineConfig::from_env().context("Invalid configuration")?;

    log::info!("Starting {} v{}...", APP_NAME, APP_VERSION);
    log::info!("Backend: {} ({} transport)", config.api_base, config.transport);
    if config.transport == TransportMode::Stream {
        log::info!("Alert stream: {}", config.stream_url);
    }

    let handle = PipelineHandle::new(AlertPipeline::new(&config));
    let events = handle.subscribe();
    let client =
        BackendClient::new(&config.api_base, config.http_timeout).context("Failed to build HTTP client")?;
    let connector = WebSocketConnector::new(config.stream_url.clone());
    let mut supervisor = Supervisor::new(handle.clone(), SupervisorConfig::from(&config));

    let ingest = async {
        match config.transport {
            TransportMode::Stream => supervisor.run_streaming(&connector).await,
            TransportMode::Poll => supervisor.run_polling(&client).await,
        }
    };

    if config.demo_traffic {
        log::info!("Demo traffic every {:?}", config.demo_traffic_interval);
    }

    tokio::select! {
        _ = ingest => {}
        _ = watch_backend_status(&client, &handle, config.status_interval) => {}
        _ = sample_traffic(&handle, config.chart_interval) => {}
        _ = log_summaries(&handle, config.summary_interval) => {}
        _ = run_demo_traffic(&client, &handle, config.demo_traffic_interval), if config.demo_traffic => {}
        _ = log_events(events) => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                log::error!("Failed to listen for Ctrl+C: {}", e);
            }
        }
    }

    let summary = handle.summary();
    log::info!(
        "Shutting down: {} alerts shown, {} accepted, {} duplicates, {} malformed",
        summary.total_alerts,
        summary.stats.accepted,
        summary.stats.duplicates,
        summary.stats.malformed
    );
    Ok(())
}

fn ticker(period: Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Chart refresh
async fn sample_traffic(handle: &PipelineHandle, period: Duration) {
    let mut ticker = ticker(period);
    loop {
        ticker.tick().await;
        handle.sample_traffic();
    }
}

async fn log_summaries(handle: &PipelineHandle, period: Duration) {
    let mut ticker = ticker(period);
    loop {
        ticker.tick().await;
        let summary = handle.summary();

        log::info!(
            "📊 {} | {} | {} alerts ({} high) | {} attacks | {}/min",
            summary.state,
            summary.connection.label(),
            summary.total_alerts,
            summary.high_severity,
            summary.attacks_detected,
            summary.alerts_per_minute
        );
        for share in &summary.categories {
            log::debug!(
                "   {}: {} ({:.1}%)",
                share.category,
                share.count,
                share.percentage
            );
        }
    }
}
