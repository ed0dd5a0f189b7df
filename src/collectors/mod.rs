//! Metrics Collectors
//!
//! One collection cycle runs four stages in a fixed order:
//!
//! 1. [`version`] - collector liveness and the installed httpd version
//! 2. [`status`] - `server-status?auto` fields and scoreboard
//! 3. [`info`] - worker limit scraped from `server-info?config`
//! 4. [`response`] - availability and latency of a synthetic request
//!
//! # Architecture
//!
//! Collectors follow a consistent pattern:
//! - Accept a `CollectionContext` containing shared state
//! - Query the httpd endpoint
//! - Enqueue `MetricRecord`s on the delivery sink
//! - Return `CollectionResult`
//!
//! # Error Handling
//!
//! Transport and HTTP status failures are non-fatal: they log a warning and
//! return `Ok(CollectionStatus::Failed)`. A corrupt scoreboard is returned as
//! `Err` so it is logged loudly, but [`HttpdCollector::collect`] still runs the
//! remaining stages.

use crate::config::Config;
use crate::error::Result;
use crate::httpd::HttpdClient;
use crate::record::MetricRecord;
use crate::sink::RecordSink;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

pub use response::ResponseProbe;

/// Shared context passed to all collectors
///
/// This struct uses public fields for ergonomic access patterns.
/// All fields are immutable references, so no invariants can be violated.
#[derive(Clone, Copy)]
pub struct CollectionContext<'a> {
    /// Client for server-status and server-info
    pub client: &'a HttpdClient,
    /// Delivery queue for finished records
    pub sink: &'a RecordSink,
    /// Collector configuration
    pub config: &'a Config,
    /// Response probe, if one is configured
    pub probe: Option<&'a ResponseProbe>,
}

impl CollectionContext<'_> {
    /// Identity every record is attributed to
    pub fn hostname(&self) -> &str {
        &self.config.httpd.hostname
    }

    /// Enqueue a record; a rejected enqueue is logged and the record dropped
    pub fn emit(&self, record: MetricRecord) {
        if let Err(e) = self.sink.enqueue(record) {
            error!("Failed to enqueue record: {}", e);
        }
    }
}

/// Status of a metrics collection operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    /// Metrics were successfully collected and enqueued
    Success,
    /// Collection failed but is non-fatal (already logged as warning)
    Failed,
}

/// Result type for collector functions
///
/// - `Ok(CollectionStatus::Success)` = Collection succeeded
/// - `Ok(CollectionStatus::Failed)` = Collection failed but non-fatal (logged as warning)
/// - `Err(_)` = Stage aborted, nothing was emitted
pub type CollectionResult = std::result::Result<CollectionStatus, anyhow::Error>;

/// Helper to reduce boilerplate in collectors
///
/// Wraps endpoint queries with consistent error handling:
/// - On success: processes data, logs success, returns `CollectionStatus::Success`
/// - On processing error: returns `Err`
/// - On query error: logs warning, returns `CollectionStatus::Failed` (non-fatal)
///
/// # Arguments
///
/// * `name` - Name of the metric type being collected (for logging)
/// * `query_future` - Async endpoint call that returns data
/// * `process` - Function to turn the data into records
///
/// # Examples
///
/// ```no_run
/// # use httpd_exporter::collectors::*;
/// # use httpd_exporter::httpd::info_url;
/// # use std::time::Duration;
/// async fn example(ctx: &CollectionContext<'_>) -> CollectionResult {
///     let url = info_url(&ctx.config.httpd);
///     collect_with_handler(
///         "server-info",
///         ctx.client.fetch_lines(&url, Duration::from_secs(3)),
///         |lines| {
///             for line in lines {
///                 // Emit records...
///             }
///             Ok(())
///         },
///     ).await
/// }
/// ```
pub async fn collect_with_handler<T, F, P, E>(
    name: &str,
    query_future: F,
    process: P,
) -> CollectionResult
where
    F: std::future::Future<Output = std::result::Result<T, E>>,
    E: std::fmt::Display,
    P: FnOnce(T) -> anyhow::Result<()>,
{
    match query_future.await {
        Ok(data) => {
            process(data)?;
            info!("Updated {} metrics", name);
            Ok(CollectionStatus::Success)
        }
        Err(e) => {
            warn!("Failed to query {}: {}", name, e);
            Ok(CollectionStatus::Failed)
        }
    }
}

/// Collects every stage of one cycle for a single httpd instance
///
/// Holds the only state that outlives a cycle: the detected server version,
/// resolved at most once per instance.
pub struct HttpdCollector {
    config: Config,
    client: HttpdClient,
    probe: Option<ResponseProbe>,
    server_version: OnceCell<String>,
}

impl HttpdCollector {
    pub fn new(config: Config) -> Result<Self> {
        let client = HttpdClient::for_httpd(&config.httpd)?;
        let probe = config
            .response_check
            .clone()
            .map(ResponseProbe::new)
            .transpose()?;

        Ok(Self {
            config,
            client,
            probe,
            server_version: OnceCell::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one collection cycle, enqueueing records on `sink`
    ///
    /// Stages run sequentially and independently; a failing stage is logged
    /// and never prevents the next one from running.
    pub async fn collect(&self, sink: &RecordSink) {
        info!("Collecting metrics from httpd");

        let ctx = CollectionContext {
            client: &self.client,
            sink,
            config: &self.config,
            probe: self.probe.as_ref(),
        };

        macro_rules! stage {
            ($name:expr, $collector:expr) => {
                if let Err(e) = $collector.await {
                    error!("{} stage aborted: {:#}", $name, e);
                }
            };
        }

        stage!("version", version::collect_version_metrics(&ctx, &self.server_version));
        stage!("status", status::collect_status_metrics(&ctx));
        stage!("info", info::collect_info_metrics(&ctx));
        stage!("response", response::collect_response_metrics(&ctx));
    }
}

// Collector modules
pub mod info;
pub mod response;
pub mod status;
pub mod version;

// Re-export collector functions for convenient access
pub use info::collect_info_metrics;
pub use response::{collect_response_metrics, timed};
pub use status::collect_status_metrics;
pub use version::collect_version_metrics;
