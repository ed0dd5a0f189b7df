//! Response Check Collector
//!
//! Times a synthetic GET against a separately configured target. The target may
//! be a different host or virtual host than the one serving server-status.
//!
//! # Metrics Produced
//! - `httpd.group.amount` - 1 if a response check is configured, 0 otherwise
//! - `httpd.group.available` - 1 if the target answered 200, 0 otherwise
//! - `httpd.stat[response_check,time]` - seconds taken by a 200 response, 0 for
//!   any other status; absent when the connection failed
//! - `httpd.stat[response_check,status_code]` - HTTP status; absent when the
//!   connection failed

use super::{CollectionContext, CollectionResult, CollectionStatus};
use crate::config::ResponseCheckConfig;
use crate::error::Result;
use crate::httpd::{response_check_url, HttpdClient};
use crate::record::MetricRecord;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Configured response check target and its client
pub struct ResponseProbe {
    config: ResponseCheckConfig,
    client: HttpdClient,
    url: String,
}

impl ResponseProbe {
    pub fn new(config: ResponseCheckConfig) -> Result<Self> {
        let client = HttpdClient::for_response_check(&config)?;
        let url = response_check_url(&config);
        Ok(Self {
            config,
            client,
            url,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn config(&self) -> &ResponseCheckConfig {
        &self.config
    }
}

/// Await `fut` and measure the elapsed wall-clock time
pub async fn timed<F: Future>(fut: F) -> (F::Output, Duration) {
    let start = Instant::now();
    let output = fut.await;
    (output, start.elapsed())
}

/// Collects availability and latency of the response check target
///
/// Always returns `Ok`; an unreachable or failing target is a valid observation.
pub async fn collect_response_metrics(ctx: &CollectionContext<'_>) -> CollectionResult {
    let host = ctx.hostname();

    let Some(probe) = ctx.probe else {
        ctx.emit(MetricRecord::group("amount", 0i64, host));
        return Ok(CollectionStatus::Success);
    };
    ctx.emit(MetricRecord::group("amount", 1i64, host));

    let headers = [
        ("Host", probe.config.virtual_host.as_str()),
        ("User-Agent", probe.config.user_agent.as_str()),
    ];
    let timeout = Duration::from_secs(probe.config.timeout_seconds);

    let (result, elapsed) = timed(probe.client.fetch(&probe.url, timeout, &headers)).await;

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            warn!(
                "Response check failed. Can not connect to {}: {}",
                probe.url, e
            );
            ctx.emit(MetricRecord::group("available", 0i64, host));
            return Ok(CollectionStatus::Failed);
        }
    };

    let (available, seconds) = if response.is_ok() {
        (1i64, elapsed.as_secs_f64())
    } else {
        warn!(
            "Response check failed. Response code is {} on {}",
            response.status, probe.url
        );
        (0i64, 0.0)
    };

    ctx.emit(MetricRecord::group("available", available, host));
    ctx.emit(MetricRecord::stat("response_check,time", seconds, host));
    ctx.emit(MetricRecord::stat(
        "response_check,status_code",
        i64::from(response.status),
        host,
    ));

    info!(
        "Response check {} -> {} in {:.3}s",
        probe.url, response.status, seconds
    );

    Ok(if available == 1 {
        CollectionStatus::Success
    } else {
        CollectionStatus::Failed
    })
}
