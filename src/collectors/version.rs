//! Version Metrics Collector
//!
//! # Metrics Produced
//! - `blackbird.httpd.ping` - always 1 while the collector runs
//! - `blackbird.httpd.version` - version of this collector
//! - `httpd.version` - installed httpd version, `Unknown` if it cannot be detected

use super::{CollectionContext, CollectionResult, CollectionStatus};
use crate::httpd::version::detect_server_version;
use crate::record::MetricRecord;
use tokio::sync::OnceCell;

/// Collector version reported as `blackbird.httpd.version`
pub const COLLECTOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Collects liveness and version records
///
/// The server binary is executed only on the first call for a given `cache`;
/// later cycles reuse the stored version, `Unknown` included.
pub async fn collect_version_metrics(
    ctx: &CollectionContext<'_>,
    cache: &OnceCell<String>,
) -> CollectionResult {
    let host = ctx.hostname();

    ctx.emit(MetricRecord::agent("ping", 1i64, host));
    ctx.emit(MetricRecord::agent("version", COLLECTOR_VERSION, host));

    let version = cache
        .get_or_init(|| detect_server_version(&ctx.config.httpd.server_binary_path))
        .await;
    ctx.emit(MetricRecord::server_version(version, host));

    Ok(CollectionStatus::Success)
}
