//! server-info Metrics Collector
//!
//! # Metrics Produced
//! - `httpd.stat[maxclients]` - configured worker limit, as text

use super::{collect_with_handler, CollectionContext, CollectionResult};
use crate::httpd::info::max_clients;
use crate::httpd::info_url;
use crate::record::MetricRecord;
use std::time::Duration;
use tracing::debug;

/// Collects the configured worker limit from server-info
///
/// Every matching line yields a record; a page without a match yields none.
pub async fn collect_info_metrics(ctx: &CollectionContext<'_>) -> CollectionResult {
    let url = info_url(&ctx.config.httpd);
    let timeout = Duration::from_secs(ctx.config.httpd.timeout_seconds);

    collect_with_handler(
        "server-info",
        ctx.client.fetch_lines(&url, timeout),
        |lines| {
            let mut found = false;
            for value in lines.iter().filter_map(|line| max_clients(line)) {
                ctx.emit(MetricRecord::stat("maxclients", value, ctx.hostname()));
                found = true;
            }
            if !found {
                debug!("No MaxClients directive in server-info output");
            }
            Ok(())
        },
    )
    .await
}
