//! server-status Metrics Collector
//!
//! Collects every field of `server-status?auto` and the worker scoreboard.
//!
//! # Metrics Produced
//! - `httpd.stat[<field>]` - one per status field, name lowercased with spaces
//!   as underscores, value verbatim (e.g. `httpd.stat[total_accesses]`)
//! - `httpd.stat[scoreboard,<state>]` - worker count per scoreboard state, all
//!   eleven states always present

use super::{collect_with_handler, CollectionContext, CollectionResult};
use crate::httpd::{status_url, StatusPage};
use crate::record::MetricRecord;
use std::time::Duration;

/// Collects server-status metrics
///
/// The whole page is parsed before anything is enqueued, so a corrupt
/// scoreboard yields no records at all from this stage.
///
/// # Returns
///
/// * `Ok(CollectionStatus::Success)` - Page parsed and records enqueued
/// * `Ok(CollectionStatus::Failed)` - Endpoint unreachable or not 200 (logged as warning)
/// * `Err(_)` - Scoreboard contains an unknown state
pub async fn collect_status_metrics(ctx: &CollectionContext<'_>) -> CollectionResult {
    let url = status_url(&ctx.config.httpd);
    let timeout = Duration::from_secs(ctx.config.httpd.timeout_seconds);

    collect_with_handler(
        "server-status",
        ctx.client.fetch_lines(&url, timeout),
        |lines| {
            let page = StatusPage::parse(&lines)?;
            let host = ctx.hostname();

            for (key, value) in page.fields {
                ctx.emit(MetricRecord::stat(&key, value, host));
            }

            if let Some(scoreboard) = page.scoreboard {
                for (state, count) in scoreboard.iter() {
                    ctx.emit(MetricRecord::stat(
                        &format!("scoreboard,{}", state.name()),
                        count as i64,
                        host,
                    ));
                }
            }
            Ok(())
        },
    )
    .await
}
