//! Collection Loop and Delivery
//!
//! This module drives the collector and hands its records to the delivery side.
//!
//! # Architecture
//!
//! - **Collection Loop**: Runs one [`HttpdCollector`] cycle per tick, every N
//!   seconds (configured via `interval_seconds`)
//! - **Delivery Task**: Drains the record queue and writes each record as one
//!   JSON line to stdout for the downstream sender
//!
//! # Error Handling
//!
//! Stage failures are logged inside the cycle and never stop the loop. Only a
//! failure to build the HTTP clients or to write to stdout ends the process;
//! the loop watches the delivery task and stops as soon as it fails.

use crate::collectors::HttpdCollector;
use crate::config::Config;
use crate::record::MetricRecord;
use crate::sink::RecordSink;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};
use tracing::{error, info};

/// Run the collector until interrupted, or for a single cycle if `once` is set
pub async fn start(config: Config, once: bool) -> anyhow::Result<()> {
    let delivered = run(config, once, tokio::io::stdout()).await?;
    info!("Delivered {} records", delivered);
    Ok(())
}

/// Collect into `writer`, returning the number of records delivered
///
/// A delivery failure ends the run with that error instead of leaving the
/// collection loop feeding a closed queue.
pub async fn run<W>(config: Config, once: bool, writer: W) -> anyhow::Result<usize>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let collector = HttpdCollector::new(config.clone())?;
    let (sink, rx) = RecordSink::bounded(config.collector.queue_capacity);

    let mut delivery = tokio::spawn(deliver(rx, writer));

    if once {
        collector.collect(&sink).await;
    } else {
        tokio::select! {
            _ = collect_loop(&collector, &sink) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Received interrupt, shutting down");
            }
            result = &mut delivery => {
                let delivered = result??;
                anyhow::bail!("Delivery stopped after {} records", delivered);
            }
        }
    }

    // Closing the queue lets the delivery task finish once it is drained
    drop(sink);
    Ok(delivery.await??)
}

async fn collect_loop(collector: &HttpdCollector, sink: &RecordSink) {
    let mut ticker = interval(Duration::from_secs(
        collector.config().collector.interval_seconds,
    ));

    loop {
        ticker.tick().await;
        collector.collect(sink).await;
    }
}

/// Write every queued record to `writer` as a JSON line until the queue closes
///
/// Returns the number of records written.
pub async fn deliver<W>(
    mut rx: mpsc::Receiver<MetricRecord>,
    mut writer: W,
) -> crate::error::Result<usize>
where
    W: AsyncWrite + Unpin,
{
    let mut delivered = 0;

    while let Some(record) = rx.recv().await {
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');
        if let Err(e) = writer.write_all(&line).await {
            error!("Failed to deliver {}: {}", record.key(), e);
            return Err(e.into());
        }
        writer.flush().await?;
        delivered += 1;
    }

    Ok(delivered)
}
