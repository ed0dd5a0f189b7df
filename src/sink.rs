//! Delivery Channel
//!
//! Collectors hand finished records to a [`RecordSink`], a bounded queue whose
//! consumer forwards them to the delivery pipeline. Enqueueing never waits: a
//! full or closed queue is reported as an error instead of stalling the cycle.

use crate::error::{ExporterError, Result};
use crate::record::MetricRecord;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

/// Producer side of the delivery queue
#[derive(Clone)]
pub struct RecordSink {
    tx: mpsc::Sender<MetricRecord>,
}

impl RecordSink {
    /// Create a sink and the receiver the delivery side drains
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<MetricRecord>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Non-blocking enqueue
    ///
    /// # Errors
    ///
    /// * `ExporterError::QueueFull` - the consumer is not keeping up
    /// * `ExporterError::QueueClosed` - the consumer has gone away
    pub fn enqueue(&self, record: MetricRecord) -> Result<()> {
        let key = record.key().to_string();
        let value = record.value().to_string();

        match self.tx.try_send(record) {
            Ok(()) => {
                debug!("Inserted to queue {}:{}", key, value);
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(ExporterError::QueueFull(key)),
            Err(TrySendError::Closed(_)) => Err(ExporterError::QueueClosed(key)),
        }
    }
}
