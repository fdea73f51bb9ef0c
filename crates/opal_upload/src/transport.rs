//! Transport seam between the controller and the host's network stack
//!
//! The controller never performs I/O. [`UploadController::begin`] hands an
//! [`UploadBatch`] to an [`UploadTransport`] supplied by the host, and the
//! host feeds the transport's signals back through
//! [`UploadController::transport_event`].
//!
//! [`UploadController::begin`]: crate::UploadController::begin
//! [`UploadController::transport_event`]: crate::UploadController::transport_event

use std::collections::VecDeque;

use crate::error::TransportError;
use crate::file::FileMeta;

/// One batch of files handed to a transport
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadBatch {
    /// Monotonic batch number, starting at 1
    pub id: u64,
    pub files: Vec<FileMeta>,
}

impl UploadBatch {
    /// Total payload size in bytes
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|file| file.size).sum()
    }
}

/// Signals a transport reports back to the controller
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportSignal {
    /// Bytes sent so far out of the batch total
    Progress { sent: u64, total: u64 },
    /// The batch finished
    Completed,
    /// The batch failed
    Failed(String),
}

/// Moves upload batches; the host supplies the real implementation
pub trait UploadTransport {
    /// Start sending a batch
    fn begin(&mut self, batch: UploadBatch) -> Result<(), TransportError>;

    /// Next pending signal, if any
    fn poll(&mut self) -> Option<TransportSignal>;
}

/// In-memory transport for tests and demos
///
/// Records every batch it is given and replays signals queued by the
/// driver, in order.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    batches: Vec<UploadBatch>,
    signals: VecDeque<TransportSignal>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a signal for later polls
    pub fn push_signal(&mut self, signal: TransportSignal) {
        self.signals.push_back(signal);
    }

    /// Batches begun so far
    pub fn batches(&self) -> &[UploadBatch] {
        &self.batches
    }
}

impl UploadTransport for MemoryTransport {
    fn begin(&mut self, batch: UploadBatch) -> Result<(), TransportError> {
        tracing::debug!(
            id = batch.id,
            files = batch.files.len(),
            total = batch.total_size(),
            "memory transport batch started"
        );
        self.batches.push(batch);
        Ok(())
    }

    fn poll(&mut self) -> Option<TransportSignal> {
        self.signals.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_transport_records_and_replays() {
        let mut transport = MemoryTransport::new();
        let batch = UploadBatch {
            id: 1,
            files: vec![
                FileMeta::new("a.png", 100, "image/png"),
                FileMeta::new("b.png", 200, "image/png"),
            ],
        };
        assert_eq!(batch.total_size(), 300);

        transport.begin(batch.clone()).unwrap();
        assert_eq!(transport.batches(), &[batch]);

        transport.push_signal(TransportSignal::Progress { sent: 150, total: 300 });
        transport.push_signal(TransportSignal::Completed);

        assert_eq!(
            transport.poll(),
            Some(TransportSignal::Progress { sent: 150, total: 300 })
        );
        assert_eq!(transport.poll(), Some(TransportSignal::Completed));
        assert_eq!(transport.poll(), None);
    }
}
