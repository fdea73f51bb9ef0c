//! Upload controller state machine

use crate::accept::AcceptSpec;
use crate::error::{UploadError, ValidationError};
use crate::file::FileMeta;
use crate::transport::{TransportSignal, UploadBatch};

// =============================================================================
// Policy and phases
// =============================================================================

/// Selection and validation rules for an upload controller
#[derive(Clone, Debug, Default)]
pub struct UploadPolicy {
    /// Which file types are selectable
    pub accept: AcceptSpec,
    /// Per-file size cap in bytes
    pub max_file_size: Option<u64>,
    /// Cap on the number of pending files; only applies with `multiple`
    pub file_limit: Option<usize>,
    /// Whether more than one file may be pending; off, a new selection
    /// replaces the pending file
    pub multiple: bool,
    /// Refuse files whose name and size match a pending one
    pub reject_duplicates: bool,
}

/// Where the controller is in the selection/upload cycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UploadPhase {
    /// Nothing selected
    #[default]
    Idle,
    /// Files are pending, ready to begin
    Ready,
    /// A batch is with the transport
    Uploading,
    /// The last batch finished and nothing new is pending
    Completed,
    /// The last batch failed; its files are pending again for retry
    Failed,
}

// =============================================================================
// Selection outcome and events
// =============================================================================

/// Outcome of one [`UploadController::select`] call
#[derive(Clone, Debug, Default)]
pub struct Selection {
    /// Files appended to the pending list
    pub accepted: Vec<FileMeta>,
    /// Files refused, with the reason
    pub rejected: Vec<(FileMeta, ValidationError)>,
}

impl Selection {
    /// Events to surface for this selection
    pub fn events(&self) -> Vec<UploadEvent> {
        let mut events = Vec::new();
        if !self.accepted.is_empty() {
            events.push(UploadEvent::Selected {
                count: self.accepted.len(),
            });
        }
        if !self.rejected.is_empty() {
            events.push(UploadEvent::Rejected {
                errors: self.rejected.iter().map(|(_, error)| error.clone()).collect(),
            });
        }
        events
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty() && self.rejected.is_empty()
    }
}

/// What changed, for the host to surface
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadEvent {
    /// Files were added to the pending list
    Selected { count: usize },
    /// Files were refused during selection
    Rejected { errors: Vec<ValidationError> },
    /// Transport progress
    Progress { percent: u8 },
    /// The batch finished and its files moved to `uploaded`
    Completed { count: usize },
    /// The batch failed; its files are pending again
    Failed { reason: String },
    /// The pending list was dropped
    Cleared,
    /// One pending file was removed
    Removed { file: FileMeta },
}

// =============================================================================
// UploadController
// =============================================================================

/// Drives file selection, validation, and a single in-flight upload batch
///
/// The controller owns no I/O: [`begin`](Self::begin) returns an
/// [`UploadBatch`] for the host's transport, and the transport's signals
/// come back through [`transport_event`](Self::transport_event).
#[derive(Debug)]
pub struct UploadController {
    policy: UploadPolicy,
    phase: UploadPhase,
    pending: Vec<FileMeta>,
    in_flight: Vec<FileMeta>,
    uploaded: Vec<FileMeta>,
    next_batch_id: u64,
    percent: u8,
}

impl UploadController {
    pub fn new(policy: UploadPolicy) -> Self {
        Self {
            policy,
            phase: UploadPhase::Idle,
            pending: Vec::new(),
            in_flight: Vec::new(),
            uploaded: Vec::new(),
            next_batch_id: 1,
            percent: 0,
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Validate `files` against the policy and append the survivors
    ///
    /// In single-file mode the first accepted file replaces the pending one
    /// and further files are refused. Selecting during an upload is allowed;
    /// the files wait for the next batch.
    pub fn select(&mut self, files: impl IntoIterator<Item = FileMeta>) -> Selection {
        let mut selection = Selection::default();

        for file in files {
            let error = if !self.policy.multiple && !selection.accepted.is_empty() {
                Some(ValidationError::LimitExceeded { limit: 1 })
            } else {
                self.validate(&file).err()
            };
            if let Some(error) = error {
                tracing::debug!(name = %file.name, %error, "file refused");
                selection.rejected.push((file, error));
                continue;
            }

            if !self.policy.multiple {
                self.pending.clear();
            }
            selection.accepted.push(file.clone());
            self.pending.push(file);
        }

        if !selection.accepted.is_empty() && self.phase != UploadPhase::Uploading {
            self.phase = UploadPhase::Ready;
        }
        tracing::debug!(
            accepted = selection.accepted.len(),
            rejected = selection.rejected.len(),
            pending = self.pending.len(),
            "selection processed"
        );
        selection
    }

    fn validate(&self, file: &FileMeta) -> Result<(), ValidationError> {
        if !self.policy.accept.accepts(file) {
            return Err(ValidationError::UnsupportedType {
                name: file.name.clone(),
            });
        }
        if let Some(limit) = self.policy.max_file_size {
            if file.size > limit {
                return Err(ValidationError::TooLarge {
                    name: file.name.clone(),
                    size: file.size,
                    limit,
                });
            }
        }
        if self.policy.reject_duplicates {
            let duplicate = self
                .pending
                .iter()
                .any(|pending| pending.name == file.name && pending.size == file.size);
            if duplicate {
                return Err(ValidationError::Duplicate {
                    name: file.name.clone(),
                });
            }
        }
        if self.policy.multiple {
            if let Some(limit) = self.policy.file_limit {
                if self.pending.len() >= limit {
                    return Err(ValidationError::LimitExceeded { limit });
                }
            }
        }
        Ok(())
    }

    /// Remove one pending file by index
    pub fn remove(&mut self, index: usize) -> Result<UploadEvent, UploadError> {
        if self.phase == UploadPhase::Uploading {
            return Err(UploadError::Busy);
        }
        if index >= self.pending.len() {
            return Err(UploadError::OutOfRange {
                index,
                len: self.pending.len(),
            });
        }

        let file = self.pending.remove(index);
        if self.pending.is_empty() {
            self.phase = UploadPhase::Idle;
        }
        tracing::debug!(name = %file.name, "pending file removed");
        Ok(UploadEvent::Removed { file })
    }

    /// Drop every pending file
    pub fn clear(&mut self) -> Result<UploadEvent, UploadError> {
        if self.phase == UploadPhase::Uploading {
            return Err(UploadError::Busy);
        }

        self.pending.clear();
        self.phase = UploadPhase::Idle;
        tracing::debug!("pending files cleared");
        Ok(UploadEvent::Cleared)
    }

    // =========================================================================
    // Upload cycle
    // =========================================================================

    /// Move the pending files into a batch and enter `Uploading`
    ///
    /// The returned batch goes to the host transport. Also the retry path
    /// after a failure, since a failed batch's files are pending again.
    pub fn begin(&mut self) -> Result<UploadBatch, UploadError> {
        if self.phase == UploadPhase::Uploading {
            return Err(UploadError::Busy);
        }
        if self.pending.is_empty() {
            return Err(UploadError::NotReady);
        }

        let id = self.next_batch_id;
        self.next_batch_id += 1;
        self.in_flight = std::mem::take(&mut self.pending);
        self.phase = UploadPhase::Uploading;
        self.percent = 0;

        let batch = UploadBatch {
            id,
            files: self.in_flight.clone(),
        };
        tracing::info!(
            id,
            files = batch.files.len(),
            total = batch.total_size(),
            "upload batch started"
        );
        Ok(batch)
    }

    /// Feed one transport signal back into the controller
    ///
    /// Signals arriving while no batch is uploading are ignored.
    pub fn transport_event(&mut self, signal: TransportSignal) -> Option<UploadEvent> {
        if self.phase != UploadPhase::Uploading {
            tracing::debug!(?signal, "transport signal outside an upload, ignoring");
            return None;
        }

        match signal {
            TransportSignal::Progress { sent, total } => {
                let percent = if total == 0 {
                    100
                } else {
                    (sent.saturating_mul(100) / total).min(100) as u8
                };
                self.percent = percent;
                Some(UploadEvent::Progress { percent })
            }
            TransportSignal::Completed => {
                let count = self.in_flight.len();
                self.uploaded.append(&mut self.in_flight);
                self.percent = 100;
                // Files selected mid-upload keep the controller ready.
                self.phase = if self.pending.is_empty() {
                    UploadPhase::Completed
                } else {
                    UploadPhase::Ready
                };
                tracing::info!(count, "upload batch completed");
                Some(UploadEvent::Completed { count })
            }
            TransportSignal::Failed(reason) => {
                // The batch's files return to the front of the pending list
                // so the host can retry.
                let mut restored = std::mem::take(&mut self.in_flight);
                restored.append(&mut self.pending);
                self.pending = restored;
                self.phase = UploadPhase::Failed;
                tracing::warn!(%reason, "upload batch failed");
                Some(UploadEvent::Failed { reason })
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Files waiting for the next batch
    pub fn pending(&self) -> &[FileMeta] {
        &self.pending
    }

    /// Files from completed batches
    pub fn uploaded(&self) -> &[FileMeta] {
        &self.uploaded
    }

    /// Total pending payload in bytes
    pub fn pending_size(&self) -> u64 {
        self.pending.iter().map(|file| file.size).sum()
    }

    /// Progress of the current or last batch, 0-100
    pub fn percent(&self) -> u8 {
        self.percent
    }
}

impl Default for UploadController {
    fn default() -> Self {
        Self::new(UploadPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_policy() -> UploadPolicy {
        UploadPolicy {
            accept: AcceptSpec::parse("image/*"),
            max_file_size: Some(5 * 1024 * 1024),
            multiple: true,
            reject_duplicates: true,
            ..UploadPolicy::default()
        }
    }

    fn png(name: &str, size: u64) -> FileMeta {
        FileMeta::new(name, size, "image/png")
    }

    #[test]
    fn test_select_validates_against_policy() {
        let mut controller = UploadController::new(image_policy());

        let selection = controller.select([
            png("holiday.png", 2 * 1024 * 1024),
            png("raw_scan.png", 9 * 1024 * 1024),
            FileMeta::new("setup.exe", 1024, "application/octet-stream"),
            png("holiday.png", 2 * 1024 * 1024),
        ]);

        assert_eq!(selection.accepted.len(), 1);
        assert_eq!(selection.rejected.len(), 3);
        assert_eq!(
            selection.rejected[0].1,
            ValidationError::TooLarge {
                name: "raw_scan.png".to_string(),
                size: 9 * 1024 * 1024,
                limit: 5 * 1024 * 1024,
            }
        );
        assert_eq!(
            selection.rejected[1].1,
            ValidationError::UnsupportedType {
                name: "setup.exe".to_string()
            }
        );
        assert_eq!(
            selection.rejected[2].1,
            ValidationError::Duplicate {
                name: "holiday.png".to_string()
            }
        );

        assert_eq!(controller.pending().len(), 1);
        assert_eq!(controller.phase(), UploadPhase::Ready);
        assert_eq!(controller.pending_size(), 2 * 1024 * 1024);
    }

    #[test]
    fn test_too_large_message_embeds_sizes() {
        let error = ValidationError::TooLarge {
            name: "raw_scan.png".to_string(),
            size: 9 * 1024 * 1024,
            limit: 5 * 1024 * 1024,
        };
        assert_eq!(
            error.to_string(),
            "raw_scan.png: file is 9.0 MB, limit is 5.0 MB"
        );
    }

    #[test]
    fn test_single_mode_replaces_pending_file() {
        let mut controller = UploadController::new(UploadPolicy::default());

        controller.select([png("first.png", 10)]);
        assert_eq!(controller.pending(), &[png("first.png", 10)]);

        controller.select([png("second.png", 20)]);
        assert_eq!(controller.pending(), &[png("second.png", 20)]);

        let selection = controller.select([png("third.png", 30), png("fourth.png", 40)]);
        assert_eq!(selection.accepted, vec![png("third.png", 30)]);
        assert_eq!(
            selection.rejected[0].1,
            ValidationError::LimitExceeded { limit: 1 }
        );
        assert_eq!(controller.pending(), &[png("third.png", 30)]);
    }

    #[test]
    fn test_file_limit_caps_pending() {
        let mut controller = UploadController::new(UploadPolicy {
            file_limit: Some(2),
            multiple: true,
            ..UploadPolicy::default()
        });

        let selection = controller.select([png("a.png", 1), png("b.png", 2), png("c.png", 3)]);
        assert_eq!(selection.accepted.len(), 2);
        assert_eq!(
            selection.rejected[0].1,
            ValidationError::LimitExceeded { limit: 2 }
        );
        assert_eq!(controller.pending().len(), 2);
    }

    #[test]
    fn test_begin_and_complete_cycle() {
        let mut controller = UploadController::new(image_policy());
        controller.select([png("a.png", 100), png("b.png", 200)]);

        let batch = controller.begin().unwrap();
        assert_eq!(batch.id, 1);
        assert_eq!(batch.files.len(), 2);
        assert_eq!(batch.total_size(), 300);
        assert_eq!(controller.phase(), UploadPhase::Uploading);
        assert!(controller.pending().is_empty());

        assert_eq!(controller.begin(), Err(UploadError::Busy));
        assert_eq!(controller.remove(0), Err(UploadError::Busy));
        assert_eq!(controller.clear(), Err(UploadError::Busy));

        let event = controller.transport_event(TransportSignal::Progress {
            sent: 150,
            total: 300,
        });
        assert_eq!(event, Some(UploadEvent::Progress { percent: 50 }));
        assert_eq!(controller.percent(), 50);

        let event = controller.transport_event(TransportSignal::Completed);
        assert_eq!(event, Some(UploadEvent::Completed { count: 2 }));
        assert_eq!(controller.phase(), UploadPhase::Completed);
        assert_eq!(controller.uploaded().len(), 2);

        // The batch is over; stray signals are ignored.
        assert_eq!(controller.transport_event(TransportSignal::Completed), None);
    }

    #[test]
    fn test_failed_batch_restores_pending_for_retry() {
        let mut controller = UploadController::new(image_policy());
        controller.select([png("a.png", 100), png("b.png", 200)]);

        controller.begin().unwrap();
        let event =
            controller.transport_event(TransportSignal::Failed("connection reset".to_string()));
        assert_eq!(
            event,
            Some(UploadEvent::Failed {
                reason: "connection reset".to_string()
            })
        );
        assert_eq!(controller.phase(), UploadPhase::Failed);
        assert_eq!(controller.pending().len(), 2);
        assert!(controller.uploaded().is_empty());

        let batch = controller.begin().unwrap();
        assert_eq!(batch.id, 2);
        controller.transport_event(TransportSignal::Completed);
        assert_eq!(controller.phase(), UploadPhase::Completed);
        assert_eq!(controller.uploaded().len(), 2);
    }

    #[test]
    fn test_select_during_upload_waits_for_next_batch() {
        let mut controller = UploadController::new(image_policy());
        controller.select([png("a.png", 100)]);
        controller.begin().unwrap();

        controller.select([png("b.png", 200)]);
        assert_eq!(controller.phase(), UploadPhase::Uploading);
        assert_eq!(controller.pending(), &[png("b.png", 200)]);

        controller.transport_event(TransportSignal::Completed);
        assert_eq!(controller.phase(), UploadPhase::Ready);
        assert_eq!(controller.uploaded(), &[png("a.png", 100)]);
        assert_eq!(controller.pending(), &[png("b.png", 200)]);
    }

    #[test]
    fn test_begin_without_files() {
        let mut controller = UploadController::new(image_policy());
        assert_eq!(controller.begin(), Err(UploadError::NotReady));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut controller = UploadController::new(image_policy());
        controller.select([png("a.png", 1), png("b.png", 2)]);

        let event = controller.remove(0).unwrap();
        assert_eq!(
            event,
            UploadEvent::Removed {
                file: png("a.png", 1)
            }
        );
        assert_eq!(controller.pending(), &[png("b.png", 2)]);
        assert_eq!(controller.phase(), UploadPhase::Ready);

        assert_eq!(
            controller.remove(5),
            Err(UploadError::OutOfRange { index: 5, len: 1 })
        );

        assert_eq!(controller.clear(), Ok(UploadEvent::Cleared));
        assert!(controller.pending().is_empty());
        assert_eq!(controller.phase(), UploadPhase::Idle);
    }

    #[test]
    fn test_progress_saturates_at_100() {
        let mut controller = UploadController::new(image_policy());
        controller.select([png("a.png", 100)]);
        controller.begin().unwrap();

        let event = controller.transport_event(TransportSignal::Progress {
            sent: 250,
            total: 100,
        });
        assert_eq!(event, Some(UploadEvent::Progress { percent: 100 }));

        let event = controller.transport_event(TransportSignal::Progress { sent: 0, total: 0 });
        assert_eq!(event, Some(UploadEvent::Progress { percent: 100 }));
    }

    #[test]
    fn test_selection_events() {
        let mut controller = UploadController::new(image_policy());
        let selection = controller.select([
            png("a.png", 100),
            FileMeta::new("setup.exe", 1024, "application/octet-stream"),
        ]);

        let events = selection.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], UploadEvent::Selected { count: 1 });
        assert!(matches!(&events[1], UploadEvent::Rejected { errors } if errors.len() == 1));

        assert!(controller.select(Vec::new()).is_empty());
    }
}
