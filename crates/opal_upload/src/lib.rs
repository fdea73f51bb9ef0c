//! # Opal Upload
//!
//! File selection, validation, and upload orchestration:
//!
//! - [`accept`]: the accept-attribute grammar for selectable file types
//! - [`controller`]: the selection and upload state machine
//! - [`transport`]: the seam to the host's network stack
//!
//! The controller owns no I/O. [`UploadController::begin`] hands a batch to
//! an [`UploadTransport`] chosen by the host, and the transport's signals
//! feed back through [`UploadController::transport_event`].
//!
//! # Example
//!
//! ```
//! use opal_upload::{
//!     AcceptSpec, FileMeta, MemoryTransport, TransportSignal, UploadController,
//!     UploadPhase, UploadPolicy, UploadTransport,
//! };
//!
//! let mut controller = UploadController::new(UploadPolicy {
//!     accept: AcceptSpec::parse("image/*"),
//!     multiple: true,
//!     ..UploadPolicy::default()
//! });
//!
//! let selection = controller.select([FileMeta::new("a.png", 1024, "image/png")]);
//! assert_eq!(selection.accepted.len(), 1);
//!
//! let mut transport = MemoryTransport::new();
//! let batch = controller.begin().unwrap();
//! transport.begin(batch).unwrap();
//!
//! controller.transport_event(TransportSignal::Completed);
//! assert_eq!(controller.phase(), UploadPhase::Completed);
//! ```

pub mod accept;
pub mod controller;
pub mod error;
pub mod file;
pub mod transport;

pub use accept::AcceptSpec;
pub use controller::{Selection, UploadController, UploadEvent, UploadPhase, UploadPolicy};
pub use error::{TransportError, UploadError, ValidationError};
pub use file::{format_size, FileMeta};
pub use transport::{MemoryTransport, TransportSignal, UploadBatch, UploadTransport};
