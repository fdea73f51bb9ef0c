//! # Opal Overlay
//!
//! Transient overlay services for Opal applications:
//!
//! - [`lifecycle`]: the open/close phase machine shared by every overlay
//! - [`message`]: toast messages and the bus facade for posting them
//! - [`toast`]: the stacking toast hub
//! - [`confirm`]: the single-slot confirmation hub
//!
//! Hubs subscribe to an [`opal_core::EventBus`] and are driven by the host
//! clock through `update(now_ms)`. Dropping a hub detaches it from the bus.
//!
//! # Example
//!
//! ```
//! use opal_core::EventBus;
//! use opal_overlay::{toast_hub, MessageRelay, ToastHubExt, ToastMessage, ToastOptions};
//!
//! let bus = EventBus::new();
//! let hub = toast_hub(ToastOptions::default());
//! hub.attach(&bus);
//!
//! MessageRelay::new(&bus).add(ToastMessage::success("Saved"));
//! hub.update(0);
//! assert_eq!(hub.visible().len(), 1);
//! ```

pub mod confirm;
pub mod lifecycle;
pub mod message;
pub mod toast;

pub use confirm::{
    confirm_hub, ConfirmHub, ConfirmHubExt, ConfirmHubInner, ConfirmOptions, ConfirmOutcome,
    ConfirmRequest, ConfirmRequested, ConfirmResolved, ConfirmView, Confirmer,
};
pub use lifecycle::{OverlayPhase, VisibilityEvent};
pub use message::{
    MessagePosted, MessageRelay, MessagesCleared, Severity, ToastMessage, DEFAULT_LIFE_MS,
};
pub use toast::{
    toast_hub, ToastHandle, ToastHub, ToastHubExt, ToastHubInner, ToastOptions, ToastView,
};
