//! Confirmation dialog hub
//!
//! Producers publish a [`ConfirmRequest`] through a [`Confirmer`]; the
//! attached [`ConfirmHub`] holds at most one pending request, walks it
//! through the [`OverlayPhase`] lifecycle, and publishes a
//! [`ConfirmResolved`] once the user (or the host) resolves it. Accept and
//! reject callbacks ride along on the request itself.
//!
//! A newer request replaces the pending one, which is resolved as
//! [`ConfirmOutcome::Dismissed`] first.
//!
//! # Example
//!
//! ```
//! use opal_core::EventBus;
//! use opal_overlay::{confirm_hub, ConfirmHubExt, ConfirmOptions, ConfirmOutcome, ConfirmRequest, Confirmer};
//!
//! let bus = EventBus::new();
//! let hub = confirm_hub(ConfirmOptions::default());
//! hub.attach(&bus);
//!
//! Confirmer::new(&bus).confirm(ConfirmRequest::new("Delete 3 files?"));
//! assert!(hub.pending().is_some());
//!
//! hub.resolve(ConfirmOutcome::Rejected);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use opal_core::{EventBus, Subscription};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::lifecycle::{OverlayPhase, VisibilityEvent};

type ConfirmCallback = Arc<dyn Fn() + Send + Sync>;

// =============================================================================
// ConfirmRequest / ConfirmOutcome
// =============================================================================

/// How a confirmation request ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmOutcome {
    /// The user chose the accept action
    Accepted,
    /// The user chose the reject action
    Rejected,
    /// Closed without choosing (escape, or replaced by a newer request)
    Dismissed,
}

/// A confirmation request
///
/// ```
/// use opal_overlay::ConfirmRequest;
///
/// let request = ConfirmRequest::new("Delete 3 files?")
///     .header("Delete")
///     .accept_label("Delete")
///     .reject_label("Keep")
///     .on_accept(|| println!("deleting"));
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmRequest {
    /// Routes the request to the hub with the same key
    pub key: Option<String>,
    pub header: String,
    pub message: String,
    pub accept_label: String,
    pub reject_label: String,
    #[serde(skip)]
    accept: Option<ConfirmCallback>,
    #[serde(skip)]
    reject: Option<ConfirmCallback>,
}

impl ConfirmRequest {
    /// Request with default header and labels
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            key: None,
            header: "Confirmation".to_string(),
            message: message.into(),
            accept_label: "Yes".to_string(),
            reject_label: "No".to_string(),
            accept: None,
            reject: None,
        }
    }

    /// Route to the hub with this key
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the dialog header
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Set the accept button label
    pub fn accept_label(mut self, label: impl Into<String>) -> Self {
        self.accept_label = label.into();
        self
    }

    /// Set the reject button label
    pub fn reject_label(mut self, label: impl Into<String>) -> Self {
        self.reject_label = label.into();
        self
    }

    /// Run `f` when the request is accepted
    pub fn on_accept(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.accept = Some(Arc::new(f));
        self
    }

    /// Run `f` when the request is rejected
    pub fn on_reject(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.reject = Some(Arc::new(f));
        self
    }
}

impl Default for ConfirmRequest {
    fn default() -> Self {
        Self::new("")
    }
}

impl fmt::Debug for ConfirmRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmRequest")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("message", &self.message)
            .field("accept_label", &self.accept_label)
            .field("reject_label", &self.reject_label)
            .field("has_accept", &self.accept.is_some())
            .field("has_reject", &self.reject.is_some())
            .finish()
    }
}

// =============================================================================
// Bus topics
// =============================================================================

/// Bus topic: a confirmation was requested
#[derive(Clone, Debug)]
pub struct ConfirmRequested {
    pub request: ConfirmRequest,
}

/// Bus topic: a confirmation was resolved
#[derive(Clone, Debug)]
pub struct ConfirmResolved {
    pub key: Option<String>,
    pub outcome: ConfirmOutcome,
}

/// Producer-side facade for requesting confirmations
#[derive(Clone, Debug)]
pub struct Confirmer {
    bus: EventBus,
}

impl Confirmer {
    /// Confirmer publishing on `bus`
    pub fn new(bus: &EventBus) -> Self {
        Self { bus: bus.clone() }
    }

    /// Publish a confirmation request
    pub fn confirm(&self, request: ConfirmRequest) {
        tracing::debug!(header = %request.header, "confirmation requested");
        if self.bus.publish(&ConfirmRequested { request }) == 0 {
            tracing::warn!("confirmation requested with no confirm hub attached");
        }
    }
}

// =============================================================================
// ConfirmHubInner
// =============================================================================

/// Configuration for a confirm hub
#[derive(Clone, Copy, Debug)]
pub struct ConfirmOptions {
    /// Enter transition length
    pub enter_ms: u64,
    /// Exit transition length
    pub exit_ms: u64,
}

impl Default for ConfirmOptions {
    fn default() -> Self {
        Self {
            enter_ms: 150,
            exit_ms: 150,
        }
    }
}

/// Snapshot of the pending request for rendering
#[derive(Clone, Debug)]
pub struct ConfirmView {
    pub key: Option<String>,
    pub header: String,
    pub message: String,
    pub accept_label: String,
    pub reject_label: String,
    pub phase: OverlayPhase,
}

struct PendingConfirm {
    request: ConfirmRequest,
    phase: OverlayPhase,
    created_at_ms: Option<u64>,
    close_started_at_ms: Option<u64>,
}

/// Side effects of a resolution, delivered outside the hub lock
struct Resolution {
    key: Option<String>,
    outcome: ConfirmOutcome,
    callback: Option<ConfirmCallback>,
}

impl Resolution {
    fn deliver(self, bus: Option<&EventBus>) {
        if let Some(callback) = &self.callback {
            callback();
        }
        if let Some(bus) = bus {
            bus.publish(&ConfirmResolved {
                key: self.key,
                outcome: self.outcome,
            });
        }
    }
}

/// Inner state of a confirm hub
pub struct ConfirmHubInner {
    options: ConfirmOptions,
    pending: Option<PendingConfirm>,
    bus: Option<EventBus>,
    dirty: AtomicBool,
    subscriptions: SmallVec<[Subscription; 1]>,
}

impl ConfirmHubInner {
    /// Create a hub with the given options
    pub fn new(options: ConfirmOptions) -> Self {
        Self {
            options,
            pending: None,
            bus: None,
            dirty: AtomicBool::new(false),
            subscriptions: SmallVec::new(),
        }
    }

    /// Check and clear the dirty flag
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::SeqCst)
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Snapshot of the pending request
    pub fn pending(&self) -> Option<ConfirmView> {
        self.pending.as_ref().map(|pending| ConfirmView {
            key: pending.request.key.clone(),
            header: pending.request.header.clone(),
            message: pending.request.message.clone(),
            accept_label: pending.request.accept_label.clone(),
            reject_label: pending.request.reject_label.clone(),
            phase: pending.phase,
        })
    }

    /// Install a new pending request
    ///
    /// Returns the dismissal of a displaced, still-unresolved request. The
    /// caller delivers it outside the lock.
    fn begin_request(&mut self, request: ConfirmRequest) -> Option<Resolution> {
        let displaced = self.pending.take().and_then(|displaced| {
            // A request already closing was resolved; do not resolve it twice.
            if displaced.phase == OverlayPhase::Closing {
                return None;
            }
            tracing::debug!(header = %displaced.request.header, "pending confirmation displaced");
            Some(Resolution {
                key: displaced.request.key.clone(),
                outcome: ConfirmOutcome::Dismissed,
                callback: None,
            })
        });

        tracing::debug!(header = %request.header, "confirmation pending");
        self.pending = Some(PendingConfirm {
            request,
            phase: OverlayPhase::Opening,
            created_at_ms: None,
            close_started_at_ms: None,
        });
        self.mark_dirty();
        displaced
    }

    /// Resolve the pending request
    ///
    /// Returns the resolution effects for the caller to deliver outside the
    /// lock, or `None` when there is nothing to resolve.
    fn begin_resolve(&mut self, outcome: ConfirmOutcome) -> Option<Resolution> {
        let Some(pending) = self.pending.as_mut() else {
            tracing::debug!(?outcome, "resolve with no pending confirmation, ignoring");
            return None;
        };
        let Some(next) = pending.phase.on_event(VisibilityEvent::Hide) else {
            tracing::debug!(?outcome, "confirmation already resolving, ignoring");
            return None;
        };

        tracing::debug!(?outcome, header = %pending.request.header, "confirmation resolved");
        pending.phase = next;

        let callback = match outcome {
            ConfirmOutcome::Accepted => pending.request.accept.clone(),
            ConfirmOutcome::Rejected => pending.request.reject.clone(),
            ConfirmOutcome::Dismissed => None,
        };
        let resolution = Resolution {
            key: pending.request.key.clone(),
            outcome,
            callback,
        };
        self.mark_dirty();
        Some(resolution)
    }

    /// Drive phase transitions; removes the request once fully closed
    pub fn update(&mut self, now_ms: u64) {
        let mut changed = false;
        let mut finished = false;

        if let Some(pending) = self.pending.as_mut() {
            if pending.created_at_ms.is_none() {
                pending.created_at_ms = Some(now_ms);
            }

            match pending.phase {
                OverlayPhase::Opening => {
                    if let Some(created) = pending.created_at_ms {
                        if now_ms.saturating_sub(created) >= self.options.enter_ms {
                            if let Some(next) =
                                pending.phase.on_event(VisibilityEvent::TransitionDone)
                            {
                                pending.phase = next;
                                changed = true;
                            }
                        }
                    }
                }
                OverlayPhase::Closing => {
                    if pending.close_started_at_ms.is_none() {
                        pending.close_started_at_ms = Some(now_ms);
                    }
                    if let Some(started) = pending.close_started_at_ms {
                        if now_ms.saturating_sub(started) >= self.options.exit_ms {
                            finished = true;
                        }
                    }
                }
                OverlayPhase::Open | OverlayPhase::Closed => {}
            }
        }

        if finished {
            self.pending = None;
            changed = true;
        }
        if changed {
            self.mark_dirty();
        }
    }
}

impl Default for ConfirmHubInner {
    fn default() -> Self {
        Self::new(ConfirmOptions::default())
    }
}

// =============================================================================
// ConfirmHub - shared handle
// =============================================================================

/// Shared confirm hub handle
pub type ConfirmHub = Arc<Mutex<ConfirmHubInner>>;

/// Create a confirm hub
pub fn confirm_hub(options: ConfirmOptions) -> ConfirmHub {
    Arc::new(Mutex::new(ConfirmHubInner::new(options)))
}

/// Hub operations on the shared handle
pub trait ConfirmHubExt {
    /// Subscribe the hub to [`ConfirmRequested`] on `bus` and publish
    /// [`ConfirmResolved`] there
    fn attach(&self, bus: &EventBus);
    /// Install a request directly, bypassing the bus
    fn request(&self, request: ConfirmRequest);
    /// Resolve the pending request, running its matching callback
    fn resolve(&self, outcome: ConfirmOutcome);
    /// Shorthand for [`resolve`](Self::resolve) with [`ConfirmOutcome::Accepted`]
    fn accept(&self);
    /// Shorthand for [`resolve`](Self::resolve) with [`ConfirmOutcome::Rejected`]
    fn reject(&self);
    /// Drive phase transitions
    fn update(&self, now_ms: u64);
    /// Snapshot of the pending request
    fn pending(&self) -> Option<ConfirmView>;
    /// Check and clear the dirty flag
    fn take_dirty(&self) -> bool;
}

impl ConfirmHubExt for ConfirmHub {
    fn attach(&self, bus: &EventBus) {
        // The callback holds a weak reference so the bus never keeps a
        // dropped hub alive. Displaced resolutions are delivered after the
        // hub lock is released.
        let hub = Arc::downgrade(self);
        let delivery_bus = bus.clone();
        let requested = bus.subscribe::<ConfirmRequested, _>(move |event| {
            if let Some(hub) = hub.upgrade() {
                let displaced = hub.lock().unwrap().begin_request(event.request.clone());
                if let Some(resolution) = displaced {
                    resolution.deliver(Some(&delivery_bus));
                }
            }
        });

        let mut inner = self.lock().unwrap();
        inner.bus = Some(bus.clone());
        inner.subscriptions.push(requested);
    }

    fn request(&self, request: ConfirmRequest) {
        let (displaced, bus) = {
            let mut inner = self.lock().unwrap();
            (inner.begin_request(request), inner.bus.clone())
        };
        if let Some(resolution) = displaced {
            resolution.deliver(bus.as_ref());
        }
    }

    fn resolve(&self, outcome: ConfirmOutcome) {
        let (resolution, bus) = {
            let mut inner = self.lock().unwrap();
            (inner.begin_resolve(outcome), inner.bus.clone())
        };
        if let Some(resolution) = resolution {
            resolution.deliver(bus.as_ref());
        }
    }

    fn accept(&self) {
        self.resolve(ConfirmOutcome::Accepted);
    }

    fn reject(&self) {
        self.resolve(ConfirmOutcome::Rejected);
    }

    fn update(&self, now_ms: u64) {
        self.lock().unwrap().update(now_ms)
    }

    fn pending(&self) -> Option<ConfirmView> {
        self.lock().unwrap().pending()
    }

    fn take_dirty(&self) -> bool {
        self.lock().unwrap().take_dirty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_request_round_trip() {
        let bus = EventBus::new();
        let hub = confirm_hub(ConfirmOptions::default());
        hub.attach(&bus);

        let accepted = Arc::new(AtomicUsize::new(0));
        let accepted_clone = accepted.clone();
        let outcomes: Arc<Mutex<Vec<ConfirmOutcome>>> = Arc::new(Mutex::new(Vec::new()));
        let outcomes_clone = outcomes.clone();
        let _sub = bus.subscribe::<ConfirmResolved, _>(move |event| {
            outcomes_clone.lock().unwrap().push(event.outcome);
        });

        Confirmer::new(&bus).confirm(
            ConfirmRequest::new("Delete 3 files?")
                .header("Delete")
                .on_accept(move || {
                    accepted_clone.fetch_add(1, Ordering::SeqCst);
                }),
        );

        let view = hub.pending().unwrap();
        assert_eq!(view.header, "Delete");
        assert_eq!(view.accept_label, "Yes");
        assert_eq!(view.phase, OverlayPhase::Opening);

        hub.update(0);
        hub.update(150);
        assert_eq!(hub.pending().unwrap().phase, OverlayPhase::Open);

        hub.accept();
        assert_eq!(accepted.load(Ordering::SeqCst), 1);
        assert_eq!(*outcomes.lock().unwrap(), vec![ConfirmOutcome::Accepted]);
        assert_eq!(hub.pending().unwrap().phase, OverlayPhase::Closing);

        hub.update(200);
        hub.update(350);
        assert!(hub.pending().is_none());
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let request: ConfirmRequest =
            serde_json::from_str(r#"{ "message": "Overwrite settings.json?" }"#).unwrap();
        assert_eq!(request.message, "Overwrite settings.json?");
        assert_eq!(request.header, "Confirmation");
        assert_eq!(request.accept_label, "Yes");
        assert!(request.accept.is_none());
    }

    #[test]
    fn test_new_request_displaces_pending_as_dismissed() {
        let bus = EventBus::new();
        let hub = confirm_hub(ConfirmOptions::default());
        hub.attach(&bus);

        let outcomes: Arc<Mutex<Vec<(Option<String>, ConfirmOutcome)>>> =
            Arc::new(Mutex::new(Vec::new()));
        let outcomes_clone = outcomes.clone();
        let _sub = bus.subscribe::<ConfirmResolved, _>(move |event| {
            outcomes_clone
                .lock()
                .unwrap()
                .push((event.key.clone(), event.outcome));
        });

        let confirmer = Confirmer::new(&bus);
        confirmer.confirm(ConfirmRequest::new("first").key("a"));
        confirmer.confirm(ConfirmRequest::new("second").key("b"));

        assert_eq!(
            *outcomes.lock().unwrap(),
            vec![(Some("a".to_string()), ConfirmOutcome::Dismissed)]
        );
        assert_eq!(hub.pending().unwrap().message, "second");
    }

    #[test]
    fn test_reject_runs_reject_callback_only() {
        let hub = confirm_hub(ConfirmOptions::default());
        let accepted = Arc::new(AtomicUsize::new(0));
        let rejected = Arc::new(AtomicUsize::new(0));

        let accepted_clone = accepted.clone();
        let rejected_clone = rejected.clone();
        hub.request(
            ConfirmRequest::new("sure?")
                .on_accept(move || {
                    accepted_clone.fetch_add(1, Ordering::SeqCst);
                })
                .on_reject(move || {
                    rejected_clone.fetch_add(1, Ordering::SeqCst);
                }),
        );

        hub.reject();
        assert_eq!(accepted.load(Ordering::SeqCst), 0);
        assert_eq!(rejected.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dismiss_runs_no_callback() {
        let hub = confirm_hub(ConfirmOptions::default());
        let touched = Arc::new(AtomicUsize::new(0));

        let touched_a = touched.clone();
        let touched_b = touched.clone();
        hub.request(
            ConfirmRequest::new("sure?")
                .on_accept(move || {
                    touched_a.fetch_add(1, Ordering::SeqCst);
                })
                .on_reject(move || {
                    touched_b.fetch_add(1, Ordering::SeqCst);
                }),
        );

        hub.resolve(ConfirmOutcome::Dismissed);
        assert_eq!(touched.load(Ordering::SeqCst), 0);
        assert_eq!(hub.pending().unwrap().phase, OverlayPhase::Closing);
    }

    #[test]
    fn test_resolve_without_pending_is_noop() {
        let hub = confirm_hub(ConfirmOptions::default());
        hub.resolve(ConfirmOutcome::Accepted);
        assert!(hub.pending().is_none());

        // Resolving twice only fires once; the second resolve hits Closing.
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        hub.request(ConfirmRequest::new("sure?").on_accept(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        }));
        hub.accept();
        hub.accept();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zero_duration_phases_settle_quickly() {
        let hub = confirm_hub(ConfirmOptions {
            enter_ms: 0,
            exit_ms: 0,
        });
        hub.request(ConfirmRequest::new("now"));

        hub.update(10);
        assert_eq!(hub.pending().unwrap().phase, OverlayPhase::Open);
        assert!(hub.take_dirty());

        hub.resolve(ConfirmOutcome::Rejected);
        hub.update(11);
        assert!(hub.pending().is_none());
    }

    #[test]
    fn test_dropping_hub_detaches_from_bus() {
        let bus = EventBus::new();
        let hub = confirm_hub(ConfirmOptions::default());
        hub.attach(&bus);
        assert_eq!(bus.subscriber_count::<ConfirmRequested>(), 1);

        drop(hub);
        assert_eq!(bus.subscriber_count::<ConfirmRequested>(), 0);
    }
}
