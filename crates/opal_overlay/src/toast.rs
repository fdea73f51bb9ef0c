//! Toast stacking hub
//!
//! A [`ToastHub`] is the consumer side of the message bus: it subscribes to
//! [`MessagePosted`]/[`MessagesCleared`], stacks accepted messages, walks
//! each one through the [`OverlayPhase`] lifecycle, and auto-dismisses
//! non-sticky messages after their life expires.
//!
//! The hub is headless and clock-free: the host drives it by calling
//! [`update`](ToastHubExt::update) from its frame or event loop with a
//! monotonic millisecond timestamp, then re-reads
//! [`visible`](ToastHubExt::visible) whenever [`take_dirty`](ToastHubExt::take_dirty)
//! reports a change.
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
//! let relay = MessageRelay::new(&bus);
//! relay.add(ToastMessage::success("Saved"));
//!
//! hub.update(0);
//! assert_eq!(hub.visible().len(), 1);
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use opal_core::{EventBus, Subscription};
use smallvec::SmallVec;

use crate::lifecycle::{OverlayPhase, VisibilityEvent};
use crate::message::{MessagePosted, MessagesCleared, ToastMessage};

// =============================================================================
// ToastOptions
// =============================================================================

/// Configuration for a toast hub
#[derive(Clone, Debug)]
pub struct ToastOptions {
    /// Only messages with this key are accepted
    pub key: Option<String>,
    /// How many toasts the host shows at once; the rest stay queued
    pub max_visible: usize,
    /// Enter transition length
    pub enter_ms: u64,
    /// Exit transition length
    pub exit_ms: u64,
    /// Drop messages identical to one already showing
    pub reject_duplicates: bool,
}

impl Default for ToastOptions {
    fn default() -> Self {
        Self {
            key: None,
            max_visible: 5,
            enter_ms: 250,
            exit_ms: 200,
            reject_duplicates: false,
        }
    }
}

// =============================================================================
// ToastHandle / ToastView
// =============================================================================

/// Handle identifying one toast within its hub
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ToastHandle(u64);

/// Snapshot of one toast for rendering
#[derive(Clone, Debug)]
pub struct ToastView {
    pub handle: ToastHandle,
    pub message: ToastMessage,
    pub phase: OverlayPhase,
}

// =============================================================================
// ToastHubInner
// =============================================================================

struct ActiveToast {
    message: ToastMessage,
    phase: OverlayPhase,
    /// Set on the first update after showing
    created_at_ms: Option<u64>,
    /// Set when the enter transition completes
    opened_at_ms: Option<u64>,
    /// Set when the exit transition starts
    close_started_at_ms: Option<u64>,
}

/// Inner state of a toast hub
pub struct ToastHubInner {
    options: ToastOptions,
    toasts: IndexMap<ToastHandle, ActiveToast>,
    next_id: AtomicU64,
    /// Set when observable state changes (insert, phase transition, removal)
    dirty: AtomicBool,
    subscriptions: SmallVec<[Subscription; 2]>,
}

impl ToastHubInner {
    /// Create a hub with the given options
    pub fn new(options: ToastOptions) -> Self {
        Self {
            options,
            toasts: IndexMap::new(),
            next_id: AtomicU64::new(1),
            dirty: AtomicBool::new(false),
            subscriptions: SmallVec::new(),
        }
    }

    /// The hub's configuration
    pub fn options(&self) -> &ToastOptions {
        &self.options
    }

    /// Number of tracked toasts, including queued and closing ones
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    /// Whether no toasts are tracked
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Check and clear the dirty flag
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::SeqCst)
    }

    /// Check the dirty flag without clearing it
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Accept a bus message if its key matches this hub
    pub fn accept(&mut self, message: ToastMessage) {
        if message.key != self.options.key {
            tracing::debug!(
                message_key = ?message.key,
                hub_key = ?self.options.key,
                "message key does not match hub, ignoring"
            );
            return;
        }
        self.show(message);
    }

    /// Track a new toast, entering at `Opening`
    ///
    /// With `reject_duplicates`, a message equal (summary, severity, key) to
    /// one already tracked is dropped and the existing handle returned.
    pub fn show(&mut self, message: ToastMessage) -> ToastHandle {
        if self.options.reject_duplicates {
            let duplicate = self.toasts.iter().find(|(_, toast)| {
                toast.message.summary == message.summary
                    && toast.message.severity == message.severity
                    && toast.message.key == message.key
            });
            if let Some((&handle, _)) = duplicate {
                tracing::debug!(summary = %message.summary, "duplicate message dropped");
                return handle;
            }
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let handle = ToastHandle(id);
        tracing::debug!(?handle, severity = %message.severity, "toast shown");

        self.toasts.insert(
            handle,
            ActiveToast {
                message,
                phase: OverlayPhase::Opening,
                created_at_ms: None,
                opened_at_ms: None,
                close_started_at_ms: None,
            },
        );
        self.mark_dirty();
        handle
    }

    /// Begin closing one toast
    pub fn dismiss(&mut self, handle: ToastHandle) {
        if let Some(toast) = self.toasts.get_mut(&handle) {
            if let Some(next) = toast.phase.on_event(VisibilityEvent::Hide) {
                tracing::debug!(?handle, "toast dismissed");
                toast.phase = next;
                self.mark_dirty();
            }
        }
    }

    /// Begin closing every toast
    pub fn clear(&mut self) {
        let mut changed = false;
        for toast in self.toasts.values_mut() {
            if let Some(next) = toast.phase.on_event(VisibilityEvent::Hide) {
                toast.phase = next;
                changed = true;
            }
        }
        if changed {
            tracing::debug!("toast hub cleared");
            self.mark_dirty();
        }
    }

    /// Handle a bus clear for `key`
    pub fn clear_for_key(&mut self, key: &Option<String>) {
        if key.is_none() || *key == self.options.key {
            self.clear();
        }
    }

    /// Drive phase transitions and auto-dismissal
    ///
    /// Call every frame (or on every synthetic clock tick) with a monotonic
    /// millisecond timestamp.
    pub fn update(&mut self, now_ms: u64) {
        let mut to_close: Vec<ToastHandle> = Vec::new();
        let mut changed = false;

        for (handle, toast) in self.toasts.iter_mut() {
            if toast.created_at_ms.is_none() {
                toast.created_at_ms = Some(now_ms);
            }

            match toast.phase {
                OverlayPhase::Opening => {
                    if let Some(created) = toast.created_at_ms {
                        if now_ms.saturating_sub(created) >= self.options.enter_ms {
                            if let Some(next) = toast.phase.on_event(VisibilityEvent::TransitionDone)
                            {
                                toast.phase = next;
                                toast.opened_at_ms = Some(now_ms);
                                changed = true;
                            }
                        }
                    }
                }
                OverlayPhase::Open => {
                    if !toast.message.sticky {
                        if let Some(opened) = toast.opened_at_ms {
                            if now_ms >= opened + toast.message.life_ms {
                                to_close.push(*handle);
                            }
                        }
                    }
                }
                OverlayPhase::Closing => {
                    if toast.close_started_at_ms.is_none() {
                        toast.close_started_at_ms = Some(now_ms);
                    }
                    if let Some(started) = toast.close_started_at_ms {
                        if now_ms.saturating_sub(started) >= self.options.exit_ms {
                            if let Some(next) = toast.phase.on_event(VisibilityEvent::TransitionDone)
                            {
                                toast.phase = next;
                                changed = true;
                            }
                        }
                    }
                }
                OverlayPhase::Closed => {}
            }
        }

        for handle in to_close {
            if let Some(toast) = self.toasts.get_mut(&handle) {
                if let Some(next) = toast.phase.on_event(VisibilityEvent::Hide) {
                    tracing::debug!(?handle, "toast life expired");
                    toast.phase = next;
                    changed = true;
                }
            }
        }

        let before = self.toasts.len();
        self.toasts.retain(|_, toast| toast.phase != OverlayPhase::Closed);
        if self.toasts.len() != before {
            changed = true;
        }

        if changed {
            self.mark_dirty();
        }
    }

    /// Toasts the host should render, in insertion order, capped at
    /// `max_visible`
    ///
    /// Queued toasts beyond the cap keep their phases and timers running and
    /// surface as older toasts leave.
    pub fn visible(&self) -> Vec<ToastView> {
        self.toasts
            .iter()
            .take(self.options.max_visible)
            .map(|(&handle, toast)| ToastView {
                handle,
                message: toast.message.clone(),
                phase: toast.phase,
            })
            .collect()
    }
}

impl Default for ToastHubInner {
    fn default() -> Self {
        Self::new(ToastOptions::default())
    }
}

// =============================================================================
// ToastHub - shared handle
// =============================================================================

/// Shared toast hub handle
pub type ToastHub = Arc<Mutex<ToastHubInner>>;

/// Create a toast hub
pub fn toast_hub(options: ToastOptions) -> ToastHub {
    Arc::new(Mutex::new(ToastHubInner::new(options)))
}

/// Hub operations on the shared handle
pub trait ToastHubExt {
    /// Subscribe the hub to [`MessagePosted`] and [`MessagesCleared`] on `bus`
    ///
    /// The subscriptions live inside the hub: dropping the last hub handle
    /// detaches it from the bus.
    fn attach(&self, bus: &EventBus);
    /// Track a new toast directly, bypassing the bus
    fn show(&self, message: ToastMessage) -> ToastHandle;
    /// Begin closing one toast
    fn dismiss(&self, handle: ToastHandle);
    /// Begin closing every toast
    fn clear(&self);
    /// Drive phase transitions and auto-dismissal
    fn update(&self, now_ms: u64);
    /// Toasts the host should render
    fn visible(&self) -> Vec<ToastView>;
    /// Check and clear the dirty flag
    fn take_dirty(&self) -> bool;
}

impl ToastHubExt for ToastHub {
    fn attach(&self, bus: &EventBus) {
        // Callbacks hold a weak reference so the bus never keeps a dropped
        // hub alive.
        let posted = {
            let hub = Arc::downgrade(self);
            bus.subscribe::<MessagePosted, _>(move |event| {
                if let Some(hub) = hub.upgrade() {
                    hub.lock().unwrap().accept(event.message.clone());
                }
            })
        };
        let cleared = {
            let hub = Arc::downgrade(self);
            bus.subscribe::<MessagesCleared, _>(move |event| {
                if let Some(hub) = hub.upgrade() {
                    hub.lock().unwrap().clear_for_key(&event.key);
                }
            })
        };

        let mut inner = self.lock().unwrap();
        inner.subscriptions.push(posted);
        inner.subscriptions.push(cleared);
    }

    fn show(&self, message: ToastMessage) -> ToastHandle {
        self.lock().unwrap().show(message)
    }

    fn dismiss(&self, handle: ToastHandle) {
        self.lock().unwrap().dismiss(handle)
    }

    fn clear(&self) {
        self.lock().unwrap().clear()
    }

    fn update(&self, now_ms: u64) {
        self.lock().unwrap().update(now_ms)
    }

    fn visible(&self) -> Vec<ToastView> {
        self.lock().unwrap().visible()
    }

    fn take_dirty(&self) -> bool {
        self.lock().unwrap().take_dirty()
    }
}
