//! Toast message model and the bus topics that carry it
//!
//! Producers anywhere in the process hand messages to a [`MessageRelay`];
//! any attached [`ToastHub`](crate::ToastHub) whose key matches picks them
//! up. The relay and the hubs only share an
//! [`EventBus`](opal_core::EventBus), never each other.

use std::fmt;

use opal_core::EventBus;
use serde::{Deserialize, Serialize};

/// Default time a non-sticky message stays open
pub const DEFAULT_LIFE_MS: u64 = 3000;

/// Message severity, in ascending order of urgency
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warn => "warn",
            Severity::Error => "error",
        };
        f.write_str(name)
    }
}

/// One toast message
///
/// Built through the severity constructors:
///
/// ```
/// use opal_overlay::ToastMessage;
///
/// let message = ToastMessage::success("Saved")
///     .detail("Draft stored locally")
///     .life_ms(5000);
/// assert!(!message.sticky);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastMessage {
    pub severity: Severity,
    pub summary: String,
    /// Longer body text under the summary
    pub detail: Option<String>,
    /// Routes the message to the hub with the same key
    pub key: Option<String>,
    /// How long the message stays open once fully shown
    pub life_ms: u64,
    /// Sticky messages never auto-dismiss
    pub sticky: bool,
    /// Whether the host should offer a close affordance
    pub closable: bool,
}

impl Default for ToastMessage {
    fn default() -> Self {
        Self {
            severity: Severity::Info,
            summary: String::new(),
            detail: None,
            key: None,
            life_ms: DEFAULT_LIFE_MS,
            sticky: false,
            closable: true,
        }
    }
}

impl ToastMessage {
    /// Message with the given severity and summary
    pub fn new(severity: Severity, summary: impl Into<String>) -> Self {
        Self {
            severity,
            summary: summary.into(),
            ..Self::default()
        }
    }

    /// Info message
    pub fn info(summary: impl Into<String>) -> Self {
        Self::new(Severity::Info, summary)
    }

    /// Success message
    pub fn success(summary: impl Into<String>) -> Self {
        Self::new(Severity::Success, summary)
    }

    /// Warning message
    pub fn warn(summary: impl Into<String>) -> Self {
        Self::new(Severity::Warn, summary)
    }

    /// Error message
    pub fn error(summary: impl Into<String>) -> Self {
        Self::new(Severity::Error, summary)
    }

    /// Set the detail text
    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Route to the hub with this key
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set how long the message stays open
    pub fn life_ms(mut self, life_ms: u64) -> Self {
        self.life_ms = life_ms;
        self
    }

    /// Keep the message open until dismissed
    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }

    /// Set whether the host should offer a close affordance
    pub fn closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }
}

/// Bus topic: a message was posted
#[derive(Clone, Debug)]
pub struct MessagePosted {
    pub message: ToastMessage,
}

/// Bus topic: messages were cleared
///
/// `key = None` clears every hub; `Some(key)` clears only the matching one.
#[derive(Clone, Debug)]
pub struct MessagesCleared {
    pub key: Option<String>,
}

/// Producer-side facade for posting toast messages
///
/// Cheap to clone; clones share the underlying bus.
#[derive(Clone, Debug)]
pub struct MessageRelay {
    bus: EventBus,
}

impl MessageRelay {
    /// Relay publishing on `bus`
    pub fn new(bus: &EventBus) -> Self {
        Self { bus: bus.clone() }
    }

    /// Post one message
    pub fn add(&self, message: ToastMessage) {
        tracing::debug!(severity = %message.severity, summary = %message.summary, "message posted");
        if self.bus.publish(&MessagePosted { message }) == 0 {
            tracing::warn!("message posted with no toast hub attached");
        }
    }

    /// Post several messages in order
    pub fn add_all(&self, messages: impl IntoIterator<Item = ToastMessage>) {
        for message in messages {
            self.add(message);
        }
    }

    /// Clear every hub
    pub fn clear(&self) {
        self.bus.publish(&MessagesCleared { key: None });
    }

    /// Clear the hub with `key`
    pub fn clear_key(&self, key: impl Into<String>) {
        self.bus.publish(&MessagesCleared {
            key: Some(key.into()),
        });
    }
}
