//! Overlay visibility lifecycle
//!
//! Every transient surface (toast, confirmation dialog) moves through the
//! same four phases: `Closed -> Opening -> Open -> Closing -> Closed`. The
//! phase machine is a pure transition table; the hubs own the timestamps
//! that decide when a transition event fires.

/// Events driving the phase machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibilityEvent {
    /// Begin showing (Closed -> Opening)
    Show,
    /// Begin hiding (Open -> Closing; also interrupts Opening)
    Hide,
    /// The current enter/exit transition finished
    TransitionDone,
}

/// Phase of a transient surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum OverlayPhase {
    /// Not visible
    #[default]
    Closed,
    /// Enter transition is playing
    Opening,
    /// Fully visible and interactive
    Open,
    /// Exit transition is playing
    Closing,
}

impl OverlayPhase {
    /// Whether the surface should be rendered at all
    pub fn is_visible(&self) -> bool {
        !matches!(self, OverlayPhase::Closed)
    }

    /// Whether the surface is fully open and interactive
    pub fn is_open(&self) -> bool {
        matches!(self, OverlayPhase::Open)
    }

    /// Whether an enter/exit transition is playing
    pub fn is_animating(&self) -> bool {
        matches!(self, OverlayPhase::Opening | OverlayPhase::Closing)
    }

    /// Apply an event, returning the next phase or `None` if the event does
    /// not apply in the current phase
    pub fn on_event(&self, event: VisibilityEvent) -> Option<Self> {
        use OverlayPhase::*;
        use VisibilityEvent::*;

        match (self, event) {
            (Closed, Show) => Some(Opening),
            (Opening, TransitionDone) => Some(Open),
            (Open, Hide) => Some(Closing),
            // A hide during the enter transition skips straight to closing.
            (Opening, Hide) => Some(Closing),
            (Closing, TransitionDone) => Some(Closed),
            _ => None,
        }
    }
}
