//! Gallery state and its update entry points
//!
//! [`GalleryState`] owns the `(items, page_size, active_index, shift)` tuple
//! and is driven through explicit entry points instead of property diffing:
//! the owning component calls [`on_active_index_changed`], [`on_page_size_changed`]
//! or [`on_step`] exactly when those values change, and receives an outcome
//! struct describing the new window position and whether the change should
//! be animated.
//!
//! The state is headless. Applying the shift as a transform, running the
//! transition, and drawing items are the host's job; the outcome structs
//! carry everything it needs.
//!
//! [`on_active_index_changed`]: GalleryState::on_active_index_changed
//! [`on_page_size_changed`]: GalleryState::on_page_size_changed
//! [`on_step`]: GalleryState::on_step

use std::ops::Range;

use crate::autoplay::{Autoplay, DEFAULT_AUTOPLAY_INTERVAL_MS};
use crate::responsive::ResponsiveTable;
use crate::slot::SlotContext;
use crate::window::{self, Direction};

// =============================================================================
// Outcomes
// =============================================================================

/// Result of an entry point that may move the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftUpdate {
    /// Strip translation in item-width units, `<= 0`
    pub shift: isize,
    /// Whether the host should animate the transform change
    pub animate: bool,
}

/// Result of a navigation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Active index after the step
    pub active_index: usize,
    /// Strip translation after the step
    pub shift: isize,
    /// False when the step saturated at a boundary and nothing moved
    pub animate: bool,
}

// =============================================================================
// GalleryState
// =============================================================================

/// Headless gallery: a collection, a visible window, and an active item
///
/// # Example
///
/// ```
/// use opal_gallery::{Direction, GalleryState};
///
/// let mut gallery = GalleryState::new(vec!["a", "b", "c", "d", "e"], 3);
/// let update = gallery.on_active_index_changed(4);
/// assert_eq!(update.shift, -2);
/// assert!(update.animate);
///
/// let step = gallery.on_step(Direction::Backward);
/// assert_eq!(step.active_index, 3);
/// ```
#[derive(Debug)]
pub struct GalleryState<T> {
    items: Vec<T>,
    page_size: usize,
    active_index: usize,
    shift: isize,
    circular: bool,
    autoplay: Autoplay,
    responsive: Option<ResponsiveTable>,
}

impl<T> GalleryState<T> {
    /// Create a gallery showing `page_size` items at once
    ///
    /// The active index starts at `0` with no shift. A `page_size` of `0` is
    /// corrected to `1`.
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        Self {
            items,
            page_size: checked_page_size(page_size),
            active_index: 0,
            shift: 0,
            circular: false,
            autoplay: Autoplay::new(DEFAULT_AUTOPLAY_INTERVAL_MS),
            responsive: None,
        }
    }

    /// Enable wraparound navigation
    pub fn with_circular(mut self, circular: bool) -> Self {
        self.circular = circular;
        self
    }

    /// Set the slideshow interval (does not start the slideshow)
    pub fn with_autoplay_interval(mut self, interval_ms: u64) -> Self {
        self.autoplay.set_interval(interval_ms);
        self
    }

    /// Attach a responsive page-size table consulted by
    /// [`on_viewport_resize`](Self::on_viewport_resize)
    pub fn with_responsive(mut self, table: ResponsiveTable) -> Self {
        self.responsive = Some(table);
        self
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// The active item changed (navigation, thumbnail click, indicator click)
    ///
    /// Out-of-range indices are clamped to the collection. The update is
    /// animated only when the index actually changed; repeated calls with the
    /// same index leave the shift untouched.
    pub fn on_active_index_changed(&mut self, new_index: usize) -> ShiftUpdate {
        self.cancel_autoplay_on_interaction();

        let clamped = self.clamp_index(new_index);
        if clamped != new_index {
            tracing::warn!(requested = new_index, clamped, "active index out of range, clamping");
        }

        let changed = clamped != self.active_index;
        if changed {
            self.active_index = clamped;
            self.shift = window::recompute_shift(self.len(), self.page_size, clamped);
        }
        ShiftUpdate {
            shift: self.shift,
            animate: changed,
        }
    }

    /// The number of visible items changed (responsive breakpoint)
    ///
    /// Never animated: the window snaps to its new geometry so a resize does
    /// not look like navigation.
    pub fn on_page_size_changed(&mut self, new_page_size: usize) -> ShiftUpdate {
        let checked = checked_page_size(new_page_size);
        if checked != self.page_size {
            self.page_size = checked;
            self.shift = window::recompute_shift(self.len(), checked, self.active_index);
        }
        ShiftUpdate {
            shift: self.shift,
            animate: false,
        }
    }

    /// Navigate one item in `direction`
    ///
    /// Moves the window one unit (clamped, or wrapped when circular) and
    /// derives the new active index. A step that saturates at a boundary
    /// returns `animate = false`.
    pub fn on_step(&mut self, direction: Direction) -> StepOutcome {
        self.cancel_autoplay_on_interaction();
        self.step_internal(direction)
    }

    /// Replace the collection
    ///
    /// The active index is re-clamped to the new collection (an empty one
    /// resets it to `0`) and the shift recomputed. Never animated.
    pub fn set_items(&mut self, items: Vec<T>) -> ShiftUpdate {
        self.items = items;
        self.active_index = self.clamp_index(self.active_index);
        self.shift = window::recompute_shift(self.len(), self.page_size, self.active_index);
        ShiftUpdate {
            shift: self.shift,
            animate: false,
        }
    }

    /// The host viewport was resized
    ///
    /// Resolves the width through the attached [`ResponsiveTable`] and routes
    /// the result through [`on_page_size_changed`](Self::on_page_size_changed).
    /// Without a table this is a no-op.
    pub fn on_viewport_resize(&mut self, viewport_width: u32) -> ShiftUpdate {
        match self.responsive.as_ref().map(|t| t.resolve(viewport_width)) {
            Some(page_size) => self.on_page_size_changed(page_size),
            None => ShiftUpdate {
                shift: self.shift,
                animate: false,
            },
        }
    }

    fn step_internal(&mut self, direction: Direction) -> StepOutcome {
        if self.items.is_empty() {
            return StepOutcome {
                active_index: 0,
                shift: 0,
                animate: false,
            };
        }

        let len = self.len();
        // The wrap check needs the index before the step.
        self.shift = if self.circular {
            window::circular_step(self.shift, direction, self.active_index, len, self.page_size)
        } else {
            window::step(self.shift, direction, len, self.page_size)
        };

        let previous = self.active_index;
        self.active_index = match direction {
            Direction::Forward => {
                if self.active_index + 1 < len {
                    self.active_index + 1
                } else if self.circular {
                    0
                } else {
                    self.active_index
                }
            }
            Direction::Backward => {
                if self.active_index > 0 {
                    self.active_index - 1
                } else if self.circular {
                    len - 1
                } else {
                    0
                }
            }
        };

        StepOutcome {
            active_index: self.active_index,
            shift: self.shift,
            animate: self.active_index != previous,
        }
    }

    // =========================================================================
    // Slideshow
    // =========================================================================

    /// Start the slideshow; the first advance is one interval after `now_ms`
    pub fn start_autoplay(&mut self, now_ms: u64) {
        self.autoplay.start(now_ms);
    }

    /// Stop the slideshow
    pub fn stop_autoplay(&mut self) {
        self.autoplay.stop();
    }

    /// Whether the slideshow is running
    pub fn is_autoplaying(&self) -> bool {
        self.autoplay.is_running()
    }

    /// Change the slideshow interval
    pub fn set_autoplay_interval(&mut self, interval_ms: u64) {
        self.autoplay.set_interval(interval_ms);
    }

    /// Advance the slideshow if a tick is due
    ///
    /// Hosts call this from their frame or event loop with a monotonic
    /// millisecond clock. Returns the step outcome when the gallery moved.
    /// A non-circular slideshow stops itself once the last item is active.
    pub fn update(&mut self, now_ms: u64) -> Option<StepOutcome> {
        if !self.autoplay.due(now_ms) {
            return None;
        }
        if self.items.is_empty() {
            self.autoplay.stop();
            return None;
        }
        if !self.circular && self.active_index + 1 >= self.len() {
            tracing::debug!("slideshow reached the last item, stopping");
            self.autoplay.stop();
            return None;
        }
        Some(self.step_internal(Direction::Forward))
    }

    fn cancel_autoplay_on_interaction(&mut self) {
        if self.autoplay.is_running() {
            tracing::debug!("user navigation, stopping slideshow");
            self.autoplay.stop();
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The collection
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// One item, if the index exists
    pub fn item(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Current active index
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// Current strip translation in item-width units
    pub fn shift(&self) -> isize {
        self.shift
    }

    /// Current page size
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Whether navigation wraps around
    pub fn is_circular(&self) -> bool {
        self.circular
    }

    /// Number of distinct window positions
    pub fn total_pages(&self) -> usize {
        window::total_pages(self.len(), self.page_size)
    }

    /// Indices currently inside the window
    pub fn visible_indices(&self) -> Range<usize> {
        window::visible_range(self.shift, self.len(), self.page_size)
    }

    /// Whether `index` is inside the window
    pub fn is_index_visible(&self, index: usize) -> bool {
        window::is_index_visible(index, self.shift, self.page_size)
    }

    /// Whether backward navigation would be a no-op
    pub fn is_backward_disabled(&self) -> bool {
        (!self.circular && self.active_index == 0) || self.len() <= self.page_size
    }

    /// Whether forward navigation would be a no-op
    pub fn is_forward_disabled(&self) -> bool {
        (!self.circular && self.active_index + 1 >= self.len()) || self.len() <= self.page_size
    }

    /// Context for rendering item `index` through a slot registry
    pub fn slot_context(&self, index: usize) -> SlotContext {
        SlotContext {
            index,
            is_active: index == self.active_index && !self.items.is_empty(),
            is_visible: self.is_index_visible(index),
        }
    }

    fn clamp_index(&self, index: usize) -> usize {
        if self.items.is_empty() {
            0
        } else {
            index.min(self.len() - 1)
        }
    }
}

fn checked_page_size(page_size: usize) -> usize {
    if page_size == 0 {
        tracing::warn!("page size 0 corrected to 1");
        1
    } else {
        page_size
    }
}
