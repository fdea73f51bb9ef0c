//! Well-known gallery slot names
//!
//! Hosts fill these in a [`SlotRegistry`](opal_core::SlotRegistry) to
//! override the built-in rendering of each gallery region. The registry's
//! context type is [`SlotContext`], built per item by
//! [`GalleryState::slot_context`](crate::GalleryState::slot_context).

use opal_core::SlotRegistry;

/// Main strip item
pub const ITEM: &str = "item";
/// Thumbnail strip item
pub const THUMBNAIL: &str = "thumbnail";
/// Page indicator
pub const INDICATOR: &str = "indicator";
/// Caption for the active item
pub const CAPTION: &str = "caption";

/// Per-item context handed to gallery slot callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotContext {
    /// Index of the item being rendered
    pub index: usize,
    /// Whether this item is the active one
    pub is_active: bool,
    /// Whether this item falls inside the visible window
    pub is_visible: bool,
}

/// Slot registry specialized to gallery rendering
pub type GallerySlots<R> = SlotRegistry<SlotContext, R>;
