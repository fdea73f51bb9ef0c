//! # Opal Gallery
//!
//! Headless carousel/gallery state:
//!
//! - **Window math**: pure shift/paging computation for a strip of items
//!   ([`window`])
//! - **Gallery state**: explicit update entry points returning what the host
//!   should apply and whether to animate ([`state`])
//! - **Autoplay**: poll-driven slideshow timing ([`autoplay`])
//! - **Responsive**: viewport-width to page-size resolution ([`responsive`])
//! - **Slots**: well-known render extension points ([`slot`])
//!
//! The crate computes which items are visible and where the strip should sit;
//! rendering, transforms, and transitions belong to the host.
//!
//! # Example
//!
//! ```
//! use opal_gallery::{Direction, GalleryState};
//!
//! let mut gallery = GalleryState::new(vec!["dawn", "noon", "dusk", "night"], 2);
//!
//! let update = gallery.on_active_index_changed(3);
//! assert_eq!(update.shift, -2);
//! assert_eq!(gallery.visible_indices(), 2..4);
//!
//! let step = gallery.on_step(Direction::Backward);
//! assert_eq!(step.active_index, 2);
//! ```

pub mod autoplay;
pub mod error;
pub mod responsive;
pub mod slot;
pub mod state;
pub mod window;

pub use autoplay::{Autoplay, DEFAULT_AUTOPLAY_INTERVAL_MS, MIN_AUTOPLAY_INTERVAL_MS};
pub use error::{GalleryError, Result};
pub use responsive::{Breakpoint, ResponsiveTable};
pub use slot::{GallerySlots, SlotContext};
pub use state::{GalleryState, ShiftUpdate, StepOutcome};
pub use window::Direction;
