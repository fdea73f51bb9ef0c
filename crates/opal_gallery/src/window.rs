//! Visible-window shift math for carousel strips
//!
//! A gallery renders its items as a horizontal strip and translates that
//! strip so a window of `page_size` items is visible. The translation is the
//! *shift*: a count of item-widths, zero or negative, applied to the strip.
//! `-shift` is therefore the index of the first visible item.
//!
//! The active item sits on the window's pivot slot (its [`median_index`])
//! while there is room to center it, and the window pins to the collection
//! edges otherwise. Everything here is a pure function of its inputs; the
//! stateful wrapper in [`crate::state`] decides *when* to recompute and
//! whether the host should animate the resulting transform.
//!
//! A `page_size` of `0` is treated as `1` by every function in this module.
//! Callers that prefer rejection over correction use the `try_` variants.

use std::ops::Range;

use crate::error::{GalleryError, Result};

/// Navigation direction through the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward later items
    Forward,
    /// Toward earlier items
    Backward,
}

impl Direction {
    /// Shift delta for one step
    ///
    /// The strip moves opposite to the direction of travel, so forward is
    /// `-1` and backward is `+1`.
    pub fn delta(self) -> isize {
        match self {
            Direction::Forward => -1,
            Direction::Backward => 1,
        }
    }
}

/// Pivot slot within the visible window
///
/// The slot the active item occupies while there is room to center it:
/// `page_size / 2` for odd page sizes, `page_size / 2 - 1` for even ones.
///
/// # Example
///
/// ```
/// use opal_gallery::window::median_index;
///
/// assert_eq!(median_index(5), 2);
/// assert_eq!(median_index(4), 1);
/// ```
pub fn median_index(page_size: usize) -> usize {
    let page_size = page_size.max(1);
    if page_size % 2 == 1 {
        page_size / 2
    } else {
        page_size / 2 - 1
    }
}

/// Number of distinct window positions
///
/// `len - page_size + 1` when the collection overflows the window, else `0`.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    if len > page_size {
        len - page_size + 1
    } else {
        0
    }
}

/// Shift that brings `active_index` into view
///
/// Four cases, checked in order:
/// 1. active at or before the pivot: window pinned to the start, shift `0`;
/// 2. active past the last centerable index: window pinned to the end,
///    shift `page_size - len`;
/// 3. active in the last page and the page size even: one extra slot of
///    headroom, shift `-active + median + 1`;
/// 4. otherwise: active centered on the pivot, shift `-active + median`.
///
/// Case 3 is asymmetric: no mirrored correction exists near the start. This
/// matches the shipped navigation feel and is kept as-is.
///
/// When everything fits (`page_size >= len`) or the collection is empty the
/// shift is `0`.
pub fn recompute_shift(len: usize, page_size: usize, active_index: usize) -> isize {
    let page_size = page_size.max(1);
    if len == 0 || page_size >= len {
        return 0;
    }

    let median = median_index(page_size) as isize;
    let active = active_index as isize;
    let len = len as isize;
    let page = page_size as isize;

    if active <= median {
        0
    } else if len - page + median < active {
        page - len
    } else if len - page < active && page % 2 == 0 {
        -active + median + 1
    } else {
        -active + median
    }
}

/// Strict [`recompute_shift`]: rejects instead of clamping
///
/// # Errors
///
/// [`GalleryError::InvalidPageSize`] when `page_size` is `0`;
/// [`GalleryError::IndexOutOfRange`] when `active_index` is outside a
/// non-empty collection.
pub fn try_recompute_shift(len: usize, page_size: usize, active_index: usize) -> Result<isize> {
    if page_size == 0 {
        return Err(GalleryError::InvalidPageSize(page_size));
    }
    if len > 0 && active_index >= len {
        return Err(GalleryError::IndexOutOfRange {
            index: active_index,
            len,
        });
    }
    Ok(recompute_shift(len, page_size, active_index))
}

/// Move the window one position, clamping at the collection edges
///
/// Forward steps stop once the last item is visible (shift pinned at
/// `page_size - len`); backward steps stop at `0`. Wraparound is layered on
/// top by [`circular_step`].
pub fn step(shift: isize, direction: Direction, len: usize, page_size: usize) -> isize {
    let page_size = page_size.max(1);
    if len == 0 || page_size >= len {
        return 0;
    }

    let len = len as isize;
    let page = page_size as isize;
    let stepped = shift + direction.delta();

    match direction {
        // The right window edge may not pass the last item.
        Direction::Forward if -stepped + page > len - 1 => page - len,
        Direction::Backward if stepped > 0 => 0,
        _ => stepped,
    }
}

/// [`step`] with wraparound at the collection edges
///
/// Stepping forward from the last index snaps the window back to the start;
/// stepping backward from index `0` snaps it to the end. Needs the active
/// index *before* the step to detect the wrap.
pub fn circular_step(
    shift: isize,
    direction: Direction,
    active_index: usize,
    len: usize,
    page_size: usize,
) -> isize {
    let page_size = page_size.max(1);
    if len == 0 || page_size >= len {
        return 0;
    }

    match direction {
        Direction::Forward if active_index == len - 1 => 0,
        Direction::Backward if active_index == 0 => page_size as isize - len as isize,
        _ => step(shift, direction, len, page_size),
    }
}

/// Whether `index` falls inside the window at `shift`
pub fn is_index_visible(index: usize, shift: isize, page_size: usize) -> bool {
    let page = page_size.max(1) as isize;
    let index = index as isize;
    -shift <= index && index <= -shift + page - 1
}

/// The window at `shift` as an index range, clipped to the collection
pub fn visible_range(shift: isize, len: usize, page_size: usize) -> Range<usize> {
    if len == 0 {
        return 0..0;
    }
    let start = (-shift).max(0) as usize;
    let start = start.min(len);
    let end = (start + page_size.max(1)).min(len);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_index() {
        assert_eq!(median_index(1), 0);
        assert_eq!(median_index(2), 0);
        assert_eq!(median_index(3), 1);
        assert_eq!(median_index(4), 1);
        assert_eq!(median_index(5), 2);
        assert_eq!(median_index(7), 3);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(10, 3), 8);
        assert_eq!(total_pages(10, 10), 0);
        assert_eq!(total_pages(3, 10), 0);
        assert_eq!(total_pages(0, 3), 0);
    }

    #[test]
    fn test_no_shift_when_everything_fits() {
        for len in 0..=6 {
            for page_size in len..=8 {
                for active in 0..len.max(1) {
                    assert_eq!(
                        recompute_shift(len, page_size.max(1), active),
                        0,
                        "len={len} page_size={page_size} active={active}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_start_and_end_pins() {
        assert_eq!(recompute_shift(10, 3, 0), 0);
        assert_eq!(recompute_shift(10, 3, 1), 0);
        assert_eq!(recompute_shift(10, 3, 9), -7);
        assert_eq!(recompute_shift(10, 3, 8), -7);
    }

    #[test]
    fn test_centered_general_case() {
        // Active 5 sits on pivot slot 1 of a 3-wide window: items 4..=6.
        assert_eq!(recompute_shift(10, 3, 5), -4);
        assert!(is_index_visible(5, -4, 3));
        assert_eq!(visible_range(-4, 10, 3), 4..7);
    }

    #[test]
    fn test_even_page_size_end_correction() {
        // Last page with an even window gets one extra slot of headroom.
        assert_eq!(recompute_shift(10, 4, 7), -5);
        // One index earlier takes the general case instead.
        assert_eq!(recompute_shift(10, 4, 6), -5);
        // Past the last centerable index the end pin wins.
        assert_eq!(recompute_shift(10, 4, 8), -6);
    }

    #[test]
    fn test_window_stays_in_bounds() {
        for len in 1..=12 {
            for page_size in 1..=12 {
                for active in 0..len {
                    let shift = recompute_shift(len, page_size, active);
                    assert!(shift <= 0, "shift must never be positive");
                    let range = visible_range(shift, len, page_size);
                    assert!(range.start < len || len == 0);
                    assert!(range.end <= len);
                    if page_size < len {
                        assert_eq!(range.len(), page_size);
                    }
                }
            }
        }
    }

    #[test]
    fn test_recompute_is_idempotent() {
        for active in 0..10 {
            let first = recompute_shift(10, 4, active);
            let second = recompute_shift(10, 4, active);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_step_forward_clamps() {
        let mut shift = 0;
        for _ in 0..8 {
            shift = step(shift, Direction::Forward, 10, 3);
        }
        assert_eq!(shift, -7);
        // Further steps stay pinned.
        assert_eq!(step(shift, Direction::Forward, 10, 3), -7);
    }

    #[test]
    fn test_step_backward_clamps_at_zero() {
        assert_eq!(step(0, Direction::Backward, 10, 3), 0);
        assert_eq!(step(-1, Direction::Backward, 10, 3), 0);
        assert_eq!(step(-5, Direction::Backward, 10, 3), -4);
    }

    #[test]
    fn test_step_noop_when_everything_fits() {
        assert_eq!(step(0, Direction::Forward, 3, 5), 0);
        assert_eq!(step(0, Direction::Backward, 3, 5), 0);
        assert_eq!(step(0, Direction::Forward, 0, 3), 0);
    }

    #[test]
    fn test_circular_wrap_forward() {
        // Stepping forward from the last index snaps the window home.
        assert_eq!(circular_step(-2, Direction::Forward, 4, 5, 3), 0);
        // Mid-collection circular stepping behaves like the clamped step.
        assert_eq!(circular_step(-1, Direction::Forward, 2, 5, 3), -2);
    }

    #[test]
    fn test_circular_wrap_backward() {
        assert_eq!(circular_step(0, Direction::Backward, 0, 5, 3), -2);
        assert_eq!(circular_step(-2, Direction::Backward, 3, 5, 3), -1);
    }

    #[test]
    fn test_is_index_visible() {
        // Shift -4 with 3 visible shows items 4, 5 and 6.
        assert!(!is_index_visible(3, -4, 3));
        assert!(is_index_visible(4, -4, 3));
        assert!(is_index_visible(6, -4, 3));
        assert!(!is_index_visible(7, -4, 3));
    }

    #[test]
    fn test_visible_range_edges() {
        assert_eq!(visible_range(0, 10, 3), 0..3);
        assert_eq!(visible_range(-7, 10, 3), 7..10);
        assert_eq!(visible_range(0, 0, 3), 0..0);
        assert_eq!(visible_range(0, 2, 5), 0..2);
    }

    #[test]
    fn test_zero_page_size_treated_as_one() {
        assert_eq!(recompute_shift(5, 0, 3), recompute_shift(5, 1, 3));
        assert_eq!(median_index(0), 0);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn test_try_variants_reject() {
        assert_eq!(
            try_recompute_shift(5, 0, 2),
            Err(GalleryError::InvalidPageSize(0))
        );
        assert_eq!(
            try_recompute_shift(5, 3, 5),
            Err(GalleryError::IndexOutOfRange { index: 5, len: 5 })
        );
        assert_eq!(try_recompute_shift(5, 3, 4), Ok(-2));
        // An empty collection has no indices to be out of range.
        assert_eq!(try_recompute_shift(0, 3, 0), Ok(0));
    }
}
