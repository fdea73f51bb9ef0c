//! Slideshow Demo - Headless Gallery Walkthrough
//!
//! Drives a circular, autoplaying gallery with a synthetic clock and prints
//! the visible window after every change:
//! - Slideshow ticks delivered through `update(now_ms)`
//! - Responsive page sizing via a viewport resize event
//! - User navigation cancelling the slideshow
//! - Slot-based rendering of items and indicators
//!
//! Run with: cargo run -p opal_gallery --example slideshow

use opal_gallery::slot::{self, GallerySlots, SlotContext};
use opal_gallery::{Direction, GalleryState, ResponsiveTable};

const FRAMES: usize = 14;
const FRAME_MS: u64 = 500;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let photos = vec![
        "harbor", "dunes", "ridge", "falls", "canyon", "glacier", "meadow", "reef",
    ];
    let names = photos.clone();

    let slots: GallerySlots<String> = GallerySlots::builder()
        .slot(slot::ITEM, move |ctx: &SlotContext| {
            let name = names[ctx.index];
            if ctx.is_active {
                format!("[{name}]")
            } else {
                format!(" {name} ")
            }
        })
        .build();

    let mut gallery = GalleryState::new(photos, 3)
        .with_circular(true)
        .with_autoplay_interval(1000)
        .with_responsive(ResponsiveTable::new(3).breakpoint(640, 1).breakpoint(1280, 2));

    println!("initial window ({} pages)", gallery.total_pages());
    print_window(&gallery, &slots);

    gallery.start_autoplay(0);

    let mut now_ms = 0;
    for frame in 0..FRAMES {
        now_ms += FRAME_MS;

        // Halfway through, the host window narrows to a phone width.
        if frame == 6 {
            let update = gallery.on_viewport_resize(600);
            println!(
                "viewport resized to 600, page size {} (shift {})",
                gallery.page_size(),
                update.shift
            );
            print_window(&gallery, &slots);
        }

        if let Some(step) = gallery.update(now_ms) {
            println!(
                "t={now_ms}ms slideshow -> item {} (shift {})",
                step.active_index, step.shift
            );
            print_window(&gallery, &slots);
        }
    }

    // A click lands: the slideshow stops and navigation continues by hand.
    let step = gallery.on_step(Direction::Backward);
    println!(
        "user steps back -> item {} (shift {}), autoplay running: {}",
        step.active_index,
        step.shift,
        gallery.is_autoplaying()
    );
    print_window(&gallery, &slots);
}

fn print_window(gallery: &GalleryState<&str>, slots: &GallerySlots<String>) {
    let row: Vec<String> = gallery
        .visible_indices()
        .map(|i| {
            slots
                .render(slot::ITEM, &gallery.slot_context(i))
                .unwrap_or_default()
        })
        .collect();
    // Indicators fall back to the built-in dots; no slot registered for them.
    let dots: String = (0..gallery.len())
        .map(|i| {
            slots.render_or(slot::INDICATOR, &gallery.slot_context(i), |ctx| {
                if ctx.is_active {
                    "*".to_string()
                } else {
                    ".".to_string()
                }
            })
        })
        .collect();
    println!("  {}   {}", row.join(" "), dots);
}
