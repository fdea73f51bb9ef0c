//! Toast and Confirm Demo - Overlay services driven by a shared event bus
//!
//! This example demonstrates:
//! - Posting toast messages through a `MessageRelay`
//! - A `ToastHub` walking each toast through enter/life/exit phases
//! - The `max_visible` cap queueing extra toasts until a slot frees up
//! - A confirmation round trip whose accept callback posts a toast
//! - Clearing sticky toasts
//!
//! Run with: cargo run -p opal_overlay --example toast_confirm

use opal_core::EventBus;
use opal_overlay::{
    confirm_hub, toast_hub, ConfirmHub, ConfirmHubExt, ConfirmOptions, ConfirmRequest, Confirmer,
    MessageRelay, OverlayPhase, Severity, ToastHub, ToastHubExt, ToastMessage, ToastOptions,
};

const FRAME_MS: u64 = 100;

fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "INFO",
        Severity::Success => "OK  ",
        Severity::Warn => "WARN",
        Severity::Error => "ERR ",
    }
}

fn phase_label(phase: OverlayPhase) -> &'static str {
    match phase {
        OverlayPhase::Opening => "entering",
        OverlayPhase::Open => "open",
        OverlayPhase::Closing => "leaving",
        OverlayPhase::Closed => "closed",
    }
}

fn print_state(now_ms: u64, toasts: &ToastHub, dialogs: &ConfirmHub) {
    println!("--- {now_ms:>4} ms ---");
    let visible = toasts.visible();
    if visible.is_empty() {
        println!("  (no toasts)");
    }
    for view in visible {
        println!(
            "  [{}] {} ({})",
            severity_tag(view.message.severity),
            view.message.summary,
            phase_label(view.phase)
        );
    }
    if let Some(dialog) = dialogs.pending() {
        println!(
            "  ? {}: {} [{}] / [{}] ({})",
            dialog.header,
            dialog.message,
            dialog.accept_label,
            dialog.reject_label,
            phase_label(dialog.phase)
        );
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let bus = EventBus::new();

    let toasts = toast_hub(ToastOptions {
        max_visible: 3,
        enter_ms: 100,
        exit_ms: 100,
        ..ToastOptions::default()
    });
    toasts.attach(&bus);

    let dialogs = confirm_hub(ConfirmOptions {
        enter_ms: 100,
        exit_ms: 100,
    });
    dialogs.attach(&bus);

    let relay = MessageRelay::new(&bus);
    relay.add(ToastMessage::info("Upload started").life_ms(600));
    relay.add(
        ToastMessage::warn("Connection is slow")
            .detail("Retrying in the background")
            .life_ms(900),
    );
    relay.add(ToastMessage::info("2 uploads waiting").sticky());

    let accept_relay = MessageRelay::new(&bus);
    Confirmer::new(&bus).confirm(
        ConfirmRequest::new("Clear the finished uploads?")
            .header("Clear uploads")
            .accept_label("Clear")
            .reject_label("Keep")
            .on_accept(move || {
                accept_relay.add(ToastMessage::success("Cleared 2 uploads").life_ms(600));
            }),
    );

    for frame in 0..18u64 {
        let now_ms = frame * FRAME_MS;

        if frame == 5 {
            println!(">>> user accepts the dialog");
            dialogs.accept();
        }
        if frame == 15 {
            println!(">>> clearing remaining toasts");
            relay.clear();
        }

        toasts.update(now_ms);
        dialogs.update(now_ms);

        let toasts_dirty = toasts.take_dirty();
        let dialogs_dirty = dialogs.take_dirty();
        if toasts_dirty || dialogs_dirty {
            print_state(now_ms, &toasts, &dialogs);
        }
    }

    println!("done");
}
