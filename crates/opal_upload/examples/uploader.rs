//! Uploader Demo - Selection, validation, and a simulated transport
//!
//! This example demonstrates:
//! - Policy validation: accept rules, a size cap, duplicate rejection
//! - The upload phase machine from selection through failure and retry
//! - Forwarding upload events to a toast relay
//!
//! Run with: cargo run -p opal_upload --example uploader

use opal_core::EventBus;
use opal_overlay::{toast_hub, MessageRelay, ToastHub, ToastHubExt, ToastMessage, ToastOptions};
use opal_upload::{
    format_size, AcceptSpec, FileMeta, MemoryTransport, TransportSignal, UploadController,
    UploadEvent, UploadPolicy, UploadTransport,
};

fn forward(relay: &MessageRelay, event: UploadEvent) {
    match event {
        UploadEvent::Selected { count } => {
            relay.add(ToastMessage::info(format!("{count} file(s) selected")));
        }
        UploadEvent::Rejected { errors } => {
            for error in errors {
                relay.add(ToastMessage::warn(error.to_string()));
            }
        }
        UploadEvent::Progress { percent } => println!("  progress: {percent}%"),
        UploadEvent::Completed { count } => {
            relay.add(ToastMessage::success(format!("Uploaded {count} file(s)")));
        }
        UploadEvent::Failed { reason } => {
            relay.add(ToastMessage::error(format!("Upload failed: {reason}")));
        }
        UploadEvent::Cleared => {
            relay.add(ToastMessage::info("Selection cleared"));
        }
        UploadEvent::Removed { file } => {
            relay.add(ToastMessage::info(format!("Removed {}", file.name)));
        }
    }
}

fn drain(transport: &mut MemoryTransport, controller: &mut UploadController, relay: &MessageRelay) {
    while let Some(signal) = transport.poll() {
        if let Some(event) = controller.transport_event(signal) {
            forward(relay, event);
        }
    }
}

fn render_toasts(toasts: &ToastHub, now_ms: &mut u64) {
    *now_ms += 100;
    toasts.update(*now_ms);
    if !toasts.take_dirty() {
        return;
    }
    println!("  toasts:");
    for view in toasts.visible() {
        println!("    [{}] {}", view.message.severity, view.message.summary);
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
        max_visible: 8,
        enter_ms: 0,
        exit_ms: 0,
        ..ToastOptions::default()
    });
    toasts.attach(&bus);
    let relay = MessageRelay::new(&bus);

    let mut controller = UploadController::new(UploadPolicy {
        accept: AcceptSpec::parse("image/*, .pdf"),
        max_file_size: Some(5 * 1024 * 1024),
        multiple: true,
        reject_duplicates: true,
        ..UploadPolicy::default()
    });
    let mut transport = MemoryTransport::new();
    let mut now_ms = 0u64;

    println!("== selecting files ==");
    let selection = controller.select([
        FileMeta::new("holiday.png", 2 * 1024 * 1024, "image/png"),
        FileMeta::new("invoice.pdf", 100 * 1024, "application/pdf"),
        FileMeta::new("receipt.pdf", 40 * 1024, "application/pdf"),
        FileMeta::new("raw_scan.png", 9 * 1024 * 1024, "image/png"),
        FileMeta::new("setup.exe", 1024 * 1024, "application/octet-stream"),
        FileMeta::new("holiday.png", 2 * 1024 * 1024, "image/png"),
    ]);
    for event in selection.events() {
        forward(&relay, event);
    }
    for file in controller.pending() {
        println!("  pending: {} ({})", file.name, format_size(file.size));
    }
    println!("  total: {}", format_size(controller.pending_size()));
    render_toasts(&toasts, &mut now_ms);

    println!("== removing receipt.pdf ==");
    match controller.remove(2) {
        Ok(event) => forward(&relay, event),
        Err(error) => println!("  remove refused: {error}"),
    }
    render_toasts(&toasts, &mut now_ms);

    println!("== first attempt ==");
    let batch = controller.begin().expect("two files are pending");
    let total = batch.total_size();
    println!(
        "  batch {} with {} files ({})",
        batch.id,
        batch.files.len(),
        format_size(total)
    );
    transport.begin(batch).unwrap();
    transport.push_signal(TransportSignal::Progress {
        sent: total / 4,
        total,
    });
    transport.push_signal(TransportSignal::Failed("connection reset".to_string()));
    drain(&mut transport, &mut controller, &relay);
    println!("  phase: {:?}", controller.phase());
    render_toasts(&toasts, &mut now_ms);

    println!("== retrying ==");
    let batch = controller.begin().expect("failed batch files are pending again");
    transport.begin(batch).unwrap();
    transport.push_signal(TransportSignal::Progress {
        sent: total / 2,
        total,
    });
    transport.push_signal(TransportSignal::Progress { sent: total, total });
    transport.push_signal(TransportSignal::Completed);
    drain(&mut transport, &mut controller, &relay);
    render_toasts(&toasts, &mut now_ms);

    println!("== done ==");
    println!("  phase: {:?}", controller.phase());
    for file in controller.uploaded() {
        println!("  uploaded: {} ({})", file.name, format_size(file.size));
    }
}
