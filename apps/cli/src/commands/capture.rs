//! # Capture Commands
//!
//! `scan` and `replay` both run the capture loop; they differ only in
//! where frames come from.
//!
//! ```text
//! stockscan scan   ──► open_camera(index) ──┐
//!                                           ├──► CaptureLoop::run ──► ConsoleFeedback
//! stockscan replay ──► ImageSequenceSource ─┘
//! ```

use std::io::{self, BufReader};
use std::path::Path;

use anyhow::{bail, Context, Result};
use stockscan_scanner::{
    open_camera, CaptureLoop, CaptureReport, FrameSource, ImageSequenceSource, RxingDecoder,
    ScanEvent, ScanEventKind, ScanObserver, ScannerConfig, StopReason, StopSignal,
};
use stockscan_store::InventoryStore;
use tracing::info;

use super::open_store;

/// Live camera capture until Ctrl+C or `q`.
pub fn scan(config: &ScannerConfig, camera: Option<u32>) -> Result<()> {
    let index = camera.unwrap_or(config.capture.camera_index);
    let mut store = open_store(config)?;

    let source = open_camera(index).context("Cannot start live capture")?;

    let stop = StopSignal::new();
    stop.install_ctrlc()?;
    stop.watch_for_quit(BufReader::new(io::stdin()));

    println!("Scanning with camera {index}. Press 'q' then Enter (or Ctrl+C) to quit.");
    run_capture(&mut store, source, stop, config)
}

/// Capture over a directory of photos.
pub fn replay(config: &ScannerConfig, dir: &Path) -> Result<()> {
    let mut store = open_store(config)?;
    let source = ImageSequenceSource::from_dir(dir)?;

    let stop = StopSignal::new();
    stop.install_ctrlc()?;

    info!(dir = %dir.display(), frames = source.remaining(), "Replaying images");
    run_capture(&mut store, source, stop, config)
}

fn run_capture<S: FrameSource>(
    store: &mut InventoryStore,
    source: S,
    stop: StopSignal,
    config: &ScannerConfig,
) -> Result<()> {
    let mut capture = CaptureLoop::new(source, RxingDecoder::new(), stop)
        .with_frame_interval(config.frame_interval());

    let report = capture.run(store, &mut ConsoleFeedback);
    check_report(&report, store)
}

/// Turns an unclean stop into a non-zero exit.
fn check_report(report: &CaptureReport, store: &InventoryStore) -> Result<()> {
    if let StopReason::DeviceError(e) = &report.stop_reason {
        bail!("Capture device failed: {e}");
    }
    if report.unsaved_changes {
        bail!(
            "Changes could not be saved to {}; the inventory file is out of date",
            store.path().display()
        );
    }
    Ok(())
}

// =============================================================================
// Console Feedback
// =============================================================================

/// Prints one line per newly seen code and a summary at the end.
struct ConsoleFeedback;

impl ScanObserver for ConsoleFeedback {
    fn on_event(&mut self, event: &ScanEvent) {
        match &event.kind {
            ScanEventKind::PersistFailed { .. } | ScanEventKind::Rejected { .. } => {
                eprintln!("{}", describe_event(event))
            }
            _ => println!("{}", describe_event(event)),
        }
    }

    fn on_stop(&mut self, report: &CaptureReport) {
        println!("{}", summarize(report));
    }
}

fn describe_event(event: &ScanEvent) -> String {
    match &event.kind {
        ScanEventKind::Added(record) => format!(
            "Added new product for barcode {} ({}, {})",
            event.code, record.name, record.price
        ),
        ScanEventKind::Restocked(record) => format!(
            "Updated stock for barcode {} (now {})",
            event.code, record.stock
        ),
        ScanEventKind::PersistFailed { change, error, .. } => format!(
            "Barcode {} {} but NOT saved: {}",
            event.code, change, error
        ),
        ScanEventKind::Rejected { reason } => {
            format!("Ignored barcode {:?}: {}", event.code, reason)
        }
    }
}

fn summarize(report: &CaptureReport) -> String {
    let mut summary = format!(
        "{}: {} frame(s), {} new code(s), {} added, {} restocked",
        report.stop_reason, report.frames, report.new_codes, report.added, report.restocked
    );
    if report.persist_failures > 0 {
        summary.push_str(&format!(", {} save failure(s)", report.persist_failures));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockscan_core::{InventoryRecord, Money, StockChange};
    use stockscan_scanner::CaptureError;
    use stockscan_store::StoreConfig;

    fn event(kind: ScanEventKind) -> ScanEvent {
        ScanEvent {
            frame: 1,
            code: "123".into(),
            kind,
            at: Default::default(),
        }
    }

    fn record(stock: u64) -> InventoryRecord {
        InventoryRecord::new("123", "Product_123", Money::from_cents(999), stock)
    }

    #[test]
    fn test_describe_event() {
        let added = event(ScanEventKind::Added(record(1)));
        assert_eq!(
            describe_event(&added),
            "Added new product for barcode 123 (Product_123, $9.99)"
        );

        let restocked = event(ScanEventKind::Restocked(record(4)));
        assert_eq!(describe_event(&restocked), "Updated stock for barcode 123 (now 4)");

        let failed = event(ScanEventKind::PersistFailed {
            change: StockChange::Restocked,
            record: record(4),
            error: "disk full".into(),
        });
        assert_eq!(
            describe_event(&failed),
            "Barcode 123 restocked but NOT saved: disk full"
        );
    }

    #[test]
    fn test_check_report_flags_unsaved_and_device_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = InventoryStore::open(StoreConfig::new(dir.path().join("inventory.csv"))).unwrap();

        let mut report = CaptureReport {
            session_id: Default::default(),
            stop_reason: StopReason::EndOfStream,
            frames: 3,
            codes_decoded: 2,
            new_codes: 1,
            added: 1,
            restocked: 0,
            rejected: 0,
            persist_failures: 0,
            final_persist_failed: false,
            unsaved_changes: false,
        };
        assert!(check_report(&report, &store).is_ok());
        assert_eq!(
            summarize(&report),
            "end of stream: 3 frame(s), 1 new code(s), 1 added, 0 restocked"
        );

        report.unsaved_changes = true;
        assert!(check_report(&report, &store).is_err());

        report.unsaved_changes = false;
        report.stop_reason = StopReason::DeviceError(CaptureError::NotCompiled);
        assert!(check_report(&report, &store).is_err());
    }
}
