//! # Capture Loop
//!
//! Drives frames through decoding, deduplication and the inventory store.
//!
//! ## Per-Frame Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          CaptureLoop::run                               │
//! │                                                                         │
//! │  ┌──────────────┐                                                       │
//! │  │ stop signal? │── yes ──► Stopped(Operator)                           │
//! │  └──────┬───────┘                                                       │
//! │         │ no                                                            │
//! │         ▼                                                               │
//! │  ┌──────────────┐  Err  ──► Stopped(DeviceError)                        │
//! │  │ next_frame() │  None ──► Stopped(EndOfStream)                        │
//! │  └──────┬───────┘                                                       │
//! │         │ frame                                                         │
//! │         ▼                                                               │
//! │  ┌──────────────┐     for each distinct code, in decode order:          │
//! │  │   decode()   │──►  session.mark_if_new? ── no ──► skip               │
//! │  └──────────────┘            │ yes                                      │
//! │                              ▼                                          │
//! │                       store.upsert ──► store.persist ──► ScanEvent      │
//! │                                                                         │
//! │  Stopped: release source ──► final persist if anything is unsaved      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop is single-threaded and synchronous: acquisition, decoding,
//! mutation and persistence all happen on the calling thread, so every
//! code is on disk (or reported as not) before the next frame is read.

use std::fmt;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use stockscan_core::{InventoryRecord, ScanSession, StockChange};
use stockscan_store::InventoryStore;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::decode::{distinct_codes, FrameDecoder};
use crate::error::CaptureError;
use crate::frame::Frame;
use crate::source::FrameSource;
use crate::stop::StopSignal;

// =============================================================================
// State
// =============================================================================

/// Whether the loop is acquiring frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Why a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The stop signal was triggered.
    Operator,
    /// The source ran out of frames.
    EndOfStream,
    /// The capture device failed.
    DeviceError(CaptureError),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Operator => write!(f, "stopped by operator"),
            StopReason::EndOfStream => write!(f, "end of stream"),
            StopReason::DeviceError(e) => write!(f, "device error: {e}"),
        }
    }
}

// =============================================================================
// Events
// =============================================================================

/// What happened to one newly seen code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEventKind {
    /// New record created and saved.
    Added(InventoryRecord),

    /// Stock incremented and saved.
    Restocked(InventoryRecord),

    /// The store was updated in memory but saving failed. The change is
    /// kept and written by the next successful save.
    PersistFailed {
        change: StockChange,
        record: InventoryRecord,
        error: String,
    },

    /// The store refused the code (invalid payload, stock overflow).
    Rejected { reason: String },
}

/// Feedback for one newly seen code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent {
    /// Sequence number of the frame the code was first seen in.
    pub frame: u64,
    pub code: String,
    pub kind: ScanEventKind,
    pub at: DateTime<Utc>,
}

impl ScanEvent {
    fn new(frame: &Frame, code: String, kind: ScanEventKind) -> Self {
        ScanEvent {
            frame: frame.sequence,
            code,
            kind,
            at: Utc::now(),
        }
    }

    /// The record after the change, if the store accepted the code.
    pub fn record(&self) -> Option<&InventoryRecord> {
        match &self.kind {
            ScanEventKind::Added(record)
            | ScanEventKind::Restocked(record)
            | ScanEventKind::PersistFailed { record, .. } => Some(record),
            ScanEventKind::Rejected { .. } => None,
        }
    }
}

/// Receives loop feedback as it happens.
pub trait ScanObserver {
    fn on_event(&mut self, event: &ScanEvent);

    /// Called once after the loop has stopped and cleaned up.
    fn on_stop(&mut self, _report: &CaptureReport) {}
}

impl<F: FnMut(&ScanEvent)> ScanObserver for F {
    fn on_event(&mut self, event: &ScanEvent) {
        self(event)
    }
}

// =============================================================================
// Report
// =============================================================================

/// Summary of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    pub session_id: Uuid,
    pub stop_reason: StopReason,
    pub frames: u64,
    /// Payloads returned by the decoder, repeats included.
    pub codes_decoded: u64,
    /// Codes seen for the first time this session.
    pub new_codes: u64,
    pub added: u64,
    pub restocked: u64,
    pub rejected: u64,
    pub persist_failures: u64,
    /// The save attempted after stopping failed.
    pub final_persist_failed: bool,
    /// Changes that never reached the file.
    pub unsaved_changes: bool,
}

impl CaptureReport {
    fn new(session_id: Uuid) -> Self {
        CaptureReport {
            session_id,
            stop_reason: StopReason::EndOfStream,
            frames: 0,
            codes_decoded: 0,
            new_codes: 0,
            added: 0,
            restocked: 0,
            rejected: 0,
            persist_failures: 0,
            final_persist_failed: false,
            unsaved_changes: false,
        }
    }

    /// No device failure and nothing left unsaved.
    pub fn is_clean(&self) -> bool {
        !matches!(self.stop_reason, StopReason::DeviceError(_)) && !self.unsaved_changes
    }
}

// =============================================================================
// Capture Loop
// =============================================================================

/// The scan-to-inventory loop.
///
/// ## Example
/// ```rust,no_run
/// use stockscan_scanner::{CaptureLoop, ImageSequenceSource, RxingDecoder, StopSignal};
/// use stockscan_store::{InventoryStore, StoreConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = InventoryStore::open(StoreConfig::new("inventory.csv"))?;
/// let source = ImageSequenceSource::from_dir("photos".as_ref())?;
///
/// let mut capture = CaptureLoop::new(source, RxingDecoder::new(), StopSignal::new());
/// let report = capture.run(&mut store, &mut |event: &stockscan_scanner::ScanEvent| {
///     println!("{} {:?}", event.code, event.kind);
/// });
/// println!("{} new codes, {}", report.new_codes, report.stop_reason);
/// # Ok(())
/// # }
/// ```
pub struct CaptureLoop<S, D> {
    source: S,
    decoder: D,
    stop: StopSignal,
    state: LoopState,
    frame_interval: Option<Duration>,
}

impl<S: FrameSource, D: FrameDecoder> CaptureLoop<S, D> {
    pub fn new(source: S, decoder: D, stop: StopSignal) -> Self {
        CaptureLoop {
            source,
            decoder,
            stop,
            state: LoopState::Stopped,
            frame_interval: None,
        }
    }

    /// Pauses after every frame. Useful to limit CPU on fast cameras.
    pub fn with_frame_interval(mut self, interval: Option<Duration>) -> Self {
        self.frame_interval = interval;
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    /// Runs until the stop signal, end of stream or a device error.
    ///
    /// Each run is a fresh scan session: a code seen in an earlier run
    /// counts again.
    pub fn run<O>(&mut self, store: &mut InventoryStore, observer: &mut O) -> CaptureReport
    where
        O: ScanObserver + ?Sized,
    {
        let session = ScanSession::new();
        let mut report = CaptureReport::new(session.id());

        self.state = LoopState::Running;
        info!(
            session = %session.id(),
            source = %self.source.describe(),
            inventory = %store.path().display(),
            "Capture started"
        );

        let reason = self.acquire(store, session, &mut report, &mut *observer);
        self.shutdown(store, reason, &mut report);

        observer.on_stop(&report);
        report
    }

    fn acquire<O>(
        &mut self,
        store: &mut InventoryStore,
        mut session: ScanSession,
        report: &mut CaptureReport,
        observer: &mut O,
    ) -> StopReason
    where
        O: ScanObserver + ?Sized,
    {
        loop {
            if self.stop.is_triggered() {
                return StopReason::Operator;
            }

            let frame = match self.source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => return StopReason::EndOfStream,
                Err(e) => {
                    error!(error = %e, "Capture device failed");
                    return StopReason::DeviceError(e);
                }
            };
            report.frames += 1;

            let decoded = self.decoder.decode(&frame);
            report.codes_decoded += decoded.len() as u64;
            if !decoded.is_empty() {
                debug!(sequence = frame.sequence, codes = decoded.len(), "Frame decoded");
            }

            for code in distinct_codes(&decoded) {
                if !session.mark_if_new(&code) {
                    continue;
                }
                report.new_codes += 1;

                let event = process_code(store, &frame, code, report);
                observer.on_event(&event);
            }

            if let Some(interval) = self.frame_interval {
                thread::sleep(interval);
            }
        }
    }

    fn shutdown(&mut self, store: &mut InventoryStore, reason: StopReason, report: &mut CaptureReport) {
        self.state = LoopState::Stopped;
        self.source.release();

        if store.has_unsaved_changes() {
            info!("Saving changes left over from failed saves");
            if let Err(e) = store.persist() {
                error!(error = %e, "Final save failed, changes are lost on exit");
                report.final_persist_failed = true;
            }
        }

        report.unsaved_changes = store.has_unsaved_changes();
        report.stop_reason = reason;

        info!(
            session = %report.session_id,
            reason = %report.stop_reason,
            frames = report.frames,
            new_codes = report.new_codes,
            added = report.added,
            restocked = report.restocked,
            persist_failures = report.persist_failures,
            "Capture stopped"
        );
    }
}

/// Upserts and persists one newly seen code.
fn process_code(
    store: &mut InventoryStore,
    frame: &Frame,
    code: String,
    report: &mut CaptureReport,
) -> ScanEvent {
    let outcome = match store.upsert(&code) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(code = %code, error = %e, "Code rejected");
            report.rejected += 1;
            let kind = ScanEventKind::Rejected {
                reason: e.to_string(),
            };
            return ScanEvent::new(frame, code, kind);
        }
    };

    let change = outcome.kind();
    match change {
        StockChange::Added => report.added += 1,
        StockChange::Restocked => report.restocked += 1,
    }

    let kind = match store.persist() {
        Ok(()) => {
            info!(code = %code, stock = outcome.record.stock, "{}", change);
            match change {
                StockChange::Added => ScanEventKind::Added(outcome.record),
                StockChange::Restocked => ScanEventKind::Restocked(outcome.record),
            }
        }
        Err(e) => {
            report.persist_failures += 1;
            ScanEventKind::PersistFailed {
                change,
                record: outcome.record,
                error: e.to_string(),
            }
        }
    };

    ScanEvent::new(frame, code, kind)
}

// =============================================================================
// Unit Tests
// =============================================================================
