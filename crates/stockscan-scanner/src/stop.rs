//! # Operator Stop Signal
//!
//! A shared flag the capture loop polls once per frame.
//!
//! ```text
//! Ctrl+C handler ──┐
//!                  ├──► StopSignal::trigger() ──► loop sees it before the next frame
//! stdin "q" ───────┘
//! ```

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use crate::error::ScanResult;

/// Cloneable stop flag. All clones share one state.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    flag: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        StopSignal::default()
    }

    /// Requests the capture loop to stop. Idempotent.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Triggers this signal on Ctrl+C. Can be installed once per process.
    pub fn install_ctrlc(&self) -> ScanResult<()> {
        let signal = self.clone();
        ctrlc::set_handler(move || {
            info!("Interrupt received, stopping after the current frame");
            signal.trigger();
        })?;
        Ok(())
    }

    /// Watches `input` on a background thread and triggers on a line reading
    /// `q` or `quit` (any case). End of input ends the watch without
    /// triggering.
    pub fn watch_for_quit<R>(&self, input: R) -> JoinHandle<()>
    where
        R: BufRead + Send + 'static,
    {
        let signal = self.clone();
        thread::spawn(move || {
            for line in input.lines() {
                let Ok(line) = line else { break };
                if is_quit_command(&line) {
                    debug!("Quit requested on stdin");
                    signal.trigger();
                    break;
                }
            }
        })
    }
}

fn is_quit_command(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "q" | "quit")
}
