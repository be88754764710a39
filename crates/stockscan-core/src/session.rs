//! # Scan Session
//!
//! Deduplication scope for one continuous capture run.
//!
//! ## Why Deduplicate?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  One physical barcode, held in view, shows up in many frames:          │
//! │                                                                         │
//! │  frame 1: [123]   frame 2: [123]   frame 3: [123, 456]   frame 4: []   │
//! │     │                 │                 │      │                        │
//! │     ▼                 ▼                 ▼      ▼                        │
//! │  mark_if_new      mark_if_new       mark_if_new mark_if_new             │
//! │   → true            → false          → false    → true                  │
//! │   (count it)        (ignore)         (ignore)   (count it)              │
//! │                                                                         │
//! │  Result: 123 counted once, 456 counted once.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no cross-session memory: restarting the capture loop starts a
//! new session, and a code scanned again after a restart counts again.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use uuid::Uuid;

/// Codes already processed during the current capture run.
#[derive(Debug, Clone)]
pub struct ScanSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    seen: HashSet<String>,
}

impl ScanSession {
    /// Starts an empty session.
    pub fn new() -> Self {
        ScanSession {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            seen: HashSet::new(),
        }
    }

    /// Records `code` and returns true the first time it is seen in this
    /// session; returns false on every later call with the same code.
    pub fn mark_if_new(&mut self, code: &str) -> bool {
        if self.seen.contains(code) {
            return false;
        }
        self.seen.insert(code.to_string())
    }

    /// Forgets every code and starts over under a new session id.
    pub fn reset(&mut self) {
        *self = ScanSession::new();
    }

    /// Whether `code` has already been processed this session.
    pub fn contains(&self, code: &str) -> bool {
        self.seen.contains(code)
    }

    /// Number of distinct codes processed so far.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// True if nothing has been processed yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Session identifier, for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// When the session started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Codes processed so far, in no particular order.
    pub fn seen(&self) -> impl Iterator<Item = &str> {
        self.seen.iter().map(String::as_str)
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        ScanSession::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = ScanSession::new();
        assert!(session.is_empty());
        assert_eq!(session.len(), 0);
        assert!(!session.contains("123"));
    }

    #[test]
    fn test_mark_if_new_true_exactly_once() {
        let mut session = ScanSession::new();

        assert!(session.mark_if_new("123"));
        for _ in 0..10 {
            assert!(!session.mark_if_new("123"));
        }
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_distinct_codes_tracked_independently() {
        let mut session = ScanSession::new();
        let codes = ["123", "456", "123", "789", "456", "123"];

        let first_sightings: Vec<&str> = codes
            .iter()
            .copied()
            .filter(|code| session.mark_if_new(code))
            .collect();

        assert_eq!(first_sightings, vec!["123", "456", "789"]);
        assert_eq!(session.len(), 3);

        let mut seen: Vec<&str> = session.seen().collect();
        seen.sort_unstable();
        assert_eq!(seen, vec!["123", "456", "789"]);
    }

    #[test]
    fn test_codes_are_case_sensitive() {
        let mut session = ScanSession::new();
        assert!(session.mark_if_new("abc"));
        assert!(session.mark_if_new("ABC"));
    }

    #[test]
    fn test_reset_forgets_codes_and_changes_id() {
        let mut session = ScanSession::new();
        let first_id = session.id();
        session.mark_if_new("123");

        session.reset();

        assert!(session.is_empty());
        assert_ne!(session.id(), first_id);
        assert!(session.mark_if_new("123"));
    }

    #[test]
    fn test_separate_sessions_do_not_share_state() {
        let mut first = ScanSession::new();
        let mut second = ScanSession::new();

        assert!(first.mark_if_new("123"));
        assert!(second.mark_if_new("123"));
        assert_ne!(first.id(), second.id());
    }
}
