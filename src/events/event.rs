//! # Engine events emitted by sections and claimants.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Section events**: state transitions of a section (opened, slot freed, removed)
//! - **Waitlist events**: registry mutations (registered, released)
//! - **Batch events**: one notification batch and what happened inside it
//!
//! The [`Event`] struct carries additional metadata such as timestamps,
//! section/claimant ids, section label and reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use enrollvisor::{ClaimantId, Event, EventKind, SectionId};
//!
//! let ev = Event::new(EventKind::AdmissionDenied)
//!     .with_section(SectionId::new(1))
//!     .with_claimant(ClaimantId::new(7))
//!     .with_reason("capacity_exceeded");
//!
//! assert_eq!(ev.kind, EventKind::AdmissionDenied);
//! assert_eq!(ev.claimant, Some(ClaimantId::new(7)));
//! assert_eq!(ev.reason.as_deref(), Some("capacity_exceeded"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::ids::{ClaimantId, SectionId};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of engine events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Section events ===
    /// Section transitioned to (or re-announced) `Open`.
    ///
    /// Sets: `section`, `label`
    SectionOpened,

    /// A seat was vacated.
    ///
    /// Sets: `section`, `claimant` (who left)
    SlotFreed,

    /// Section was destroyed; its waitlist was bulk-released.
    ///
    /// Sets: `section`, `count` (waitlist entries released)
    SectionRemoved,

    /// Claimant was destroyed; all its cross-references were released.
    ///
    /// Sets: `claimant`
    ClaimantRemoved,

    // === Waitlist events ===
    /// Claimant appended to a section waitlist.
    ///
    /// Sets: `section`, `claimant`, `count` (waitlist length afterwards)
    ClaimantRegistered,

    /// Claimant removed from a section waitlist.
    ///
    /// Sets: `section`, `claimant`, `count` (waitlist length afterwards)
    ClaimantReleased,

    // === Batch events ===
    /// A notification batch begins.
    ///
    /// Sets: `section`, `count` (subscribers visited by this batch)
    NotifyStarted,

    /// A subscriber's reactive operation was invoked.
    ///
    /// Sets: `section`, `claimant`
    ClaimantNotified,

    /// A seat was granted.
    ///
    /// Sets: `section`, `claimant`
    AdmissionGranted,

    /// A seat was refused.
    ///
    /// Sets: `section`, `claimant`, `reason` (error label)
    AdmissionDenied,

    /// A subscriber broke its contract during a batch (logged and skipped).
    ///
    /// Sets: `section`, `claimant`, `reason` (error label)
    NotifyFault,

    /// A notification batch finished.
    ///
    /// Sets: `section`, `count` (claims made during the batch)
    NotifyFinished,
}

/// Engine event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Section involved, if any.
    pub section: Option<SectionId>,
    /// Claimant involved, if any.
    pub claimant: Option<ClaimantId>,
    /// Section display label (opaque).
    pub label: Option<Arc<str>>,
    /// Human-readable reason (error labels, etc.).
    pub reason: Option<Arc<str>>,
    /// Kind-specific counter (waitlist length, batch size, claims).
    pub count: Option<usize>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            section: None,
            claimant: None,
            label: None,
            reason: None,
            count: None,
        }
    }

    #[inline]
    pub fn with_section(mut self, section: SectionId) -> Self {
        self.section = Some(section);
        self
    }

    #[inline]
    pub fn with_claimant(mut self, claimant: ClaimantId) -> Self {
        self.claimant = Some(claimant);
        self
    }

    #[inline]
    pub fn with_label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[inline]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Returns `true` for events emitted inside a notification batch.
    #[inline]
    pub fn is_batch_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::NotifyStarted
                | EventKind::ClaimantNotified
                | EventKind::NotifyFault
                | EventKind::NotifyFinished
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::SectionOpened);
        let b = Event::new(EventKind::SectionOpened);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn batch_classification() {
        assert!(Event::new(EventKind::ClaimantNotified).is_batch_event());
        assert!(!Event::new(EventKind::AdmissionGranted).is_batch_event());
    }
}
