//! # Claimant: a waitlist subscriber that tries to take a seat when notified.
//!
//! ## Lifecycle
//! ```text
//! join_or_wait(section)
//!   ├─ Open && seat free ─► claimed += section              ─► Admitted
//!   ├─ already pending   ─► no new position                 ─► Waitlisted
//!   └─ otherwise         ─► pending = section, register     ─► Waitlisted
//!
//! on_notify(notice)                       (inside a notification batch)
//!   ├─ pending == None            ─► Err(NotWaitlisted)
//!   ├─ pending != notice.section  ─► Err(WrongPublisher)
//!   ├─ Closed or seats full       ─► StillWaiting (state unchanged)
//!   └─ seat taken                 ─► claimed += section, pending = None,
//!                                    notice.release(self) ─► Claimed
//! ```
//!
//! ## Invariants
//! - `pending` is set iff the claimant holds a position in that section's waitlist.
//! - A claimant waits on at most one section at a time.

use std::sync::Arc;

use indexmap::IndexSet;
use tracing::debug;

use crate::core::RegistrationPolicy;
use crate::error::EngineError;
use crate::events::{Bus, Event, EventKind};
use crate::ids::{ClaimantId, SectionId};
use crate::registry::{Outcome, Reactive};
use crate::section::{Notice, Section, SectionState};

/// Result of [`Enrollment::join_or_wait`](crate::Enrollment::join_or_wait).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    /// A seat was taken immediately.
    Admitted,
    /// The section was closed or full; the claimant is on its waitlist.
    Waitlisted,
}

/// A subscriber that claims seats.
#[derive(Debug)]
pub struct Claimant {
    id: ClaimantId,
    name: Arc<str>,
    pending: Option<SectionId>,
    claimed: IndexSet<SectionId>,
    last_outcome: Outcome,
}

impl Claimant {
    pub(crate) fn new(id: ClaimantId, name: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            name: name.into(),
            pending: None,
            claimed: IndexSet::new(),
            last_outcome: Outcome::Idle,
        }
    }

    #[inline]
    pub fn id(&self) -> ClaimantId {
        self.id
    }

    /// Display name (opaque to the engine).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Section this claimant is waiting on, if any.
    #[inline]
    pub fn pending(&self) -> Option<SectionId> {
        self.pending
    }

    /// Sections currently occupied, in admission order.
    pub fn claimed(&self) -> Vec<SectionId> {
        self.claimed.iter().copied().collect()
    }

    #[inline]
    pub fn holds(&self, section: SectionId) -> bool {
        self.claimed.contains(&section)
    }

    #[inline]
    pub fn last_outcome(&self) -> Outcome {
        self.last_outcome
    }

    pub(crate) fn join_or_wait(
        &mut self,
        section: &mut Section,
        policy: RegistrationPolicy,
        bus: &Bus,
    ) -> Result<JoinOutcome, EngineError> {
        let sid = section.id();
        if self.claimed.contains(&sid) {
            return Err(EngineError::AlreadyAdmitted {
                section: sid,
                claimant: self.id,
            });
        }
        if let Some(pending) = self.pending.filter(|p| *p != sid) {
            return Err(EngineError::AlreadyWaitlisted {
                claimant: self.id,
                pending,
            });
        }

        if section.is_open() {
            match section.try_admit(self.id) {
                Ok(()) => {
                    bus.publish(
                        Event::new(EventKind::AdmissionGranted)
                            .with_section(sid)
                            .with_claimant(self.id),
                    );
                    self.record_claim(sid);
                    if section.purge(self.id) > 0 {
                        bus.publish(
                            Event::new(EventKind::ClaimantReleased)
                                .with_section(sid)
                                .with_claimant(self.id)
                                .with_count(section.count()),
                        );
                    }
                    return Ok(JoinOutcome::Admitted);
                }
                Err(err) => {
                    bus.publish(
                        Event::new(EventKind::AdmissionDenied)
                            .with_section(sid)
                            .with_claimant(self.id)
                            .with_reason(err.as_label()),
                    );
                }
            }
        }

        // Already queued here: keep the single position.
        if self.pending == Some(sid) && policy == RegistrationPolicy::AllowDuplicates {
            return Ok(JoinOutcome::Waitlisted);
        }

        section.register(self.id, policy)?;
        self.pending = Some(sid);
        debug!(claimant = %self.id, section = %sid, position = section.count(), "waitlisted");
        bus.publish(
            Event::new(EventKind::ClaimantRegistered)
                .with_section(sid)
                .with_claimant(self.id)
                .with_count(section.count()),
        );
        Ok(JoinOutcome::Waitlisted)
    }

    /// Seat obtained in `section`; clears a pending reference to it.
    pub(crate) fn record_claim(&mut self, section: SectionId) {
        self.claimed.insert(section);
        if self.pending == Some(section) {
            self.pending = None;
        }
        self.last_outcome = Outcome::Claimed;
    }

    /// Seat in `section` given up.
    pub(crate) fn forget_claim(&mut self, section: SectionId) -> bool {
        self.claimed.shift_remove(&section)
    }

    /// Waitlist position in `section` dropped from the publisher side.
    pub(crate) fn forget_pending(&mut self, section: SectionId) {
        if self.pending == Some(section) {
            self.pending = None;
        }
    }
}

impl<'a> Reactive<Notice<'a>> for Claimant {
    fn on_notify(&mut self, notice: &mut Notice<'a>) -> Result<Outcome, EngineError> {
        let Some(pending) = self.pending else {
            return Err(EngineError::NotWaitlisted { claimant: self.id });
        };
        if pending != notice.section() {
            return Err(EngineError::WrongPublisher {
                claimant: self.id,
                pending,
                notified_by: notice.section(),
            });
        }

        if !matches!(notice.state(), SectionState::Open) {
            self.last_outcome = Outcome::StillWaiting;
            return Ok(self.last_outcome);
        }

        match notice.try_admit(self.id) {
            Ok(()) => {
                self.claimed.insert(pending);
                self.last_outcome = Outcome::Claimed;
                self.pending = None;
                notice.release(self.id)?;
                debug!(claimant = %self.id, section = %pending, "claimed on notification");
                Ok(Outcome::Claimed)
            }
            Err(EngineError::CapacityExceeded { .. }) => {
                self.last_outcome = Outcome::StillWaiting;
                Ok(Outcome::StillWaiting)
            }
            Err(err) => Err(err),
        }
    }

    fn outcome(&self) -> Outcome {
        self.last_outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(capacity: usize) -> (Claimant, Section, Bus) {
        (
            Claimant::new(ClaimantId::new(1), "ada"),
            Section::new(SectionId::new(10), "MATH-200", capacity),
            Bus::new(16),
        )
    }

    #[test]
    fn closed_section_waitlists() {
        let (mut c, mut s, bus) = fixture(5);
        let out = c
            .join_or_wait(&mut s, RegistrationPolicy::AllowDuplicates, &bus)
            .unwrap();
        assert_eq!(out, JoinOutcome::Waitlisted);
        assert_eq!(c.pending(), Some(s.id()));
        assert_eq!(s.waitlist(), vec![c.id()]);
    }

    #[test]
    fn open_section_with_room_admits() {
        let (mut c, mut s, bus) = fixture(1);
        s.mark_open();
        let out = c
            .join_or_wait(&mut s, RegistrationPolicy::AllowDuplicates, &bus)
            .unwrap();
        assert_eq!(out, JoinOutcome::Admitted);
        assert!(c.holds(s.id()));
        assert_eq!(c.pending(), None);
        assert_eq!(s.occupant_list(), vec![c.id()]);
        assert_eq!(s.count(), 0);
    }

    #[test]
    fn rejoining_the_same_waitlist_keeps_one_position() {
        let (mut c, mut s, bus) = fixture(1);
        for _ in 0..2 {
            let out = c
                .join_or_wait(&mut s, RegistrationPolicy::AllowDuplicates, &bus)
                .unwrap();
            assert_eq!(out, JoinOutcome::Waitlisted);
        }
        assert_eq!(s.waitlist(), vec![c.id()]);
        assert_eq!(c.pending(), Some(s.id()));
    }

    #[test]
    fn waiting_elsewhere_is_refused() {
        let (mut c, mut s, bus) = fixture(1);
        let mut other = Section::new(SectionId::new(11), "BIO-1", 1);
        c.join_or_wait(&mut s, RegistrationPolicy::AllowDuplicates, &bus)
            .unwrap();
        let err = c
            .join_or_wait(&mut other, RegistrationPolicy::AllowDuplicates, &bus)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::AlreadyWaitlisted {
                claimant: c.id(),
                pending: s.id()
            }
        );
        assert_eq!(other.count(), 0);
    }

    #[test]
    fn notify_without_pending_is_a_contract_violation() {
        let (mut c, mut s, bus) = fixture(1);
        s.mark_open();
        let id = s.id();
        let label = s.label_arc();
        let who = c.id();
        let (state, seats, waitlist) = s.batch_parts();
        let mut notice = Notice::new(id, label, state, who, seats, waitlist, &bus);
        let err = c.on_notify(&mut notice).unwrap_err();
        assert_eq!(err, EngineError::NotWaitlisted { claimant: who });
        assert_eq!(c.outcome(), Outcome::Idle);
    }

    #[test]
    fn notify_from_other_section_is_rejected() {
        let (mut c, mut s, bus) = fixture(1);
        c.join_or_wait(&mut s, RegistrationPolicy::AllowDuplicates, &bus)
            .unwrap();

        let mut other = Section::new(SectionId::new(99), "ART-9", 1);
        other.mark_open();
        let id = other.id();
        let label = other.label_arc();
        let (state, seats, waitlist) = other.batch_parts();
        assert_eq!(state, SectionState::Open);
        let mut notice = Notice::new(id, label, state, c.id(), seats, waitlist, &bus);
        assert!(matches!(
            c.on_notify(&mut notice),
            Err(EngineError::WrongPublisher { .. })
        ));
        assert_eq!(c.pending(), Some(s.id()));
    }
}
