//! # Capacity-bounded section
//!
//! A [`Section`] composes two independent roles:
//! - **resource**: a fixed-capacity [`Seats`] list;
//! - **publisher**: a [`PublisherRegistry`] holding the waitlist.
//!
//! ## State machine
//! ```text
//! Closed ──open()──► Open ──open() / slot freed──► Open (re-announce)
//! ```
//! There is no `Open → Closed` transition.
//!
//! Driving a notification batch needs the claimant arena, so it lives in
//! [`Enrollment`](crate::Enrollment); the section only exposes the pieces.

use std::sync::Arc;

use super::seats::Seats;
use crate::core::RegistrationPolicy;
use crate::error::EngineError;
use crate::ids::{ClaimantId, SectionId};
use crate::registry::{PublicationState, PublisherRegistry};

/// Enrollment state of a section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SectionState {
    #[default]
    Closed,
    Open,
}

/// A finite-capacity resource with a FIFO waitlist.
#[derive(Debug)]
pub struct Section {
    id: SectionId,
    label: Arc<str>,
    state: SectionState,
    seats: Seats,
    waitlist: PublisherRegistry<ClaimantId>,
}

impl Section {
    pub(crate) fn new(id: SectionId, label: impl Into<Arc<str>>, capacity: usize) -> Self {
        Self {
            id,
            label: label.into(),
            state: SectionState::Closed,
            seats: Seats::new(id, capacity),
            waitlist: PublisherRegistry::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> SectionId {
        self.id
    }

    /// Display label (opaque to the engine).
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn label_arc(&self) -> Arc<str> {
        Arc::clone(&self.label)
    }

    #[inline]
    pub fn state(&self) -> SectionState {
        self.state
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        matches!(self.state, SectionState::Open)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.seats.capacity()
    }

    #[inline]
    pub fn available(&self) -> usize {
        self.seats.available()
    }

    /// Waitlist length.
    #[inline]
    pub fn count(&self) -> usize {
        self.waitlist.count()
    }

    /// Read-only snapshot of the occupants, in admission order.
    pub fn occupant_list(&self) -> Vec<ClaimantId> {
        self.seats.occupants()
    }

    /// Read-only snapshot of the waitlist, in registration order.
    pub fn waitlist(&self) -> Vec<ClaimantId> {
        self.waitlist.snapshot()
    }

    #[inline]
    pub fn is_seated(&self, who: ClaimantId) -> bool {
        self.seats.contains(who)
    }

    #[inline]
    pub fn is_waiting(&self, who: ClaimantId) -> bool {
        self.waitlist.contains(who)
    }

    #[inline]
    pub fn publication_state(&self) -> PublicationState {
        self.waitlist.publication_state()
    }

    /// Seats `who` if capacity allows. Does not look at the section state.
    pub fn try_admit(&mut self, who: ClaimantId) -> Result<(), EngineError> {
        self.seats.try_admit(who)
    }

    pub(crate) fn register(
        &mut self,
        who: ClaimantId,
        policy: RegistrationPolicy,
    ) -> Result<(), EngineError> {
        match policy {
            RegistrationPolicy::AllowDuplicates => {
                self.waitlist.register(who);
                Ok(())
            }
            RegistrationPolicy::RejectDuplicates => {
                if self.waitlist.register_unique(who) {
                    Ok(())
                } else {
                    Err(EngineError::DuplicateRegistration {
                        section: self.id,
                        claimant: who,
                    })
                }
            }
        }
    }

    pub(crate) fn release(&mut self, who: ClaimantId) -> bool {
        self.waitlist.release(who)
    }

    pub(crate) fn purge(&mut self, who: ClaimantId) -> usize {
        self.waitlist.purge(who)
    }

    pub(crate) fn vacate(&mut self, who: ClaimantId) -> bool {
        self.seats.vacate(who)
    }

    /// `Closed → Open` (or re-announce while `Open`).
    pub(crate) fn mark_open(&mut self) {
        self.state = SectionState::Open;
        self.waitlist
            .set_publication_state(PublicationState::SlotAvailable);
    }

    pub(crate) fn mark_slot_freed(&mut self) {
        self.waitlist
            .set_publication_state(PublicationState::SlotAvailable);
    }

    /// Splits the section into the pieces a notification batch needs.
    pub(crate) fn batch_parts(
        &mut self,
    ) -> (SectionState, &mut Seats, &mut PublisherRegistry<ClaimantId>) {
        (self.state, &mut self.seats, &mut self.waitlist)
    }

    /// Bulk release for destruction: (waitlist, occupants).
    pub(crate) fn teardown(&mut self) -> (Vec<ClaimantId>, Vec<ClaimantId>) {
        (self.waitlist.drain(), self.seats.drain())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(capacity: usize) -> Section {
        Section::new(SectionId::new(1), "CS-101", capacity)
    }

    #[test]
    fn starts_closed_and_unset() {
        let s = section(2);
        assert_eq!(s.state(), SectionState::Closed);
        assert_eq!(s.publication_state(), PublicationState::Unset);
        assert_eq!(s.label(), "CS-101");
    }

    #[test]
    fn mark_open_sets_publication_state() {
        let mut s = section(2);
        s.mark_open();
        assert!(s.is_open());
        assert_eq!(s.publication_state(), PublicationState::SlotAvailable);
    }

    #[test]
    fn strict_registration_rejects_second_entry() {
        let mut s = section(1);
        let who = ClaimantId::new(5);
        s.register(who, RegistrationPolicy::RejectDuplicates)
            .expect("first registration");
        let err = s
            .register(who, RegistrationPolicy::RejectDuplicates)
            .unwrap_err();
        assert_eq!(err.as_label(), "duplicate_registration");
        assert_eq!(s.count(), 1);
    }

    #[test]
    fn lenient_registration_accepts_second_entry() {
        let mut s = section(1);
        let who = ClaimantId::new(5);
        s.register(who, RegistrationPolicy::AllowDuplicates).unwrap();
        s.register(who, RegistrationPolicy::AllowDuplicates).unwrap();
        assert_eq!(s.waitlist(), vec![who, who]);
    }

    #[test]
    fn teardown_returns_waitlist_and_occupants() {
        let mut s = section(1);
        let (a, b, c) = (ClaimantId::new(1), ClaimantId::new(2), ClaimantId::new(3));
        s.try_admit(a).unwrap();
        s.register(b, RegistrationPolicy::AllowDuplicates).unwrap();
        s.register(c, RegistrationPolicy::AllowDuplicates).unwrap();
        assert_eq!(s.occupant_list(), vec![a]);
        assert_eq!(s.available(), 0);

        let (waiting, seated) = s.teardown();
        assert_eq!(waiting, vec![b, c]);
        assert_eq!(seated, vec![a]);
        assert_eq!(s.count(), 0);
        assert!(s.occupant_list().is_empty());
    }
}
