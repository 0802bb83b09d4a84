//! # Enrollment: owner of every section and claimant.
//!
//! [`Enrollment`] is the top-level object. It holds both arenas, allocates
//! ids, owns the process-wide counters and the event [`Bus`], and drives
//! notification batches.
//!
//! ## Notification batch
//! ```text
//! open(section) / withdraw(..) / remove_claimant(..)
//!   └─► notify(section)
//!         ├─► publish NotifyStarted
//!         ├─► waitlist.notify_all(|registry, claimant|
//!         │        ├─ publish ClaimantNotified
//!         │        ├─ claimant.on_notify(Notice { seats, registry, .. })
//!         │        │     ├─ notice.try_admit(self)   (capacity check first)
//!         │        │     └─ notice.release(self)     (mutates the registry mid-batch)
//!         │        └─ read claimant.last_outcome())
//!         ├─► publish NotifyFault for each contract violation
//!         └─► publish NotifyFinished
//! ```
//!
//! ## Rules
//! - Single logical actor: every method takes `&mut self`, callbacks run inline.
//! - Removing a section or claimant releases every cross-reference first.
//! - Ids are never reused.

use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::builder::EnrollmentBuilder;
use super::config::EnrollmentConfig;
use super::stats::Stats;
use crate::claimant::{Claimant, JoinOutcome};
use crate::error::EngineError;
use crate::events::{Bus, Event, EventKind};
use crate::ids::{ClaimantId, SectionId};
use crate::registry::{NotifyReport, Reactive};
use crate::section::{Notice, Section};

/// Sections, claimants and the wiring between them.
#[derive(Debug)]
pub struct Enrollment {
    cfg: EnrollmentConfig,
    bus: Bus,
    sections: IndexMap<SectionId, Section>,
    claimants: IndexMap<ClaimantId, Claimant>,
    next_section: u64,
    next_claimant: u64,
    stats: Stats,
}

impl Enrollment {
    pub(crate) fn new_internal(cfg: EnrollmentConfig, bus: Bus) -> Self {
        Self {
            cfg,
            bus,
            sections: IndexMap::new(),
            claimants: IndexMap::new(),
            next_section: 0,
            next_claimant: 0,
            stats: Stats::default(),
        }
    }

    /// Creates a builder for constructing an `Enrollment`.
    pub fn builder(cfg: EnrollmentConfig) -> EnrollmentBuilder {
        EnrollmentBuilder::new(cfg)
    }

    /// Shortcut for `Enrollment::builder(cfg).build()`.
    pub fn new(cfg: EnrollmentConfig) -> Self {
        Self::builder(cfg).build()
    }

    pub fn config(&self) -> &EnrollmentConfig {
        &self.cfg
    }

    /// Event bus shared by every publisher in this enrollment.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Receiver for events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Snapshot of the process-wide counters.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    // ---------------------------
    // Construction
    // ---------------------------

    /// Adds a closed section with a fixed `capacity`.
    pub fn add_section(&mut self, label: impl Into<Arc<str>>, capacity: usize) -> SectionId {
        let id = SectionId::new(self.next_section);
        self.next_section += 1;
        let section = Section::new(id, label, capacity);
        debug!(section = %id, label = section.label(), capacity, "section added");
        self.sections.insert(id, section);
        self.stats.sections_live += 1;
        id
    }

    /// Adds a claimant that is neither seated nor waiting.
    pub fn add_claimant(&mut self, name: impl Into<Arc<str>>) -> ClaimantId {
        let id = ClaimantId::new(self.next_claimant);
        self.next_claimant += 1;
        self.claimants.insert(id, Claimant::new(id, name));
        self.stats.claimants_created += 1;
        self.stats.claimants_live += 1;
        id
    }

    // ---------------------------
    // Queries
    // ---------------------------

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(&id)
    }

    pub fn claimant(&self, id: ClaimantId) -> Option<&Claimant> {
        self.claimants.get(&id)
    }

    /// Sections in creation order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    /// Claimants in creation order.
    pub fn claimants(&self) -> impl Iterator<Item = &Claimant> {
        self.claimants.values()
    }

    // ---------------------------
    // Commands
    // ---------------------------

    /// Opens `section` for enrollment and runs exactly one notification batch.
    ///
    /// Calling it on an already open section re-announces availability.
    pub fn open(&mut self, section: SectionId) -> Result<NotifyReport<ClaimantId>, EngineError> {
        let s = self.section_mut(section)?;
        s.mark_open();
        let label = s.label_arc();
        debug!(section = %section, "section opened");
        self.bus.publish(
            Event::new(EventKind::SectionOpened)
                .with_section(section)
                .with_label(label),
        );
        self.notify(section)
    }

    /// Seats `claimant` if `section` has room, regardless of its state.
    ///
    /// A claimant admitted this way while waiting on the same section leaves
    /// its waitlist.
    pub fn try_admit(&mut self, section: SectionId, claimant: ClaimantId) -> Result<(), EngineError> {
        let Self {
            sections,
            claimants,
            bus,
            stats,
            ..
        } = self;
        let s = sections
            .get_mut(&section)
            .ok_or(EngineError::UnknownSection(section))?;
        let c = claimants
            .get_mut(&claimant)
            .ok_or(EngineError::UnknownClaimant(claimant))?;

        if let Err(err) = s.try_admit(claimant) {
            bus.publish(
                Event::new(EventKind::AdmissionDenied)
                    .with_section(section)
                    .with_claimant(claimant)
                    .with_reason(err.as_label()),
            );
            return Err(err);
        }
        bus.publish(
            Event::new(EventKind::AdmissionGranted)
                .with_section(section)
                .with_claimant(claimant),
        );
        c.record_claim(section);
        if s.purge(claimant) > 0 {
            bus.publish(
                Event::new(EventKind::ClaimantReleased)
                    .with_section(section)
                    .with_claimant(claimant)
                    .with_count(s.count()),
            );
        }
        stats.admissions += 1;
        Ok(())
    }

    /// Takes a seat if `section` is open and has room; otherwise waitlists.
    pub fn join_or_wait(
        &mut self,
        claimant: ClaimantId,
        section: SectionId,
    ) -> Result<JoinOutcome, EngineError> {
        let policy = self.cfg.registration;
        let Self {
            sections,
            claimants,
            bus,
            stats,
            ..
        } = self;
        let s = sections
            .get_mut(&section)
            .ok_or(EngineError::UnknownSection(section))?;
        let c = claimants
            .get_mut(&claimant)
            .ok_or(EngineError::UnknownClaimant(claimant))?;

        let outcome = c.join_or_wait(s, policy, bus)?;
        if outcome == JoinOutcome::Admitted {
            stats.admissions += 1;
        }
        Ok(outcome)
    }

    /// Removes the first waitlist position of `claimant` in `section`.
    ///
    /// Returns whether a position was removed; releasing an absent claimant
    /// is a no-op. The claimant's pending reference is cleared once it holds
    /// no position left in that waitlist.
    pub fn release(&mut self, section: SectionId, claimant: ClaimantId) -> Result<bool, EngineError> {
        let s = self
            .sections
            .get_mut(&section)
            .ok_or(EngineError::UnknownSection(section))?;
        if !s.release(claimant) {
            return Ok(false);
        }
        let remaining = s.count();
        let still_waiting = s.is_waiting(claimant);
        if !still_waiting {
            if let Some(c) = self.claimants.get_mut(&claimant) {
                c.forget_pending(section);
            }
        }
        self.bus.publish(
            Event::new(EventKind::ClaimantReleased)
                .with_section(section)
                .with_claimant(claimant)
                .with_count(remaining),
        );
        Ok(true)
    }

    /// Gives up the seat `claimant` holds in `section`.
    ///
    /// The freed seat marks the section `SlotAvailable` and, if the section
    /// is open, runs one notification batch. Returns `Ok(false)` when the
    /// claimant held no seat there.
    pub fn withdraw(&mut self, claimant: ClaimantId, section: SectionId) -> Result<bool, EngineError> {
        let c = self
            .claimants
            .get_mut(&claimant)
            .ok_or(EngineError::UnknownClaimant(claimant))?;
        let s = self
            .sections
            .get_mut(&section)
            .ok_or(EngineError::UnknownSection(section))?;
        if !s.vacate(claimant) {
            return Ok(false);
        }
        c.forget_claim(section);
        self.slot_freed(section, claimant)?;
        Ok(true)
    }

    /// Destroys `section`.
    ///
    /// Waiting claimants lose their pending reference and seated claimants
    /// lose the claim. Returns the released waitlist in order.
    pub fn remove_section(&mut self, section: SectionId) -> Result<Vec<ClaimantId>, EngineError> {
        let mut s = self
            .sections
            .shift_remove(&section)
            .ok_or(EngineError::UnknownSection(section))?;
        let (waiting, seated) = s.teardown();

        for id in &waiting {
            if let Some(c) = self.claimants.get_mut(id) {
                c.forget_pending(section);
            }
        }
        for id in &seated {
            if let Some(c) = self.claimants.get_mut(id) {
                c.forget_claim(section);
            }
        }
        self.stats.sections_live -= 1;
        debug!(section = %section, waiting = waiting.len(), seated = seated.len(), "section removed");
        self.bus.publish(
            Event::new(EventKind::SectionRemoved)
                .with_section(section)
                .with_count(waiting.len()),
        );
        Ok(waiting)
    }

    /// Destroys `claimant`.
    ///
    /// It leaves the waitlist it is pending on, then vacates every seat it
    /// holds; each vacated seat is a slot-freed transition for its section.
    pub fn remove_claimant(&mut self, claimant: ClaimantId) -> Result<(), EngineError> {
        let c = self
            .claimants
            .shift_remove(&claimant)
            .ok_or(EngineError::UnknownClaimant(claimant))?;
        self.stats.claimants_live -= 1;

        if let Some(pending) = c.pending() {
            if let Some(s) = self.sections.get_mut(&pending) {
                let removed = s.purge(claimant);
                if removed > 0 {
                    self.bus.publish(
                        Event::new(EventKind::ClaimantReleased)
                            .with_section(pending)
                            .with_claimant(claimant)
                            .with_count(s.count()),
                    );
                }
            }
        }
        for section in c.claimed() {
            let vacated = self
                .sections
                .get_mut(&section)
                .is_some_and(|s| s.vacate(claimant));
            if vacated {
                self.slot_freed(section, claimant)?;
            }
        }
        self.bus
            .publish(Event::new(EventKind::ClaimantRemoved).with_claimant(claimant));
        Ok(())
    }

    // ---------------------------
    // Helpers
    // ---------------------------

    fn section_mut(&mut self, id: SectionId) -> Result<&mut Section, EngineError> {
        self.sections
            .get_mut(&id)
            .ok_or(EngineError::UnknownSection(id))
    }

    /// Publication transition after a seat was vacated.
    fn slot_freed(&mut self, section: SectionId, left: ClaimantId) -> Result<(), EngineError> {
        let s = self.section_mut(section)?;
        s.mark_slot_freed();
        let open = s.is_open();
        self.bus.publish(
            Event::new(EventKind::SlotFreed)
                .with_section(section)
                .with_claimant(left),
        );
        if open {
            self.notify(section)?;
        }
        Ok(())
    }

    /// Runs one notification batch over `section`'s waitlist.
    fn notify(&mut self, section: SectionId) -> Result<NotifyReport<ClaimantId>, EngineError> {
        let Self {
            sections,
            claimants,
            bus,
            stats,
            ..
        } = self;
        let bus: &Bus = bus;
        let s = sections
            .get_mut(&section)
            .ok_or(EngineError::UnknownSection(section))?;
        let label = s.label_arc();
        bus.publish(
            Event::new(EventKind::NotifyStarted)
                .with_section(section)
                .with_count(s.count()),
        );

        let (state, seats, waitlist) = s.batch_parts();
        let report = waitlist.notify_all(|registry, who| {
            let claimant = claimants
                .get_mut(&who)
                .ok_or(EngineError::UnknownClaimant(who))?;
            bus.publish(
                Event::new(EventKind::ClaimantNotified)
                    .with_section(section)
                    .with_claimant(who),
            );
            let mut notice = Notice::new(
                section,
                Arc::clone(&label),
                state,
                who,
                &mut *seats,
                registry,
                bus,
            );
            claimant.on_notify(&mut notice)?;
            Ok(claimant.last_outcome())
        });

        for (who, err) in &report.faults {
            warn!(section = %section, claimant = %who, error = %err, "notification fault");
            bus.publish(
                Event::new(EventKind::NotifyFault)
                    .with_section(section)
                    .with_claimant(*who)
                    .with_reason(err.as_label()),
            );
        }
        stats.admissions += report.claimed.len() as u64;
        stats.batches += 1;
        debug!(
            section = %section,
            visited = report.visited.len(),
            claimed = report.claimed.len(),
            "notification batch finished"
        );
        bus.publish(
            Event::new(EventKind::NotifyFinished)
                .with_section(section)
                .with_count(report.claimed.len()),
        );
        Ok(report)
    }
}

impl Default for Enrollment {
    fn default() -> Self {
        Self::new(EnrollmentConfig::default())
    }
}
