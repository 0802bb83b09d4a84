//! Publisher view handed to a claimant during a notification batch.

use std::sync::Arc;

use tracing::debug;

use super::resource::SectionState;
use super::seats::Seats;
use crate::error::EngineError;
use crate::events::{Bus, Event, EventKind};
use crate::ids::{ClaimantId, SectionId};
use crate::registry::PublisherRegistry;

/// Scoped access to the notifying section.
///
/// Borrowed for the duration of a single reactive call. Only the notified
/// subscriber may be released through it.
pub struct Notice<'a> {
    section: SectionId,
    label: Arc<str>,
    state: SectionState,
    subscriber: ClaimantId,
    seats: &'a mut Seats,
    waitlist: &'a mut PublisherRegistry<ClaimantId>,
    bus: &'a Bus,
}

impl<'a> Notice<'a> {
    pub(crate) fn new(
        section: SectionId,
        label: Arc<str>,
        state: SectionState,
        subscriber: ClaimantId,
        seats: &'a mut Seats,
        waitlist: &'a mut PublisherRegistry<ClaimantId>,
        bus: &'a Bus,
    ) -> Self {
        Self {
            section,
            label,
            state,
            subscriber,
            seats,
            waitlist,
            bus,
        }
    }

    /// Section that triggered the notification.
    #[inline]
    pub fn section(&self) -> SectionId {
        self.section
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn state(&self) -> SectionState {
        self.state
    }

    /// Subscriber currently being notified.
    #[inline]
    pub fn subscriber(&self) -> ClaimantId {
        self.subscriber
    }

    #[inline]
    pub fn available(&self) -> usize {
        self.seats.available()
    }

    /// Attempts to seat `who` in the notifying section.
    pub fn try_admit(&mut self, who: ClaimantId) -> Result<(), EngineError> {
        match self.seats.try_admit(who) {
            Ok(()) => {
                self.bus.publish(
                    Event::new(EventKind::AdmissionGranted)
                        .with_section(self.section)
                        .with_claimant(who),
                );
                Ok(())
            }
            Err(err) => {
                self.bus.publish(
                    Event::new(EventKind::AdmissionDenied)
                        .with_section(self.section)
                        .with_claimant(who)
                        .with_reason(err.as_label()),
                );
                Err(err)
            }
        }
    }

    /// Releases `who` from the waitlist; `who` must be the notified subscriber.
    ///
    /// Returns whether a position was removed.
    pub fn release(&mut self, who: ClaimantId) -> Result<bool, EngineError> {
        if who != self.subscriber {
            return Err(EngineError::ForeignRelease {
                caller: self.subscriber,
                target: who,
            });
        }
        let removed = self.waitlist.release(who);
        if removed {
            debug!(section = %self.section, claimant = %who, "released during notification");
            self.bus.publish(
                Event::new(EventKind::ClaimantReleased)
                    .with_section(self.section)
                    .with_claimant(who)
                    .with_count(self.waitlist.count()),
            );
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts() -> (Seats, PublisherRegistry<ClaimantId>, Bus) {
        let mut waitlist = PublisherRegistry::new();
        waitlist.register(ClaimantId::new(1));
        waitlist.register(ClaimantId::new(2));
        (Seats::new(SectionId::new(3), 1), waitlist, Bus::new(8))
    }

    #[test]
    fn releasing_another_subscriber_is_refused() {
        let (mut seats, mut waitlist, bus) = parts();
        let (a, b) = (ClaimantId::new(1), ClaimantId::new(2));
        let mut notice = Notice::new(
            SectionId::new(3),
            Arc::from("LAB-3"),
            SectionState::Open,
            a,
            &mut seats,
            &mut waitlist,
            &bus,
        );

        assert_eq!(
            notice.release(b),
            Err(EngineError::ForeignRelease {
                caller: a,
                target: b
            })
        );
        assert_eq!(waitlist.snapshot(), vec![a, b]);
    }

    #[test]
    fn subscriber_releases_itself_once() {
        let (mut seats, mut waitlist, bus) = parts();
        let a = ClaimantId::new(1);
        let mut rx = bus.subscribe();
        let mut notice = Notice::new(
            SectionId::new(3),
            Arc::from("LAB-3"),
            SectionState::Open,
            a,
            &mut seats,
            &mut waitlist,
            &bus,
        );

        assert_eq!(notice.release(a), Ok(true));
        assert_eq!(notice.release(a), Ok(false));
        assert_eq!(waitlist.snapshot(), vec![ClaimantId::new(2)]);
        assert_eq!(rx.try_recv().unwrap().kind, EventKind::ClaimantReleased);
        assert!(rx.try_recv().is_err());
    }
}
