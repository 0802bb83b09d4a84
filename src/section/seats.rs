//! Fixed-capacity seat list.

use indexmap::IndexSet;

use crate::error::EngineError;
use crate::ids::{ClaimantId, SectionId};

/// Occupants of one section, bounded by a capacity fixed at construction.
///
/// ## Invariants
/// - `occupants.len() <= capacity`
/// - a failed admission leaves the seats untouched
#[derive(Debug, Clone)]
pub struct Seats {
    section: SectionId,
    capacity: usize,
    occupants: IndexSet<ClaimantId>,
}

impl Seats {
    pub fn new(section: SectionId, capacity: usize) -> Self {
        Self {
            section,
            capacity,
            occupants: IndexSet::with_capacity(capacity),
        }
    }

    /// Seats `who` if a seat is free.
    ///
    /// # Errors
    /// - [`EngineError::CapacityExceeded`] when occupancy equals capacity
    /// - [`EngineError::AlreadyAdmitted`] when `who` is already seated
    pub fn try_admit(&mut self, who: ClaimantId) -> Result<(), EngineError> {
        if self.occupants.contains(&who) {
            return Err(EngineError::AlreadyAdmitted {
                section: self.section,
                claimant: who,
            });
        }
        if self.is_full() {
            return Err(EngineError::CapacityExceeded {
                section: self.section,
                capacity: self.capacity,
            });
        }
        self.occupants.insert(who);
        Ok(())
    }

    /// Frees the seat held by `who`, keeping the order of the others.
    pub fn vacate(&mut self, who: ClaimantId) -> bool {
        self.occupants.shift_remove(&who)
    }

    /// Frees every seat, returning former occupants in admission order.
    pub fn drain(&mut self) -> Vec<ClaimantId> {
        self.occupants.drain(..).collect()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.occupants.len() >= self.capacity
    }

    /// Free seats left.
    #[inline]
    pub fn available(&self) -> usize {
        self.capacity.saturating_sub(self.occupants.len())
    }

    #[inline]
    pub fn contains(&self, who: ClaimantId) -> bool {
        self.occupants.contains(&who)
    }

    /// Occupants in admission order.
    pub fn occupants(&self) -> Vec<ClaimantId> {
        self.occupants.iter().copied().collect()
    }
}
