//! Error types used by the enrollment engine.
//!
//! A single enum, [`EngineError`], covers two families of failures:
//!
//! - **Admission outcomes**: `CapacityExceeded`, `AlreadyAdmitted`. These are
//!   ordinary values; the usual reaction is to waitlist.
//! - **Contract violations**: the caller broke an API precondition
//!   (`NotWaitlisted`, `WrongPublisher`, `ForeignRelease`, ...).
//!
//! Releasing an absent subscriber is *not* an error: `release` simply
//! returns `false`.
//!
//! Like the rest of the crate, errors provide `as_label` / `as_message`
//! helpers for logs and event payloads.

use thiserror::Error;

use crate::ids::{ClaimantId, SectionId};

/// # Errors produced by the enrollment engine.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Section is full; occupancy already equals capacity.
    #[error("section {section} is full (capacity {capacity})")]
    CapacityExceeded {
        /// Section that rejected the admission.
        section: SectionId,
        /// Its fixed capacity.
        capacity: usize,
    },

    /// Claimant already occupies a seat in this section.
    #[error("claimant {claimant} already holds a seat in section {section}")]
    AlreadyAdmitted {
        section: SectionId,
        claimant: ClaimantId,
    },

    /// `on_notify` reached a claimant that is not waiting on anything.
    #[error("claimant {claimant} notified while not waitlisted")]
    NotWaitlisted {
        claimant: ClaimantId,
    },

    /// Claimant was notified by a section other than the one it waits on.
    #[error("claimant {claimant} waits on {pending} but was notified by {notified_by}")]
    WrongPublisher {
        claimant: ClaimantId,
        pending: SectionId,
        notified_by: SectionId,
    },

    /// Claimant is already waiting on a different section.
    #[error("claimant {claimant} is already waitlisted on section {pending}")]
    AlreadyWaitlisted {
        claimant: ClaimantId,
        pending: SectionId,
    },

    /// Registration rejected by [`RegistrationPolicy::RejectDuplicates`](crate::RegistrationPolicy).
    #[error("claimant {claimant} is already registered on section {section}")]
    DuplicateRegistration {
        section: SectionId,
        claimant: ClaimantId,
    },

    /// A callback tried to release a subscriber other than itself.
    #[error("claimant {caller} attempted to release {target} during notification")]
    ForeignRelease {
        caller: ClaimantId,
        target: ClaimantId,
    },

    /// No section with this id (never existed or already removed).
    #[error("unknown section {0}")]
    UnknownSection(SectionId),

    /// No claimant with this id (never existed or already removed).
    #[error("unknown claimant {0}")]
    UnknownClaimant(ClaimantId),
}

impl EngineError {
    /// Returns a short stable label (snake_case) for use in logs/events.
    ///
    /// # Example
    /// ```
    /// use enrollvisor::{ClaimantId, EngineError};
    ///
    /// let err = EngineError::NotWaitlisted { claimant: ClaimantId::new(3) };
    /// assert_eq!(err.as_label(), "not_waitlisted");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            EngineError::CapacityExceeded { .. } => "capacity_exceeded",
            EngineError::AlreadyAdmitted { .. } => "already_admitted",
            EngineError::NotWaitlisted { .. } => "not_waitlisted",
            EngineError::WrongPublisher { .. } => "wrong_publisher",
            EngineError::AlreadyWaitlisted { .. } => "already_waitlisted",
            EngineError::DuplicateRegistration { .. } => "duplicate_registration",
            EngineError::ForeignRelease { .. } => "foreign_release",
            EngineError::UnknownSection(_) => "unknown_section",
            EngineError::UnknownClaimant(_) => "unknown_claimant",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            EngineError::CapacityExceeded { section, capacity } => {
                format!("full: section={section} capacity={capacity}")
            }
            EngineError::AlreadyAdmitted { section, claimant } => {
                format!("seated: section={section} claimant={claimant}")
            }
            EngineError::NotWaitlisted { claimant } => {
                format!("not waitlisted: claimant={claimant}")
            }
            EngineError::WrongPublisher {
                claimant,
                pending,
                notified_by,
            } => format!("wrong publisher: claimant={claimant} pending={pending} by={notified_by}"),
            EngineError::AlreadyWaitlisted { claimant, pending } => {
                format!("already waiting: claimant={claimant} pending={pending}")
            }
            EngineError::DuplicateRegistration { section, claimant } => {
                format!("duplicate: section={section} claimant={claimant}")
            }
            EngineError::ForeignRelease { caller, target } => {
                format!("foreign release: caller={caller} target={target}")
            }
            EngineError::UnknownSection(id) => format!("unknown section: {id}"),
            EngineError::UnknownClaimant(id) => format!("unknown claimant: {id}"),
        }
    }

    /// Indicates whether the error means the caller misused the API.
    ///
    /// Returns `false` for admission outcomes (`CapacityExceeded`,
    /// `AlreadyAdmitted`), which are ordinary results.
    ///
    /// # Example
    /// ```
    /// use enrollvisor::{ClaimantId, EngineError, SectionId};
    ///
    /// let full = EngineError::CapacityExceeded { section: SectionId::new(0), capacity: 1 };
    /// assert!(!full.is_contract_violation());
    ///
    /// let misuse = EngineError::NotWaitlisted { claimant: ClaimantId::new(0) };
    /// assert!(misuse.is_contract_violation());
    /// ```
    pub fn is_contract_violation(&self) -> bool {
        !matches!(
            self,
            EngineError::CapacityExceeded { .. } | EngineError::AlreadyAdmitted { .. }
        )
    }
}
