//! # enrollvisor
//!
//! **Enrollvisor** is a small notification engine for capacity-constrained
//! enrollment: a finite-capacity [`Section`] publishes availability changes
//! to the claimants on its FIFO waitlist, and each claimant reacts by
//! trying to take a seat.
//!
//! The hard part is that a claimant which succeeds removes itself from the
//! very waitlist that is being iterated. The engine runs every batch over a
//! snapshot of the waitlist taken at the start, so nobody is skipped and
//! nobody is notified twice.
//!
//! ## Architecture
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Enrollment (owner, single logical actor)                         │
//! │  - sections:  IndexMap<SectionId, Section>                        │
//! │  - claimants: IndexMap<ClaimantId, Claimant>                      │
//! │  - Stats (process-wide counters)                                  │
//! │  - Bus (broadcast engine events)                                  │
//! └──────┬─────────────────────────────────────────────────┬──────────┘
//!        ▼                                                 ▼
//! ┌─────────────────────────────┐                   ┌──────────────┐
//! │ Section                     │  notify_all       │  Claimant    │
//! │  - Seats (capacity, set)    │ ────────────────► │  Reactive::  │
//! │  - PublisherRegistry        │ ◄──────────────── │  on_notify() │
//! │    (waitlist of ClaimantId) │  try_admit/release└──────────────┘
//! └─────────────────────────────┘
//!        │ publish(Event)
//!        ▼
//!      Bus ──► ObserverSet ──► LogWriter / custom observers
//! ```
//!
//! ## Lifecycle
//! ```text
//! join_or_wait(c, s)
//!   ├─ s Open && seat free ─► Admitted
//!   └─ otherwise           ─► Waitlisted (c.pending = s)
//!
//! open(s)                   Closed → Open, publication = SlotAvailable
//!   └─► one batch: for each waiting claimant, in registration order
//!         ├─ seat free ─► Claimed, leaves the waitlist
//!         └─ full      ─► StillWaiting
//!
//! withdraw(c, s)            seat freed → SlotAvailable → batch (if Open)
//! ```
//!
//! ## Features
//! | Area              | Description                                           | Key types / traits                         |
//! |-------------------|-------------------------------------------------------|--------------------------------------------|
//! | **Engine**        | Owns sections/claimants, runs notification batches.   | [`Enrollment`], [`EnrollmentConfig`]       |
//! | **Registry**      | Ordered waitlist with reentrant-safe fan-out.         | [`PublisherRegistry`], [`Reactive`]        |
//! | **Resources**     | Fixed-capacity seats with a `Closed/Open` state.      | [`Section`], [`Seats`], [`SectionState`]   |
//! | **Events**        | Broadcast engine events for reporting.                | [`Event`], [`EventKind`], [`Bus`]          |
//! | **Observers**     | Async fan-out of events to sinks.                     | [`Observe`], [`ObserverSet`]               |
//! | **Errors**        | Typed admission outcomes and contract violations.     | [`EngineError`]                            |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use enrollvisor::{Enrollment, EnrollmentConfig, JoinOutcome, Outcome};
//!
//! let mut enr = Enrollment::new(EnrollmentConfig::default());
//! let cs101 = enr.add_section("CS-101", 1);
//! let ada = enr.add_claimant("ada");
//! let bob = enr.add_claimant("bob");
//!
//! assert_eq!(enr.join_or_wait(ada, cs101)?, JoinOutcome::Waitlisted);
//! assert_eq!(enr.join_or_wait(bob, cs101)?, JoinOutcome::Waitlisted);
//!
//! let report = enr.open(cs101)?;
//! assert_eq!(report.claimed, vec![ada]);
//! assert_eq!(enr.claimant(ada).unwrap().last_outcome(), Outcome::Claimed);
//! assert_eq!(enr.section(cs101).unwrap().waitlist(), vec![bob]);
//! # Ok::<(), enrollvisor::EngineError>(())
//! ```
mod claimant;
mod core;
mod error;
mod events;
mod ids;
mod observers;
mod registry;
mod section;

// ---- Public re-exports ----

pub use claimant::{Claimant, JoinOutcome};
pub use core::{Enrollment, EnrollmentBuilder, EnrollmentConfig, RegistrationPolicy, Stats};
pub use error::EngineError;
pub use events::{Bus, Event, EventKind};
pub use ids::{ClaimantId, SectionId};
pub use observers::{Observe, ObserverSet};
pub use registry::{NotifyReport, Outcome, PublicationState, PublisherRegistry, Reactive};
pub use section::{Notice, Section, SectionState, Seats};

// Optional: expose a simple built-in logger observer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogWriter;
