//! Publisher side of the engine.
//!
//! - [`PublisherRegistry`] ordered subscriber keys, register/release, batch fan-out
//! - [`Reactive`] the capability a subscriber exposes to its publisher
//! - [`Outcome`] the flag read back after each reactive call

mod publisher;
mod reactive;

pub use publisher::{NotifyReport, PublicationState, PublisherRegistry};
pub use reactive::{Outcome, Reactive};
