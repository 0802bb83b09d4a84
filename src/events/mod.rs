//! Engine events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Enrollment` (section/claimant lifecycle, waitlist
//!   mutations) and the notification batch driver.
//! - **Consumers**: [`ObserverSet`](crate::ObserverSet) listeners and any
//!   receiver obtained from [`Enrollment::subscribe`](crate::Enrollment::subscribe).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
