//! # Event observers for the enrollment engine.
//!
//! Observers receive engine events broadcast through the [`Bus`](crate::Bus)
//! and turn them into reports, logs or metrics. They never take part in
//! admission decisions.
//!
//! ## Architecture
//! ```text
//! Enrollment ── publish(Event) ──► Bus ──► ObserverSet::listen()
//!                                              │
//!                                              ├──► LogWriter
//!                                              └──► Custom ...
//! ```
//!
//! ## Implementing custom observers
//! ```no_run
//! use enrollvisor::{Event, EventKind, Observe};
//! use async_trait::async_trait;
//!
//! struct SeatCounter;
//!
//! #[async_trait]
//! impl Observe for SeatCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::AdmissionGranted {
//!             // increment counter
//!         }
//!     }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod observe;
mod observer_set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use observe::Observe;
pub use observer_set::ObserverSet;
