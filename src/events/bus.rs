//! # Engine event bus.
//!
//! Every section, claimant and batch transition is published here as an
//! [`Event`]. The engine never waits on observers: a batch runs to completion
//! inline, and each publish is a single `broadcast::Sender::send`.
//!
//! ```text
//! Enrollment::open / withdraw / join_or_wait ...
//!     └─ notify batch ─ Notice::try_admit / release
//!                             │
//!                             ▼
//!                            Bus ──► ObserverSet::listen ──► observers
//!                             └────► Enrollment::subscribe() (tests, reports)
//! ```
//!
//! A receiver that falls more than `bus_capacity` events behind sees
//! `RecvError::Lagged(n)`. Events published while nobody subscribes are gone.

use tokio::sync::broadcast;

use super::event::Event;

/// Shared handle to the event channel. Clones publish into the same channel.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Capacity is clamped to at least one slot.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Fire-and-forget; a bus without receivers drops `ev`.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Receiver for events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
