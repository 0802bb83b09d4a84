//! # Core observer trait
//!
//! `Observe` is the extension point for plugging reporting sinks onto the
//! event [`Bus`](crate::Bus). Each observer is driven by a dedicated worker
//! loop fed by a bounded queue owned by [`ObserverSet`](crate::ObserverSet).
//!
//! Observers are *not* waitlist subscribers: they see what happened, they
//! cannot change it. Waitlist subscribers implement
//! [`Reactive`](crate::Reactive) instead.
//!
//! ## Contract
//! - Implementations may be slow (I/O, batching); they do **not** block the
//!   engine nor other observers.
//! - If an observer's queue overflows, events for that observer are
//!   **dropped** (warn).

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event observers.
#[async_trait]
pub trait Observe: Send + Sync + 'static {
    /// Handle a single event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this observer's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
