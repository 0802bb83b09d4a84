//! # Reactive capability
//!
//! `Reactive` is the single operation a publisher invokes on its
//! subscribers, plus the outcome flag the publisher reads back afterwards.
//!
//! The publisher hands itself (or a scoped view of itself) to the
//! subscriber as `P`, which is how a subscriber can release its own
//! registration from inside the callback without the registry having to
//! own the subscriber.

use crate::error::EngineError;

/// Observable result of the last reactive call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Outcome {
    /// Never notified, or notified while not waiting.
    #[default]
    Idle,
    /// Claimed a slot and left the waitlist.
    Claimed,
    /// Notified but no slot could be taken; still registered.
    StillWaiting,
}

impl Outcome {
    /// Returns `true` if the subscriber claimed and left.
    #[inline]
    pub fn is_claimed(self) -> bool {
        matches!(self, Outcome::Claimed)
    }
}

/// Contract for waitlist subscribers.
///
/// Called synchronously from inside a notification batch. Implementations
/// may mutate the publisher through `publisher`, but only to release
/// themselves.
pub trait Reactive<P: ?Sized> {
    /// React to a state change of `publisher`.
    ///
    /// # Errors
    /// Contract violations (e.g. being notified while not waiting) are
    /// returned to the batch driver, which logs them and moves on.
    fn on_notify(&mut self, publisher: &mut P) -> Result<Outcome, EngineError>;

    /// Outcome flag set by the last [`on_notify`](Reactive::on_notify).
    fn outcome(&self) -> Outcome;
}
