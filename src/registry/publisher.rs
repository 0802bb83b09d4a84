//! # Publisher registry: ordered subscriber list with reentrant-safe fan-out.
//!
//! [`PublisherRegistry`] stores subscriber keys (never the subscribers
//! themselves) in registration order and drives notification batches.
//!
//! ## Batch protocol
//! ```text
//! notify_all(deliver)
//!   ├─► batch = distinct(subscribers)          (snapshot, first occurrence wins)
//!   └─► for key in batch:
//!         ├─ key no longer registered? ─► skip (never dereference a removed entry)
//!         ├─ outcome = deliver(&mut registry, key)
//!         │     └─ deliver may call registry.release(key)
//!         ├─ Ok(Claimed)       ─► purge any position key still holds
//!         ├─ Ok(StillWaiting)  ─► keep
//!         └─ Err(e)            ─► record fault, warn, continue
//! ```
//!
//! ## Rules
//! - Traversal order is the registration order as of the start of the batch.
//! - Keys registered during a batch are not visited by that batch.
//! - A key is visited at most once per batch, even when registered twice.
//! - `release` removes the **first** match and is idempotent.

use std::hash::Hash;

use indexmap::IndexSet;
use tracing::{debug, warn};

use super::reactive::Outcome;
use crate::error::EngineError;

/// Reason recorded by the last publication transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PublicationState {
    /// No transition yet.
    #[default]
    Unset,
    /// A slot became available (open or freed).
    SlotAvailable,
}

/// Summary of one notification batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyReport<K> {
    /// Subscribers whose reactive operation ran, in order.
    pub visited: Vec<K>,
    /// Subscribers that claimed and left.
    pub claimed: Vec<K>,
    /// Subscribers that remain registered.
    pub waiting: Vec<K>,
    /// Subscribers that were already gone when their turn came.
    pub skipped: Vec<K>,
    /// Subscribers that broke their contract.
    pub faults: Vec<(K, EngineError)>,
}

impl<K> NotifyReport<K> {
    fn with_capacity(n: usize) -> Self {
        Self {
            visited: Vec::with_capacity(n),
            claimed: Vec::new(),
            waiting: Vec::with_capacity(n),
            skipped: Vec::new(),
            faults: Vec::new(),
        }
    }

    /// Returns `true` if no subscriber faulted.
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

impl<K> Default for NotifyReport<K> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

/// Ordered registry of subscriber keys.
#[derive(Debug, Clone)]
pub struct PublisherRegistry<K> {
    subscribers: Vec<K>,
    state: PublicationState,
}

impl<K> PublisherRegistry<K>
where
    K: Copy + Eq + Hash + std::fmt::Debug,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            state: PublicationState::Unset,
        }
    }

    /// Appends `key`. No duplicate check.
    pub fn register(&mut self, key: K) {
        self.subscribers.push(key);
    }

    /// Appends `key` unless it is already registered.
    ///
    /// Returns `false` (and leaves the registry untouched) on a duplicate.
    pub fn register_unique(&mut self, key: K) -> bool {
        if self.contains(key) {
            return false;
        }
        self.subscribers.push(key);
        true
    }

    /// Removes the first position holding `key`.
    ///
    /// Returns whether a position was removed; an absent key is a no-op.
    pub fn release(&mut self, key: K) -> bool {
        match self.subscribers.iter().position(|k| *k == key) {
            Some(idx) => {
                self.subscribers.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Removes every position holding `key`; returns how many were removed.
    pub fn purge(&mut self, key: K) -> usize {
        let before = self.subscribers.len();
        self.subscribers.retain(|k| *k != key);
        before - self.subscribers.len()
    }

    #[inline]
    pub fn contains(&self, key: K) -> bool {
        self.subscribers.contains(&key)
    }

    /// Number of registered positions.
    #[inline]
    pub fn count(&self) -> usize {
        self.subscribers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Ordered copy of the registered keys.
    pub fn snapshot(&self) -> Vec<K> {
        self.subscribers.clone()
    }

    #[inline]
    pub fn publication_state(&self) -> PublicationState {
        self.state
    }

    #[inline]
    pub fn set_publication_state(&mut self, state: PublicationState) {
        self.state = state;
    }

    /// Releases every subscriber at once, returning them in order.
    pub fn drain(&mut self) -> Vec<K> {
        std::mem::take(&mut self.subscribers)
    }

    /// Runs one notification batch.
    ///
    /// `deliver` receives the registry itself so the subscriber can release
    /// its own position while the batch is in progress. It returns the
    /// subscriber's outcome flag as read after the reactive call.
    pub fn notify_all<F>(&mut self, mut deliver: F) -> NotifyReport<K>
    where
        F: FnMut(&mut Self, K) -> Result<Outcome, EngineError>,
    {
        let batch: IndexSet<K> = self.subscribers.iter().copied().collect();
        let mut report = NotifyReport::with_capacity(batch.len());

        for key in batch {
            if !self.contains(key) {
                report.skipped.push(key);
                continue;
            }
            report.visited.push(key);

            match deliver(self, key) {
                Ok(Outcome::Claimed) => {
                    let stale = self.purge(key);
                    if stale > 0 {
                        debug!(?key, stale, "purged stale positions after claim");
                    }
                    report.claimed.push(key);
                }
                Ok(_) => report.waiting.push(key),
                Err(err) => {
                    warn!(?key, error = %err, "subscriber fault during notification");
                    report.faults.push((key, err));
                }
            }
        }
        report
    }
}

impl<K> Default for PublisherRegistry<K>
where
    K: Copy + Eq + Hash + std::fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
