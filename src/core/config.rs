//! # Engine configuration.
//!
//! Provides [`EnrollmentConfig`], the settings consumed by
//! [`EnrollmentBuilder`](crate::EnrollmentBuilder).
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1 (the bus never gets an invalid channel)

/// How a waitlist treats a claimant that registers twice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegistrationPolicy {
    /// Append unconditionally (default).
    ///
    /// The same claimant may then hold several positions; a notification
    /// batch still visits it once, and a successful claim purges every
    /// position it held.
    #[default]
    AllowDuplicates,

    /// Refuse a second registration with `EngineError::DuplicateRegistration`.
    RejectDuplicates,
}

/// Configuration for an [`Enrollment`](crate::Enrollment).
///
/// ## Field semantics
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
/// - `registration`: Duplicate handling for waitlist registration
#[derive(Clone, Debug)]
pub struct EnrollmentConfig {
    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Observers that lag behind more than `bus_capacity` events will
    /// receive `Lagged` and skip older items.
    pub bus_capacity: usize,

    /// Duplicate handling for waitlist registration.
    pub registration: RegistrationPolicy,
}

impl EnrollmentConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns `true` when duplicate registrations are refused.
    #[inline]
    pub fn rejects_duplicates(&self) -> bool {
        matches!(self.registration, RegistrationPolicy::RejectDuplicates)
    }
}

impl Default for EnrollmentConfig {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `registration = RegistrationPolicy::AllowDuplicates`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            registration: RegistrationPolicy::default(),
        }
    }
}
