/// Process-wide counters owned by an [`Enrollment`](crate::Enrollment).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Claimants ever created.
    pub claimants_created: u64,
    /// Claimants currently alive.
    pub claimants_live: usize,
    /// Sections currently alive.
    pub sections_live: usize,
    /// Seats granted (immediate or on notification).
    pub admissions: u64,
    /// Notification batches run.
    pub batches: u64,
}
