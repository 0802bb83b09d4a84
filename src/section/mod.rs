//! Capacity-bounded resources.
//!
//! - [`Section`] seats + waitlist, `Closed`/`Open` state
//! - [`Seats`] the fixed-capacity occupant set
//! - [`Notice`] what a claimant sees of the section while being notified

mod notice;
mod resource;
mod seats;

pub use notice::Notice;
pub use resource::{Section, SectionState};
pub use seats::Seats;
