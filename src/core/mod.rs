//! Engine core: ownership and orchestration.
//!
//! Internal modules:
//! - [`enrollment`]: arenas, id allocation, commands, notification batches;
//! - [`builder`]: constructs an `Enrollment` from a config;
//! - [`config`]: engine settings and registration policy;
//! - [`stats`]: process-wide counters.

mod builder;
mod config;
mod enrollment;
mod stats;

pub use builder::EnrollmentBuilder;
pub use config::{EnrollmentConfig, RegistrationPolicy};
pub use enrollment::Enrollment;
pub use stats::Stats;
