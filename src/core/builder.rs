use super::{config::EnrollmentConfig, enrollment::Enrollment};
use crate::events::Bus;

/// Builder for constructing an [`Enrollment`].
pub struct EnrollmentBuilder {
    cfg: EnrollmentConfig,
    bus: Option<Bus>,
}

impl EnrollmentBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: EnrollmentConfig) -> Self {
        Self { cfg, bus: None }
    }

    /// Publishes onto an existing bus instead of creating one.
    ///
    /// Lets several enrollments feed the same observers.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Builds and returns the `Enrollment`.
    pub fn build(self) -> Enrollment {
        let bus = self
            .bus
            .unwrap_or_else(|| Bus::new(self.cfg.bus_capacity_clamped()));
        Enrollment::new_internal(self.cfg, bus)
    }
}
