//! # Example: custom_observer
//!
//! Demonstrates how to build and attach a custom event observer.
//!
//! Shows how to:
//! - Implement the [`Observe`] trait.
//! - Inspect [`Event`] / [`EventKind`] to build a seat report.
//! - Wire the observer onto an [`Enrollment`] bus with [`ObserverSet::listen`].
//!
//! ## Run
//! ```bash
//! cargo run --example custom_observer
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use enrollvisor::{
    Enrollment, EnrollmentConfig, Event, EventKind, Observe, ObserverSet, SectionId,
};
use tokio_util::sync::CancellationToken;

/// Counts granted and denied admissions per section.
#[derive(Default)]
struct SeatReport {
    per_section: Mutex<BTreeMap<SectionId, (u32, u32)>>,
}

#[async_trait::async_trait]
impl Observe for SeatReport {
    async fn on_event(&self, ev: &Event) {
        let Some(section) = ev.section else { return };
        let mut map = self.per_section.lock().expect("report lock");
        let entry = map.entry(section).or_default();
        match ev.kind {
            EventKind::AdmissionGranted => entry.0 += 1,
            EventKind::AdmissionDenied => entry.1 += 1,
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "seat-report"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let report = Arc::new(SeatReport::default());
    let mut enr = Enrollment::new(EnrollmentConfig::default());
    let observers: Vec<Arc<dyn Observe>> = vec![report.clone()];
    let listener = ObserverSet::new(observers).listen(enr.bus(), CancellationToken::new());

    let small = enr.add_section("SEM-1", 2);
    let large = enr.add_section("LEC-1", 10);
    enr.open(large)?;

    for i in 0..5 {
        let who = enr.add_claimant(format!("student-{i}"));
        enr.join_or_wait(who, small)?;
    }
    enr.open(small)?;

    for i in 0..4 {
        let who = enr.add_claimant(format!("auditor-{i}"));
        enr.join_or_wait(who, large)?;
    }

    drop(enr);
    listener.await?;

    for (section, (granted, denied)) in report.per_section.lock().expect("report lock").iter() {
        println!("{section}: granted={granted} denied={denied}");
    }
    Ok(())
}
