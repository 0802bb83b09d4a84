//! # Example: enrollment
//!
//! Walks one section through the classic waitlist scenario and prints every
//! engine event through the built-in [`LogWriter`].
//!
//! ## Flow
//! ```text
//! add_section(cap=1) ─► join_or_wait(a, b, c)   (closed → all waitlisted)
//!     ├─► open()        a claims, b/c still waiting
//!     └─► withdraw(a)   seat freed → batch → b claims, c still waiting
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example enrollment --features logging
//! ```

use std::sync::Arc;

use enrollvisor::{Enrollment, EnrollmentConfig, LogWriter, Observe, ObserverSet};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let mut enr = Enrollment::new(EnrollmentConfig::default());
    let observers: Vec<Arc<dyn Observe>> = vec![Arc::new(LogWriter::new())];
    let listener = ObserverSet::new(observers).listen(enr.bus(), CancellationToken::new());

    let cs101 = enr.add_section("CS-101", 1);
    let ada = enr.add_claimant("ada");
    let bob = enr.add_claimant("bob");
    let cyd = enr.add_claimant("cyd");

    for who in [ada, bob, cyd] {
        enr.join_or_wait(who, cs101)?;
    }

    let report = enr.open(cs101)?;
    println!("opened: claimed={:?} waiting={:?}", report.claimed, report.waiting);

    enr.withdraw(ada, cs101)?;

    let section = enr
        .section(cs101)
        .ok_or_else(|| anyhow::anyhow!("section vanished"))?;
    println!(
        "{}: occupants={:?} waitlist={:?} stats={:?}",
        section.label(),
        section.occupant_list(),
        section.waitlist(),
        enr.stats()
    );

    drop(enr);
    listener.await?;
    Ok(())
}
