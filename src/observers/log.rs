//! # LogWriter: event printer
//!
//! A minimal observer that renders incoming [`Event`]s through `tracing`
//! at `INFO`. Use it for tests or demos; install a subscriber such as
//! `tracing_subscriber::fmt` to see the output.
//!
//! ## Example output
//! ```text
//! [opened] section=s#0 label="CS-101"
//! [notify-start] section=s#0 waitlist=3
//! [notified] section=s#0 claimant=c#0
//! [granted] section=s#0 claimant=c#0
//! [released] section=s#0 claimant=c#0 waitlist=2
//! [notified] section=s#0 claimant=c#1
//! [denied] section=s#0 claimant=c#1 reason=capacity_exceeded
//! [notify-finish] section=s#0 claimed=1
//! ```

use async_trait::async_trait;
use tracing::info;

use super::observe::Observe;
use crate::events::{Event, EventKind};

/// Event writer observer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn id<T: std::fmt::Display>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

#[async_trait]
impl Observe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let section = id(e.section);
        let claimant = id(e.claimant);
        let count = id(e.count);
        let reason = e.reason.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::SectionOpened => {
                info!("[opened] section={section} label={:?}", e.label.as_deref().unwrap_or(""));
            }
            EventKind::SlotFreed => info!("[slot-freed] section={section} by={claimant}"),
            EventKind::SectionRemoved => {
                info!("[section-removed] section={section} released={count}")
            }
            EventKind::ClaimantRemoved => info!("[claimant-removed] claimant={claimant}"),
            EventKind::ClaimantRegistered => {
                info!("[waitlisted] section={section} claimant={claimant} waitlist={count}")
            }
            EventKind::ClaimantReleased => {
                info!("[released] section={section} claimant={claimant} waitlist={count}")
            }
            EventKind::NotifyStarted => info!("[notify-start] section={section} waitlist={count}"),
            EventKind::ClaimantNotified => info!("[notified] section={section} claimant={claimant}"),
            EventKind::AdmissionGranted => info!("[granted] section={section} claimant={claimant}"),
            EventKind::AdmissionDenied => {
                info!("[denied] section={section} claimant={claimant} reason={reason}")
            }
            EventKind::NotifyFault => {
                info!("[fault] section={section} claimant={claimant} reason={reason}")
            }
            EventKind::NotifyFinished => info!("[notify-finish] section={section} claimed={count}"),
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
