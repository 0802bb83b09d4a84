//! # Observer fan-out.
//!
//! [`ObserverSet`] gives each observer its own bounded queue and worker
//! task, so a slow or crashing observer only loses its own events.
//!
//! ```text
//! Bus ──► listen() ──► emit_arc(event)
//!                        ├─ try_send ─► queue[i] ─► worker[i] ─► on_event()
//!                        │                              └─ panic: error!, next event
//!                        └─ queue full/closed ─► warn!, drop for observer i only
//! ```
//!
//! Each observer sees events in bus order; there is no ordering across
//! observers.

use std::any::Any;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use super::observe::Observe;
use crate::events::{Bus, Event};

struct ObserverChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Observers attached to a bus, one worker each.
pub struct ObserverSet {
    channels: Vec<ObserverChannel>,
    workers: Vec<JoinHandle<()>>,
}

impl ObserverSet {
    /// Creates a new set and spawns one worker task per observer.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(observers: Vec<Arc<dyn Observe>>) -> Self {
        let mut channels = Vec::with_capacity(observers.len());
        let mut workers = Vec::with_capacity(observers.len());

        for obs in observers {
            let cap = obs.queue_capacity().max(1);
            let name = obs.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let delivery = std::panic::AssertUnwindSafe(obs.on_event(&ev)).catch_unwind();
                    if let Err(payload) = delivery.await {
                        error!(
                            observer = obs.name(),
                            seq = ev.seq,
                            kind = ?ev.kind,
                            info = %panic_message(&*payload),
                            "observer panicked"
                        );
                    }
                }
            });
            channels.push(ObserverChannel { name, sender: tx });
            workers.push(handle);
        }
        Self { channels, workers }
    }

    /// Number of attached observers.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Clones `event` once and queues it for every observer.
    pub fn emit(&self, event: &Event) {
        self.emit_arc(Arc::new(event.clone()));
    }

    /// Queues `event` for every observer; never blocks.
    pub fn emit_arc(&self, event: Arc<Event>) {
        for channel in &self.channels {
            match channel.sender.try_send(Arc::clone(&event)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(observer = channel.name, seq = event.seq, "observer queue full; event dropped");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    warn!(observer = channel.name, seq = event.seq, "observer worker closed; event dropped");
                }
            }
        }
    }

    /// Forwards every bus event to the observers until `token` is cancelled
    /// or the bus closes, then shuts the workers down.
    ///
    /// The bus closes once every [`Bus`] clone (including the one inside the
    /// `Enrollment`) has been dropped; events still buffered are delivered
    /// first.
    pub fn listen(self, bus: &Bus, token: CancellationToken) -> JoinHandle<()> {
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    msg = rx.recv() => match msg {
                        Ok(ev) => self.emit_arc(Arc::new(ev)),
                        Err(broadcast::error::RecvError::Closed) => break,
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!(skipped = n, "observer listener lagged");
                        }
                    }
                }
            }
            self.shutdown().await;
        })
    }

    /// Closes every queue and waits for the workers to drain them.
    pub async fn shutdown(self) {
        drop(self.channels);

        for h in self.workers {
            let _ = h.await;
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&'static str>()
        .map(|msg| (*msg).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Recorder {
        seen: Arc<Mutex<Vec<EventKind>>>,
    }

    #[async_trait]
    impl Observe for Recorder {
        async fn on_event(&self, event: &Event) {
            self.seen.lock().unwrap().push(event.kind);
        }
    }

    struct Panicker;

    #[async_trait]
    impl Observe for Panicker {
        async fn on_event(&self, _event: &Event) {
            panic!("boom");
        }
    }

    #[tokio::test]
    async fn delivers_in_order_and_survives_panics() {
        let rec = Recorder::default();
        let observers: Vec<Arc<dyn Observe>> = vec![Arc::new(Panicker), Arc::new(rec.clone())];
        let set = ObserverSet::new(observers);
        assert_eq!(set.len(), 2);

        set.emit(&Event::new(EventKind::SectionOpened));
        set.emit(&Event::new(EventKind::NotifyStarted));
        set.emit(&Event::new(EventKind::NotifyFinished));
        set.shutdown().await;

        assert_eq!(
            *rec.seen.lock().unwrap(),
            vec![
                EventKind::SectionOpened,
                EventKind::NotifyStarted,
                EventKind::NotifyFinished
            ]
        );
    }

    #[tokio::test]
    async fn listen_drains_until_bus_closes() {
        let rec = Recorder::default();
        let bus = Bus::new(16);
        let observers: Vec<Arc<dyn Observe>> = vec![Arc::new(rec.clone())];
        let handle = ObserverSet::new(observers).listen(&bus, CancellationToken::new());

        bus.publish(Event::new(EventKind::SlotFreed));
        bus.publish(Event::new(EventKind::SectionRemoved));
        drop(bus);
        handle.await.unwrap();

        assert_eq!(
            *rec.seen.lock().unwrap(),
            vec![EventKind::SlotFreed, EventKind::SectionRemoved]
        );
    }

    #[test]
    fn panic_payloads_render_as_text() {
        let fixed: Box<dyn Any + Send> = Box::new("boom");
        let owned: Box<dyn Any + Send> = Box::new(String::from("seat lost"));
        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(&*fixed), "boom");
        assert_eq!(panic_message(&*owned), "seat lost");
        assert_eq!(panic_message(&*other), "unknown panic");
    }

    #[tokio::test]
    async fn cancelled_listener_stops() {
        let bus = Bus::new(4);
        let token = CancellationToken::new();
        let handle = ObserverSet::new(Vec::new()).listen(&bus, token.clone());
        token.cancel();
        handle.await.unwrap();
        assert_eq!(bus.receiver_count(), 0);
    }
}
