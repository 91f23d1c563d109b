//! # Subscriber fan-out.
//!
//! [`SubscriberSet`] hands each event to every subscriber through that
//! subscriber's own bounded lane, so the group's listener never waits on a
//! subscriber.
//!
//! ```text
//! emit(ev) ─┬─► lane "log_writer" ──► worker ──► on_event()
//!           ├─► lane "metrics"    ──► worker ──► on_event()
//!           └─► lane N            ──► worker ──► on_event()
//!                  full/closed: drop + SubscriberOverflow
//!                  panic:       catch + SubscriberPanicked
//! ```
//!
//! Order is kept within a lane, not across lanes. Panics are caught with
//! `AssertUnwindSafe`: a subscriber that panics while holding a lock may leave
//! its own state poisoned.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinSet;

use crate::error::panic_message;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::Subscribe;

/// Sending half of one subscriber's queue.
struct Lane {
    name: &'static str,
    tx: mpsc::Sender<Arc<Event>>,
}

/// Worker pool delivering events to subscribers.
pub(crate) struct SubscriberSet {
    lanes: Vec<Lane>,
    workers: JoinSet<()>,
    bus: Bus,
}

impl SubscriberSet {
    /// Spawns one worker per subscriber on the current runtime.
    pub(crate) fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut lanes = Vec::with_capacity(subs.len());
        let mut workers = JoinSet::new();

        for sub in subs {
            let (tx, rx) = mpsc::channel(sub.queue_capacity().max(1));
            lanes.push(Lane {
                name: sub.name(),
                tx,
            });
            workers.spawn(deliver(sub, rx, bus.clone()));
        }
        Self {
            lanes,
            workers,
            bus,
        }
    }

    /// Queues `event` on every lane without waiting.
    ///
    /// A lane that is full or closed loses the event and a `SubscriberOverflow`
    /// is published, unless the event is itself an overflow report.
    pub(crate) fn emit(&self, event: Event) {
        let report = event.kind != EventKind::SubscriberOverflow;
        let event = Arc::new(event);

        for lane in &self.lanes {
            let why = match lane.tx.try_send(Arc::clone(&event)) {
                Ok(()) => continue,
                Err(TrySendError::Full(_)) => "full",
                Err(TrySendError::Closed(_)) => "closed",
            };
            if report {
                self.bus.publish(Event::subscriber_overflow(lane.name, why));
            }
        }
    }

    /// Closes every lane and waits until the workers have drained them.
    pub(crate) async fn shutdown(mut self) {
        self.lanes.clear();
        while self.workers.join_next().await.is_some() {}
    }
}

async fn deliver(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>, bus: Bus) {
    while let Some(ev) = rx.recv().await {
        let handled = AssertUnwindSafe(sub.on_event(&ev)).catch_unwind().await;
        if let Err(payload) = handled {
            bus.publish(Event::subscriber_panicked(
                sub.name(),
                panic_message(payload.as_ref()),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct Collect {
        seen: Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Subscribe for Collect {
        async fn on_event(&self, event: &Event) {
            self.seen.lock().unwrap().push(event.kind);
        }
        fn name(&self) -> &'static str {
            "collect"
        }
    }

    struct Explode;

    #[async_trait]
    impl Subscribe for Explode {
        async fn on_event(&self, _event: &Event) {
            panic!("subscriber blew up");
        }
        fn name(&self) -> &'static str {
            "explode"
        }
    }

    #[tokio::test]
    async fn every_subscriber_sees_events_in_order() {
        let bus = Bus::new(16);
        let collect = Arc::new(Collect::default());
        let subs: Vec<Arc<dyn Subscribe>> = vec![collect.clone()];
        let set = SubscriberSet::new(subs, bus);

        set.emit(Event::new(EventKind::ServiceStarting));
        set.emit(Event::new(EventKind::ServiceExited));
        set.shutdown().await;

        let seen = collect.seen.lock().unwrap().clone();
        assert_eq!(seen, vec![EventKind::ServiceStarting, EventKind::ServiceExited]);
    }

    #[tokio::test]
    async fn panics_are_reported_on_the_bus() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let collect = Arc::new(Collect::default());
        let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Explode), collect.clone()];
        let set = SubscriberSet::new(subs, bus);

        set.emit(Event::new(EventKind::StopRequested));
        set.shutdown().await;

        let ev = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ev.kind, EventKind::SubscriberPanicked);
        assert_eq!(ev.service.as_deref(), Some("explode"));
        assert_eq!(ev.reason.as_deref(), Some("subscriber blew up"));
        assert_eq!(collect.seen.lock().unwrap().len(), 1);
    }
}
