//! # Lifecycle event bus.
//!
//! [`Bus`] wraps a [`tokio::sync::broadcast`] channel. Everything inside a group
//! publishes to it; the subscriber listener and [`Group::events`](crate::Group::events)
//! receivers read from it.
//!
//! ```text
//! start tasks ──┐
//! stop fan-out ─┼──► Bus ──► subscriber listener ──► SubscriberSet
//! signal task ──┤        └─► Group::events() receivers
//! sub. workers ─┘
//! ```
//!
//! Publishing never waits. A receiver that falls more than `capacity` events
//! behind sees `RecvError::Lagged` and loses the oldest ones. Events published
//! while nobody is subscribed are discarded.

use tokio::sync::broadcast;

use super::event::Event;

/// Cloneable publishing side of the group's event channel.
#[derive(Clone, Debug)]
pub struct Bus {
    sender: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus retaining up to `capacity` undelivered events (at least 1).
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Sends `ev` to every current receiver.
    pub fn publish(&self, ev: Event) {
        // Err only means there are no receivers.
        let _ = self.sender.send(ev);
    }

    /// Opens a receiver for events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn receivers_see_events_published_after_subscribe() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::ServiceStarting));

        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::ServiceExited).with_service("a"));

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::ServiceExited);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn slow_receivers_lag() {
        let bus = Bus::new(2);
        let mut rx = bus.subscribe();
        for _ in 0..4 {
            bus.publish(Event::new(EventKind::ServiceStopping));
        }
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(2))
        ));
        assert_eq!(rx.recv().await.unwrap().kind, EventKind::ServiceStopping);
    }
}
