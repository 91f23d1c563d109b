//! # Subscriber extension point.
//!
//! Implement [`Subscribe`] to observe a group's lifecycle: log it, count it, or
//! alert on it. Attach subscribers with
//! [`GroupBuilder::with_subscribers`](crate::GroupBuilder::with_subscribers).
//!
//! Delivery model:
//! - one worker task and one bounded queue per subscriber, created on `Group::start`;
//! - events arrive in publish order for a given subscriber;
//! - a full queue drops the event for that subscriber alone (`EventKind::SubscriberOverflow`);
//! - a panic inside `on_event` is caught and reported as `EventKind::SubscriberPanicked`;
//! - `Group::wait` lets every queue drain for up to `stop_timeout`, then aborts the workers.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use async_trait::async_trait;
//! use lullaby::{Event, EventKind, Subscribe};
//!
//! #[derive(Default)]
//! struct StopFailures(AtomicUsize);
//!
//! #[async_trait]
//! impl Subscribe for StopFailures {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::ServiceStopFailed | EventKind::StopTimeout) {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "stop_failures" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Receiver of lifecycle events.
///
/// `on_event` runs on the subscriber's own worker; a slow implementation only
/// delays itself. Keep it non-blocking and let it swallow its own errors.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event.
    async fn on_event(&self, event: &Event);

    /// Name reported in overflow and panic events.
    ///
    /// Defaults to the type name.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Capacity of this subscriber's queue (at least 1). Defaults to 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
