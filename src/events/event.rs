//! # Lifecycle events emitted by the group, its start tasks and its stop fan-out.
//!
//! [`EventKind`] falls into three groups:
//! - **Start events**: a service's start task (starting, exited, failed)
//! - **Stop events**: the stop request and the bounded fan-out (stopping, stopped,
//!   stop failed, all stopped, timeout)
//! - **Infrastructure events**: signal listener and subscriber problems
//!
//! The [`Event`] struct carries additional metadata such as timestamps, service
//! name, reasons, and the configured stop timeout.
//!
//! ## Ordering
//! `seq` is taken from one process-wide counter at construction. Subscribers run
//! on separate workers, so sort by `seq` when merging their views.
//!
//! ## Example
//! ```rust
//! use lullaby::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ServiceFailed)
//!     .with_service("http")
//!     .with_reason("bind: address in use");
//!
//! assert_eq!(ev.kind, EventKind::ServiceFailed);
//! assert_eq!(ev.service.as_deref(), Some("http"));
//! assert_eq!(ev.reason.as_deref(), Some("bind: address in use"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Process-wide event counter.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `service`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `service`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Start events ===
    /// A start task is about to call `Service::start`.
    ///
    /// Sets:
    /// - `service`: service name
    ServiceStarting,

    /// `Service::start` returned gracefully (`Ok` or `Canceled`).
    ///
    /// Sets:
    /// - `service`: service name
    ServiceExited,

    /// `Service::start` returned an error or panicked.
    ///
    /// Sets:
    /// - `service`: service name
    /// - `reason`: failure message
    ServiceFailed,

    // === Stop events ===
    /// The stop sequence began (emitted once per group).
    ///
    /// Sets:
    /// - `reason`: stop cause label (`requested`, `signal`, `service_failed`)
    /// - `service`: failing service name (only for `service_failed`)
    StopRequested,

    /// A stop task is about to call `Service::stop`.
    ///
    /// Sets:
    /// - `service`: service name
    ServiceStopping,

    /// `Service::stop` returned `Ok`.
    ///
    /// Sets:
    /// - `service`: service name
    ServiceStopped,

    /// `Service::stop` returned an error or panicked. Never propagated further.
    ///
    /// Sets:
    /// - `service`: service name
    /// - `reason`: failure message
    ServiceStopFailed,

    /// Every stop task finished within the stop timeout.
    ///
    /// Sets:
    /// - `timeout_ms`: configured stop timeout (ms)
    AllStoppedWithin,

    /// The stop timeout elapsed; remaining stop tasks were abandoned.
    ///
    /// Sets:
    /// - `timeout_ms`: configured stop timeout (ms)
    /// - `stuck`: names of the services whose stop did not return
    StopTimeout,

    // === Trigger events ===
    /// The OS signal listener could not be installed.
    ///
    /// Sets:
    /// - `reason`: registration error
    SignalListenerFailed,
}

/// One lifecycle event.
///
/// Which optional fields are filled depends on [`EventKind`]; see each variant.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the service (or subscriber), if applicable.
    pub service: Option<Arc<str>>,
    /// Human-readable reason (errors, stop cause, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Stop timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Services whose stop was abandoned at the deadline.
    pub stuck: Option<Arc<[Arc<str>]>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            service: None,
            reason: None,
            timeout_ms: None,
            stuck: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a service name.
    #[inline]
    pub fn with_service(mut self, service: impl Into<Arc<str>>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Attaches the list of services whose stop was abandoned.
    #[inline]
    pub fn with_stuck(mut self, stuck: Vec<Arc<str>>) -> Self {
        self.stuck = Some(stuck.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_service(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_service(subscriber)
            .with_reason(info)
    }
}
