//! # Stop coordinator: idempotent stop request and bounded fan-out.
//!
//! ```text
//! request_stop(cause)            (any thread, any number of callers)
//!   ├─► PhaseCell::begin_stop()  ── lost the race ──► return false
//!   ├─► record StopCause, publish StopRequested
//!   ├─► spawn stop_fan_out() on the group tracker
//!   └─► cancel shared token                           return true
//!
//! stop_fan_out()
//!   ├─► cancel shared token (idempotent)
//!   ├─► wait for every launched start task to enter the StartedSet, then snapshot
//!   ├─► JoinSet: one Service::stop(deadline) per started service
//!   ├─► drain JoinSet until the deadline (stop_timeout after the request)
//!   │      ├─ Ok  ──► publish AllStoppedWithin
//!   │      └─ Err ──► detach remaining stops, publish StopTimeout{stuck}
//!   ├─► cancel deadline token
//!   └─► phase = Stopped
//! ```
//!
//! ## Rules
//! - The fan-out runs at most once per group (guarded by the phase CAS).
//! - `request_stop` never waits for the fan-out; `Group::wait` is the join point.
//! - One deadline is shared by all services.
//! - Stop outcomes only become events; they never reach `wait`.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::{task::JoinSet, time};
use tokio_util::sync::CancellationToken;

use crate::core::group::Shared;
use crate::core::phase::Phase;
use crate::error::ServiceError;
use crate::events::{Event, EventKind};

/// What initiated the stop of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopCause {
    /// `Group::stop` or `StopHandle::stop` was called.
    Requested,
    /// The built-in listener received a termination signal.
    Signal {
        /// Signal name, e.g. `SIGTERM`.
        name: &'static str,
    },
    /// A service's start operation failed.
    ServiceFailed {
        /// Name of the failing service.
        service: Arc<str>,
    },
}

impl StopCause {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            StopCause::Requested => "requested",
            StopCause::Signal { .. } => "signal",
            StopCause::ServiceFailed { .. } => "service_failed",
        }
    }
}

/// Initiates the stop sequence. Returns `true` for the one caller that did.
pub(crate) fn request_stop(shared: &Arc<Shared>, cause: StopCause) -> bool {
    let Some(from) = shared.phase.begin_stop() else {
        return false;
    };

    let mut ev = Event::new(EventKind::StopRequested).with_reason(cause.as_label());
    if let StopCause::ServiceFailed { service } = &cause {
        ev = ev.with_service(Arc::clone(service));
    }
    let _ = shared.cause.set(cause);
    shared.bus.publish(ev);

    match (from, shared.runtime.get()) {
        (Phase::Starting | Phase::Running, Some(rt)) => {
            // Spawned before cancelling so the tracker never looks idle in between.
            shared.tasks.spawn_on(stop_fan_out(Arc::clone(shared)), rt);
            shared.token.cancel();
        }
        _ => {
            // Nothing was launched.
            shared.token.cancel();
            shared.phase.finish_stop();
        }
    }
    true
}

/// Stops every started service concurrently under one shared deadline.
async fn stop_fan_out(shared: Arc<Shared>) {
    shared.token.cancel();

    let timeout = shared.cfg.stop_timeout;
    let deadline_at = time::Instant::now() + timeout;

    // Bounded by the same deadline as the stops.
    let _ = time::timeout_at(deadline_at, shared.started.all_entered()).await;
    let services = shared.started.snapshot().await;
    let deadline = CancellationToken::new();

    let mut pending: Vec<Option<Arc<str>>> = Vec::with_capacity(services.len());
    let mut set = JoinSet::new();
    for (idx, service) in services.into_iter().enumerate() {
        let name: Arc<str> = Arc::from(service.name());
        pending.push(Some(Arc::clone(&name)));

        let bus = shared.bus.clone();
        let deadline = deadline.clone();
        set.spawn(async move {
            bus.publish(Event::new(EventKind::ServiceStopping).with_service(name));
            let res = AssertUnwindSafe(service.stop(deadline))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| Err(ServiceError::from_panic(panic)));
            (idx, res)
        });
    }

    let drained = time::timeout_at(deadline_at, async {
        while let Some(joined) = set.join_next().await {
            let Ok((idx, res)) = joined else { continue };
            let Some(name) = pending[idx].take() else {
                continue;
            };
            match res {
                Ok(()) => shared
                    .bus
                    .publish(Event::new(EventKind::ServiceStopped).with_service(name)),
                Err(e) => shared.bus.publish(
                    Event::new(EventKind::ServiceStopFailed)
                        .with_service(name)
                        .with_reason(e.to_string()),
                ),
            }
        }
    })
    .await;

    deadline.cancel();
    match drained {
        Ok(()) => {
            shared
                .bus
                .publish(Event::new(EventKind::AllStoppedWithin).with_timeout(timeout));
        }
        Err(_elapsed) => {
            // Abandoned stops keep running detached; nobody waits for them.
            set.detach_all();
            let stuck: Vec<Arc<str>> = pending.into_iter().flatten().collect();
            shared.bus.publish(
                Event::new(EventKind::StopTimeout)
                    .with_timeout(timeout)
                    .with_stuck(stuck),
            );
        }
    }
    shared.phase.finish_stop();
}
