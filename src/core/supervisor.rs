//! # Start supervisor: launches start tasks and the signal listener.
//!
//! ```text
//! launch(services)
//!   ├─► [signal listener]   (if Config::handle_signals)
//!   │      select! {
//!   │        shared token cancelled  ─► exit
//!   │        every start task done   ─► exit
//!   │        SIGINT/SIGTERM/SIGQUIT  ─► request_stop(Signal)
//!   │      }
//!   └─► for each service (registry order):
//!          start task:
//!            ├─► StartedSet::enter()   (always, even if already stopping)
//!            ├─► publish ServiceStarting
//!            ├─► Service::start(shared token)     (panics caught; token may already be cancelled)
//!            ├─ Ok / Canceled ─► publish ServiceExited
//!            └─ Err ───────────► publish ServiceFailed
//!                                record failure (first wins)
//!                                request_stop(ServiceFailed)
//! ```
//!
//! ## Rules
//! - Every start task shares the one group token.
//! - Every registered service has its start invoked exactly once, even when the
//!   group is already stopping; the service sees a cancelled token then.
//! - Launch order follows the registry; completion order is unconstrained.
//! - Start tasks are tracked twice: by the group tracker (for `wait`) and by the
//!   start tracker (so the signal listener can tell when nothing is left to stop).

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::runtime::Handle;

use crate::core::group::{Failure, Shared};
use crate::core::shutdown;
use crate::core::stopper::{StopCause, request_stop};
use crate::error::ServiceError;
use crate::events::{Event, EventKind};
use crate::services::ServiceRef;

/// Spawns the signal listener (if enabled) and one start task per service.
pub(crate) fn launch(shared: &Arc<Shared>, services: &[ServiceRef], rt: &Handle) {
    if shared.cfg.handle_signals {
        shared
            .tasks
            .spawn_on(signal_listener(Arc::clone(shared)), rt);
    }

    shared.started.expect(services.len());
    for service in services {
        let task = run_service(Arc::clone(shared), ServiceRef::clone(service));
        shared.tasks.spawn_on(shared.starts.track_future(task), rt);
    }
    shared.starts.close();
}

/// Body of one start task.
async fn run_service(shared: Arc<Shared>, service: ServiceRef) {
    let name: Arc<str> = Arc::from(service.name());

    shared.started.enter(&service).await;
    shared
        .bus
        .publish(Event::new(EventKind::ServiceStarting).with_service(Arc::clone(&name)));

    let res = AssertUnwindSafe(service.start(shared.token.clone()))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(ServiceError::from_panic(panic)));

    match res {
        Ok(()) | Err(ServiceError::Canceled) => {
            shared
                .bus
                .publish(Event::new(EventKind::ServiceExited).with_service(name));
        }
        Err(error) => {
            shared.bus.publish(
                Event::new(EventKind::ServiceFailed)
                    .with_service(Arc::clone(&name))
                    .with_reason(error.to_string()),
            );
            let _ = shared.failure.set(Failure {
                service: Arc::clone(&name),
                error,
            });
            request_stop(&shared, StopCause::ServiceFailed { service: name });
        }
    }
}

/// Turns a termination signal into a stop; exits once there is nothing left to stop.
async fn signal_listener(shared: Arc<Shared>) {
    tokio::select! {
        _ = shared.token.cancelled() => {}
        _ = shared.starts.wait() => {}
        res = shutdown::wait_for_shutdown_signal() => match res {
            Ok(name) => {
                request_stop(&shared, StopCause::Signal { name });
            }
            Err(e) => {
                shared.bus.publish(
                    Event::new(EventKind::SignalListenerFailed).with_reason(e.to_string()),
                );
            }
        },
    }
}
