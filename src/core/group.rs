//! # Group: owns the registry, the shared token and the stop guard.
//!
//! The [`Group`] registers services, launches them concurrently on
//! [`start`](Group::start), stops them all (once) on the first of a start
//! failure, a termination signal or an explicit [`stop`](Group::stop), and
//! exposes [`wait`](Group::wait) as the single join point.
//!
//! ## Architecture
//! ```text
//! add(service) ──► registry (Vec<ServiceRef>)
//!
//! start()
//!   ├─► subscriber listener: Bus ──► SubscriberSet ──► LogWriter / custom
//!   └─► supervisor::launch()
//!         ├─► signal listener ───────────────┐
//!         └─► start task × N ── failure ─────┤
//!                                            ▼
//! stop() / StopHandle::stop() ──────► stopper::request_stop()   (exactly once)
//!                                            └─► stop_fan_out() (bounded by stop_timeout)
//!
//! wait()
//!   ├─► TaskTracker: start tasks + signal listener + fan-out
//!   ├─► flush subscriber queues (at most stop_timeout)
//!   └─► first start failure, if any
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use lullaby::{Group, ServiceError, ServiceFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut group = Group::new(Duration::from_secs(5));
//!     group.add(ServiceFn::arc(
//!         "worker",
//!         |ctx: CancellationToken| async move {
//!             ctx.cancelled().await;
//!             Ok::<_, ServiceError>(())
//!         },
//!         |_deadline: CancellationToken| async { Ok::<_, ServiceError>(()) },
//!     ))?;
//!
//!     group.start()?;
//!     group.stop();
//!     group.wait().await?;
//!     Ok(())
//! }
//! ```

use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::core::builder::GroupBuilder;
use crate::core::config::Config;
use crate::core::phase::{Phase, PhaseCell};
use crate::core::started::StartedSet;
use crate::core::stopper::{StopCause, request_stop};
use crate::core::supervisor;
use crate::error::{GroupError, ServiceError};
use crate::events::{Bus, Event};
use crate::services::ServiceRef;
use crate::subscribers::{Subscribe, SubscriberSet};

/// First recorded start failure.
pub(crate) struct Failure {
    pub(crate) service: Arc<str>,
    pub(crate) error: ServiceError,
}

/// State shared by the group, its start tasks, the listener and the fan-out.
pub(crate) struct Shared {
    pub(crate) cfg: Config,
    pub(crate) bus: Bus,
    /// Shared cancellation signal handed to every `Service::start`.
    pub(crate) token: CancellationToken,
    pub(crate) phase: PhaseCell,
    pub(crate) cause: OnceLock<StopCause>,
    pub(crate) failure: OnceLock<Failure>,
    pub(crate) started: StartedSet,
    /// Every task `wait` joins on.
    pub(crate) tasks: TaskTracker,
    /// Start tasks only.
    pub(crate) starts: TaskTracker,
    /// Runtime captured by `start`; the fan-out is spawned on it.
    pub(crate) runtime: OnceLock<Handle>,
}

/// Lifecycle coordinator for a fixed set of services.
///
/// A group is single-use: one `start`, one stop, then it is done.
pub struct Group {
    services: Vec<ServiceRef>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    shared: Arc<Shared>,
    drain: CancellationToken,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl Group {
    /// Creates a group with the default [`Config`] and the given stop timeout.
    pub fn new(stop_timeout: Duration) -> Self {
        Self::builder(Config::with_stop_timeout(stop_timeout)).build()
    }

    /// Returns a builder for a group with subscribers.
    pub fn builder(cfg: Config) -> GroupBuilder {
        GroupBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: Config, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let bus = Bus::new(cfg.bus_capacity);
        let shared = Arc::new(Shared {
            cfg,
            bus,
            token: CancellationToken::new(),
            phase: PhaseCell::new(),
            cause: OnceLock::new(),
            failure: OnceLock::new(),
            started: StartedSet::new(),
            tasks: TaskTracker::new(),
            starts: TaskTracker::new(),
            runtime: OnceLock::new(),
        });
        Self {
            services: Vec::new(),
            subscribers,
            shared,
            drain: CancellationToken::new(),
            listener: Mutex::new(None),
        }
    }

    /// Appends a service to the registry.
    ///
    /// Only allowed before [`start`](Self::start).
    pub fn add(&mut self, service: ServiceRef) -> Result<(), GroupError> {
        match self.shared.phase.get() {
            Phase::Idle => {
                self.services.push(service);
                Ok(())
            }
            p if p.is_stopping() && self.shared.runtime.get().is_none() => Err(GroupError::Stopped),
            _ => Err(GroupError::AlreadyStarted),
        }
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns `true` if no service is registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Launches every registered service and returns without waiting for them.
    ///
    /// Service failures are never reported here; they stop the group and
    /// surface through [`wait`](Self::wait).
    ///
    /// # Errors
    /// - [`GroupError::NoRuntime`] outside a Tokio runtime;
    /// - [`GroupError::AlreadyStarted`] on a second call;
    /// - [`GroupError::Stopped`] if the group was stopped before it started.
    pub fn start(&self) -> Result<(), GroupError> {
        let rt = Handle::try_current()?;
        if self.shared.phase.get().is_stopping() && self.shared.runtime.get().is_none() {
            return Err(GroupError::Stopped);
        }
        if self.shared.runtime.set(rt.clone()).is_err() {
            return Err(GroupError::AlreadyStarted);
        }
        match self.shared.phase.transition(Phase::Idle, Phase::Starting) {
            Ok(()) => {}
            Err(p) if p.is_stopping() => return Err(GroupError::Stopped),
            Err(_) => return Err(GroupError::AlreadyStarted),
        }

        self.spawn_subscriber_listener(&rt);
        supervisor::launch(&self.shared, &self.services, &rt);

        // Fails only if a stop already moved the group on.
        let _ = self.shared.phase.transition(Phase::Starting, Phase::Running);
        Ok(())
    }

    /// Stops the group: cancels the shared token and launches the bounded stop
    /// fan-out in the background.
    ///
    /// Idempotent and thread-safe; only the first call (from any source) has an
    /// effect, and only that call returns `true`. Never blocks.
    pub fn stop(&self) -> bool {
        request_stop(&self.shared, StopCause::Requested)
    }

    /// Returns a cloneable handle for external stop triggers.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Waits for every start task, the signal listener and the stop fan-out.
    ///
    /// Returns the first start failure, if any. Stop failures and stop timeouts
    /// are never reported here.
    ///
    /// Does not require `stop` to have been called: once every start task has
    /// returned on its own, `wait` returns too.
    ///
    /// Subscribers then get up to `stop_timeout` to drain their queues; workers
    /// still busy after that are aborted.
    pub async fn wait(&self) -> Result<(), GroupError> {
        self.shared.tasks.close();
        self.shared.tasks.wait().await;
        self.flush_subscribers().await;

        match self.shared.failure.get() {
            Some(f) => Err(GroupError::ServiceFailed {
                service: Arc::clone(&f.service),
                source: f.error.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.shared.phase.get()
    }

    /// What stopped the group, once it has been stopped.
    pub fn stop_cause(&self) -> Option<StopCause> {
        self.shared.cause.get().cloned()
    }

    /// Subscribes to the group's event bus.
    ///
    /// Only events published after this call are received.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.shared.bus.subscribe()
    }

    /// Forwards bus events to the subscribers until `wait` drains them.
    fn spawn_subscriber_listener(&self, rt: &Handle) {
        if self.subscribers.is_empty() {
            return;
        }
        let mut rx = self.shared.bus.subscribe();
        let set = SubscriberSet::new(self.subscribers.clone(), self.shared.bus.clone());
        let drain = self.drain.clone();

        let handle = rt.spawn(async move {
            loop {
                tokio::select! {
                    msg = rx.recv() => match msg {
                        Ok(ev) => set.emit(ev),
                        Err(RecvError::Lagged(_)) => continue,
                        Err(RecvError::Closed) => break,
                    },
                    _ = drain.cancelled() => {
                        loop {
                            match rx.try_recv() {
                                Ok(ev) => set.emit(ev),
                                Err(TryRecvError::Lagged(_)) => continue,
                                Err(_) => break,
                            }
                        }
                        break;
                    }
                }
            }
            set.shutdown().await;
        });
        *self.listener.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }

    /// Lets subscribers drain their queues for at most `stop_timeout`.
    ///
    /// Aborting the listener drops the `SubscriberSet`, which aborts any worker
    /// still stuck in `on_event`.
    async fn flush_subscribers(&self) {
        self.drain.cancel();
        let handle = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(mut handle) = handle else { return };
        if time::timeout(self.shared.cfg.stop_timeout, &mut handle)
            .await
            .is_err()
        {
            handle.abort();
        }
    }
}

/// Cloneable stop trigger for signal handlers, health checks, business rules.
///
/// Can be used from any thread, including threads outside the Tokio runtime.
#[derive(Clone)]
pub struct StopHandle {
    shared: Arc<Shared>,
}

impl StopHandle {
    /// Same as [`Group::stop`].
    pub fn stop(&self) -> bool {
        request_stop(&self.shared, StopCause::Requested)
    }

    /// Returns `true` once any stop has been initiated.
    pub fn is_stopping(&self) -> bool {
        self.shared.phase.get().is_stopping()
    }

    /// Completes once the shared cancellation token has been cancelled.
    pub async fn cancelled(&self) {
        self.shared.token.cancelled().await;
    }
}
