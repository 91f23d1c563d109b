//! # lullaby
//!
//! **Lullaby** coordinates the concurrent startup and graceful shutdown of a
//! fixed set of long-running services inside one process.
//!
//! Register services, start them all at once, and stop them all (exactly once)
//! on the first of: a start failure, a termination signal, or an explicit
//! [`Group::stop`]. The stop fan-out is concurrent and bounded by a single
//! timeout shared by every service.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   Service    │   │   Service    │   │   Service    │
//!     │  (http api)  │   │  (grpc api)  │   │   (worker)   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Group (lifecycle coordinator)                                    │
//! │  - registry (Vec<ServiceRef>)                                     │
//! │  - shared CancellationToken                                       │
//! │  - PhaseCell (stop guard)                                         │
//! │  - StartedSet                                                     │
//! │  - TaskTracker (aggregate completion for wait)                    │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               │
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   │
//!     │  start task  │   │  start task  │   │  start task  │   │
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘   │
//!      │ ServiceStarting  │ ServiceFailed ──► request_stop()   │
//!      │ ServiceExited    │                   └─► stop fan-out │
//!      ▼                  ▼                  ▼                 ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                  (capacity: Config::bus_capacity)                 │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │  subscriber listener   │
//!                       │      (in Group)        │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                           (per-sub queues)
//!                         ┌─────────┼─────────┐
//!                         ▼         ▼         ▼
//!                      LogWriter  metrics   custom
//! ```
//!
//! ### Lifecycle
//! ```text
//! Idle ──start()──► Starting ──► Running ──stop()/failure/signal──► Stopping ──► Stopped
//!   └──────────────────────── stop() before start ─────────────────────────────────┘
//!
//! stop fan-out (once):
//!   ├─► cancel shared token
//!   ├─► snapshot StartedSet
//!   ├─► Service::stop(deadline) for each, concurrently
//!   └─► timeout(stop_timeout):
//!          ├─ all done ─► AllStoppedWithin
//!          └─ elapsed  ─► StopTimeout { stuck }, abandon the rest
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                        |
//! |-------------------|---------------------------------------------------------------|-------------------------------------------|
//! | **Services**      | Define long-running units as trait impls or closures.         | [`Service`], [`ServiceFn`], [`ServiceRef`]|
//! | **Coordination**  | Start, stop once, wait for everything.                        | [`Group`], [`StopHandle`], [`Phase`]      |
//! | **Subscriber API**| Hook into lifecycle events (logging, metrics, custom).        | [`Subscribe`], [`Event`], [`EventKind`]   |
//! | **Errors**        | Typed errors for services and for the coordinator.            | [`ServiceError`], [`GroupError`]          |
//! | **Configuration** | Stop timeout, signal handling, bus capacity.                  | [`Config`]                                |
//!
//! ## Optional features
//! - `logging` (default): exports [`LogWriter`], a subscriber forwarding events to `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use lullaby::{Config, Group, ServiceError, ServiceFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config::with_stop_timeout(Duration::from_secs(5));
//!
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn lullaby::Subscribe>> = vec![Arc::new(lullaby::LogWriter::default())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn lullaby::Subscribe>> = Vec::new();
//!
//!     let mut group = Group::builder(cfg).with_subscribers(subs).build();
//!
//!     group.add(ServiceFn::arc(
//!         "ticker",
//!         |ctx: CancellationToken| async move {
//!             ctx.cancelled().await;
//!             Ok::<_, ServiceError>(())
//!         },
//!         |_deadline: CancellationToken| async { Ok::<_, ServiceError>(()) },
//!     ))?;
//!
//!     group.start()?;
//!     group.stop_handle().stop();
//!     group.wait().await?;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod services;
mod subscribers;

// ---- Public re-exports ----

pub use core::{Config, Group, GroupBuilder, Phase, StopCause, StopHandle};
pub use error::{GroupError, ServiceError};
pub use events::{Event, EventKind};
pub use services::{Service, ServiceFn, ServiceRef};
pub use subscribers::Subscribe;

// Built-in subscriber forwarding events to `tracing`.
// Disable with: `--no-default-features`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
