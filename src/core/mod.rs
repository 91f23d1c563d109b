//! Lifecycle core: the group, its stop guard and the stop fan-out.
//!
//! The only public API from this module is [`Group`] (with [`GroupBuilder`] and
//! [`StopHandle`]) plus the plain data types it exposes.
//!
//! Internal modules:
//! - [`group`]: registry, shared state, `start`/`stop`/`wait`;
//! - [`supervisor`]: launches start tasks and the signal listener;
//! - [`stopper`]: idempotent stop request and bounded concurrent fan-out;
//! - [`started`]: set of services whose start has been invoked;
//! - [`phase`]: atomic lifecycle phase (the stop guard);
//! - [`shutdown`]: cross-platform termination signal handling.

mod builder;
mod config;
mod group;
mod phase;
mod shutdown;
mod started;
mod stopper;
mod supervisor;

pub use builder::GroupBuilder;
pub use config::Config;
pub use group::{Group, StopHandle};
pub use phase::Phase;
pub use stopper::StopCause;
