//! # Group configuration.
//!
//! Provides [`Config`], the settings of a [`Group`](crate::Group).
//!
//! The only setting that shapes the lifecycle itself is `stop_timeout`; the rest
//! controls the built-in signal trigger and event delivery (including how long
//! `wait` lets subscribers drain, which is also `stop_timeout`).

use std::time::Duration;

/// Configuration for a lifecycle group.
///
/// ## Field semantics
/// - `stop_timeout`: shared deadline for the whole stop fan-out (not per service)
/// - `handle_signals`: install the built-in SIGINT/SIGTERM/SIGQUIT (Ctrl-C) trigger
/// - `bus_capacity`: event bus ring buffer size (values below 1 are treated as 1)
#[derive(Clone, Debug)]
pub struct Config {
    /// Deadline for the concurrent stop fan-out.
    ///
    /// When it elapses, the deadline token passed to `Service::stop` is cancelled
    /// and stop calls still running are abandoned.
    pub stop_timeout: Duration,

    /// Whether `start` spawns a listener that stops the group on a termination signal.
    pub handle_signals: bool,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns a default configuration with the given stop timeout.
    pub fn with_stop_timeout(stop_timeout: Duration) -> Self {
        Self {
            stop_timeout,
            ..Self::default()
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `stop_timeout = 30s`
    /// - `handle_signals = true`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            stop_timeout: Duration::from_secs(30),
            handle_signals: true,
            bus_capacity: 1024,
        }
    }
}
