//! # Logging subscriber.
//!
//! [`LogWriter`] forwards lifecycle events to [`tracing`], one structured record
//! per event. Install any `tracing` subscriber (e.g. `tracing-subscriber`'s `fmt`)
//! to see them.
//!
//! ## Levels
//! ```text
//! debug  service-starting, service-stopping
//! info   service-exited, stop-requested, service-stopped, all-stopped
//! warn   service-stop-failed, stop-timeout, signal-listener-failed, subscriber-*
//! error  service-failed
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// `tracing` bridge for lifecycle events.
///
/// Enabled via the `logging` feature (on by default).
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let service = e.service.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::ServiceStarting => {
                tracing::debug!(seq = e.seq, service, "service starting");
            }
            EventKind::ServiceExited => {
                tracing::info!(seq = e.seq, service, "service exited");
            }
            EventKind::ServiceFailed => {
                tracing::error!(seq = e.seq, service, reason, "service failed");
            }
            EventKind::StopRequested => {
                tracing::info!(seq = e.seq, cause = reason, service, "stop requested");
            }
            EventKind::ServiceStopping => {
                tracing::debug!(seq = e.seq, service, "service stopping");
            }
            EventKind::ServiceStopped => {
                tracing::info!(seq = e.seq, service, "service stopped");
            }
            EventKind::ServiceStopFailed => {
                tracing::warn!(seq = e.seq, service, reason, "service stop failed");
            }
            EventKind::AllStoppedWithin => {
                tracing::info!(seq = e.seq, timeout_ms = e.timeout_ms, "all services stopped");
            }
            EventKind::StopTimeout => {
                tracing::warn!(
                    seq = e.seq,
                    timeout_ms = e.timeout_ms,
                    stuck = ?e.stuck.as_deref().unwrap_or_default(),
                    "stop timeout exceeded, abandoning remaining services"
                );
            }
            EventKind::SignalListenerFailed => {
                tracing::warn!(seq = e.seq, reason, "signal listener not installed");
            }
            EventKind::SubscriberPanicked | EventKind::SubscriberOverflow => {
                tracing::warn!(seq = e.seq, subscriber = service, reason, kind = ?e.kind, "subscriber problem");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
