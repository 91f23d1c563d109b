//! Error types used by the lifecycle group and by services.
//!
//! Two enums:
//!
//! - [`GroupError`]: errors raised by the [`Group`](crate::Group) coordinator itself.
//! - [`ServiceError`]: errors raised by a service's `start` or `stop` operation.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::any::Any;
use std::sync::Arc;

use thiserror::Error;

/// # Errors produced by the lifecycle group.
///
/// Only the first start failure of a service is ever surfaced, and only through
/// [`Group::wait`](crate::Group::wait). The remaining variants report misuse of
/// the group's one-shot lifecycle.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum GroupError {
    /// A service's start operation failed; the group was stopped because of it.
    #[error("service `{service}` failed: {source}")]
    ServiceFailed {
        /// Name of the first service that failed.
        service: Arc<str>,
        /// The error that service returned.
        source: ServiceError,
    },

    /// `start` (or `add`) was called on a group that has already been started.
    #[error("group already started")]
    AlreadyStarted,

    /// `start` or `add` was called on a group that was stopped before it ever started.
    #[error("group was stopped before start")]
    Stopped,

    /// `start` was called outside of a Tokio runtime.
    #[error("no tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

impl GroupError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use lullaby::GroupError;
    ///
    /// assert_eq!(GroupError::AlreadyStarted.as_label(), "group_already_started");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            GroupError::ServiceFailed { .. } => "group_service_failed",
            GroupError::AlreadyStarted => "group_already_started",
            GroupError::Stopped => "group_stopped",
            GroupError::NoRuntime(_) => "group_no_runtime",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            GroupError::ServiceFailed { service, source } => {
                format!("service={service} {}", source.as_message())
            }
            GroupError::AlreadyStarted => "already started".to_string(),
            GroupError::Stopped => "stopped before start".to_string(),
            GroupError::NoRuntime(e) => format!("no runtime: {e}"),
        }
    }

    /// Returns the failing service name for [`GroupError::ServiceFailed`].
    pub fn service(&self) -> Option<&str> {
        match self {
            GroupError::ServiceFailed { service, .. } => Some(service),
            _ => None,
        }
    }
}

/// # Errors produced by a service.
///
/// Returned from [`Service::start`](crate::Service::start) and
/// [`Service::stop`](crate::Service::stop). A start error triggers the stop of
/// the whole group; a stop error is only reported as an event.
///
/// [`ServiceError::Canceled`] returned from `start` is treated as a graceful exit,
/// not as a failure.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The operation failed.
    #[error("execution failed: {error}")]
    Fail {
        /// Rendered cause.
        error: String,
    },

    /// The operation returned because its cancellation token fired.
    #[error("cancelled")]
    Canceled,

    /// The operation panicked; the panic was caught by the group.
    #[error("panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl ServiceError {
    /// Shorthand for [`ServiceError::Fail`] from anything printable.
    ///
    /// # Example
    /// ```
    /// use lullaby::ServiceError;
    ///
    /// let err = ServiceError::fail("bind: address in use");
    /// assert_eq!(err.to_string(), "execution failed: bind: address in use");
    /// ```
    pub fn fail(error: impl std::fmt::Display) -> Self {
        ServiceError::Fail {
            error: error.to_string(),
        }
    }

    /// Stable snake_case label for logs and metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ServiceError::Fail { .. } => "service_failed",
            ServiceError::Canceled => "service_canceled",
            ServiceError::Panicked { .. } => "service_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ServiceError::Fail { error } => format!("error: {error}"),
            ServiceError::Canceled => "cancelled".to_string(),
            ServiceError::Panicked { info } => format!("panic: {info}"),
        }
    }

    /// Indicates a graceful exit rather than a failure.
    pub fn is_canceled(&self) -> bool {
        matches!(self, ServiceError::Canceled)
    }

    /// Builds [`ServiceError::Panicked`] from a caught panic payload.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        ServiceError::Panicked {
            info: panic_message(payload.as_ref()),
        }
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(e: std::io::Error) -> Self {
        ServiceError::fail(e)
    }
}

/// Renders a panic payload as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
