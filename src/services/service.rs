//! # Service capability.
//!
//! A [`Service`] is a long-running unit with two operations:
//! - [`start`](Service::start) blocks for the service's working lifetime and
//!   returns once the shared [`CancellationToken`] is cancelled (or on failure);
//! - [`stop`](Service::stop) terminates the service's work, ideally before the
//!   deadline token fires.
//!
//! The group holds services only as [`ServiceRef`](crate::ServiceRef) handles and
//! never looks inside them.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ServiceError;

/// # Long-running unit managed by a [`Group`](crate::Group).
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use lullaby::{Service, ServiceError};
///
/// struct Ticker;
///
/// #[async_trait]
/// impl Service for Ticker {
///     fn name(&self) -> &str { "ticker" }
///
///     async fn start(&self, ctx: CancellationToken) -> Result<(), ServiceError> {
///         ctx.cancelled().await;
///         Ok(())
///     }
///
///     async fn stop(&self, _deadline: CancellationToken) -> Result<(), ServiceError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Service: Send + Sync + 'static {
    /// Returns a human-readable service name used in events and errors.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Runs the service until it fails or `ctx` is cancelled.
    ///
    /// Cancellation is cooperative: an implementation that never observes `ctx`
    /// never returns. Returning `Ok(())` or [`ServiceError::Canceled`] is a
    /// graceful exit; any other error stops the whole group.
    async fn start(&self, ctx: CancellationToken) -> Result<(), ServiceError>;

    /// Terminates the service's work.
    ///
    /// `deadline` is cancelled when the group's stop timeout elapses. The result
    /// is only reported as an event.
    async fn stop(&self, deadline: CancellationToken) -> Result<(), ServiceError>;
}
