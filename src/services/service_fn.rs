//! # Closure-backed service (`ServiceFn`)
//!
//! [`ServiceFn`] wraps two closures, `start: Fn(CancellationToken) -> Fut` and
//! `stop: Fn(CancellationToken) -> Fut`, producing a fresh future per call.
//! Shared state between the two goes through an explicit `Arc<...>` captured by
//! both closures.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use lullaby::{ServiceError, ServiceFn, ServiceRef};
//!
//! let s: ServiceRef = ServiceFn::arc(
//!     "worker",
//!     |ctx: CancellationToken| async move {
//!         ctx.cancelled().await;
//!         Ok::<_, ServiceError>(())
//!     },
//!     |_deadline: CancellationToken| async { Ok::<_, ServiceError>(()) },
//! );
//!
//! assert_eq!(s.name(), "worker");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ServiceError;
use crate::services::Service;

/// Shared handle to a service.
pub type ServiceRef = Arc<dyn Service>;

/// Function-backed service implementation.
pub struct ServiceFn<S, T> {
    name: Cow<'static, str>,
    start: S,
    stop: T,
}

impl<S, T> ServiceFn<S, T> {
    /// Creates a new function-backed service.
    ///
    /// Prefer [`ServiceFn::arc`] when you immediately need a [`ServiceRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, start: S, stop: T) -> Self {
        Self {
            name: name.into(),
            start,
            stop,
        }
    }

    /// Creates the service and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, start: S, stop: T) -> Arc<Self> {
        Arc::new(Self::new(name, start, stop))
    }
}

#[async_trait]
impl<S, SF, T, TF> Service for ServiceFn<S, T>
where
    S: Fn(CancellationToken) -> SF + Send + Sync + 'static,
    SF: Future<Output = Result<(), ServiceError>> + Send + 'static,
    T: Fn(CancellationToken) -> TF + Send + Sync + 'static,
    TF: Future<Output = Result<(), ServiceError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&self, ctx: CancellationToken) -> Result<(), ServiceError> {
        (self.start)(ctx).await
    }

    async fn stop(&self, deadline: CancellationToken) -> Result<(), ServiceError> {
        (self.stop)(deadline).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn closures_are_invoked_per_call() {
        let stops = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&stops);
        let svc: ServiceRef = ServiceFn::arc(
            "echo",
            |ctx: CancellationToken| async move {
                ctx.cancelled().await;
                Err::<(), _>(ServiceError::Canceled)
            },
            move |_deadline: CancellationToken| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ServiceError>(())
                }
            },
        );

        let ctx = CancellationToken::new();
        ctx.cancel();
        assert_eq!(svc.start(ctx).await, Err(ServiceError::Canceled));

        svc.stop(CancellationToken::new()).await.unwrap();
        svc.stop(CancellationToken::new()).await.unwrap();
        assert_eq!(stops.load(Ordering::SeqCst), 2);
        assert_eq!(svc.name(), "echo");
    }
}
