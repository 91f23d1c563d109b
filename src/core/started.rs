//! # Started-set: services whose start task has begun.
//!
//! Every start task registers its service here before calling `Service::start`,
//! whether or not the group is already stopping. The stop fan-out waits until
//! every launched task has registered, then takes its snapshot.
//!
//! ## Rules
//! - `expect(n)` is called once by `launch`, before any start task is spawned.
//! - [`StartedSet::all_entered`] completes once `n` services have entered; the
//!   snapshot taken after it therefore holds every registered service.
//! - Insertion order is kept (entry order, not registry order).

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::services::ServiceRef;

/// Lock-protected list of started services.
#[derive(Default)]
pub(crate) struct StartedSet {
    inner: Mutex<Vec<ServiceRef>>,
    pending: AtomicUsize,
    complete: CancellationToken,
}

impl StartedSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Announces how many services are about to enter.
    pub(crate) fn expect(&self, n: usize) {
        self.pending.store(n, Ordering::Release);
        if n == 0 {
            self.complete.cancel();
        }
    }

    /// Records `service` as started.
    pub(crate) async fn enter(&self, service: &ServiceRef) {
        self.inner.lock().await.push(ServiceRef::clone(service));
        if self.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.complete.cancel();
        }
    }

    /// Completes once every expected service has entered.
    pub(crate) async fn all_entered(&self) {
        self.complete.cancelled().await;
    }

    /// Returns the services started so far.
    pub(crate) async fn snapshot(&self) -> Vec<ServiceRef> {
        self.inner.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;
    use crate::error::ServiceError;
    use crate::services::ServiceFn;

    fn noop(name: &'static str) -> ServiceRef {
        ServiceFn::arc(
            name,
            |_ctx: CancellationToken| async { Ok::<_, ServiceError>(()) },
            |_deadline: CancellationToken| async { Ok::<_, ServiceError>(()) },
        )
    }

    #[tokio::test]
    async fn completes_after_every_expected_entry() {
        let set = StartedSet::new();
        set.expect(2);

        set.enter(&noop("a")).await;
        assert!(
            timeout(Duration::from_millis(20), set.all_entered())
                .await
                .is_err()
        );

        set.enter(&noop("b")).await;
        timeout(Duration::from_secs(1), set.all_entered())
            .await
            .unwrap();

        let names: Vec<String> = set
            .snapshot()
            .await
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn nothing_expected_is_complete_at_once() {
        let set = StartedSet::new();
        set.expect(0);
        timeout(Duration::from_secs(1), set.all_entered())
            .await
            .unwrap();
        assert!(set.snapshot().await.is_empty());
    }
}
