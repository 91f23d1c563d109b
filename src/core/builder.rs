use std::sync::Arc;

use crate::core::{Config, Group};
use crate::subscribers::Subscribe;

/// Builder for constructing a [`Group`] with event subscribers.
pub struct GroupBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl GroupBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive lifecycle events (service starting, failures, stop
    /// outcomes) through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Appends one subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds the group.
    ///
    /// No task is spawned here; subscriber workers start with [`Group::start`].
    pub fn build(self) -> Group {
        Group::new_internal(self.cfg, self.subscribers)
    }
}
