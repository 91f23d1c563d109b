//! # Service abstractions.
//!
//! - [`Service`] - trait for long-running units with `start`/`stop`
//! - [`ServiceFn`] - closure-backed service implementation
//! - [`ServiceRef`] - shared reference to a service (`Arc<dyn Service>`)

mod service;
mod service_fn;

pub use service::Service;
pub use service_fn::{ServiceFn, ServiceRef};
