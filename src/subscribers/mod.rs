//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out,
//! and the built-in [`LogWriter`] (feature `logging`).
//!
//! ## Architecture
//! ```text
//! start tasks / stop fan-out ── publish(Event) ──► Bus ──► subscriber listener
//!                                                              │
//!                                                     SubscriberSet::emit(Event)
//!                                                              │
//!                                                ┌─────────────┼─────────────┐
//!                                                ▼             ▼             ▼
//!                                            LogWriter      Metrics        Custom
//! ```

#[cfg(feature = "logging")]
mod log;
mod subscriber;
mod subscriber_set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscriber::Subscribe;
pub(crate) use subscriber_set::SubscriberSet;
