//! Lifecycle events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the group while it starts and stops
//! its services.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: start tasks, the stop fan-out, the signal listener,
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the group's subscriber listener (fans out to `SubscriberSet`)
//!   and any receiver obtained from `Group::events()`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
