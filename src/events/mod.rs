//! Supervisor notifications: the data delivered to subscribers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] classification and payload metadata
//!
//! ## Quick reference
//! - **Publisher**: the supervisor loop, after it has updated its state.
//! - **Consumers**: every [`Subscribe`](crate::Subscribe) registered on the
//!   supervisor, via [`SubscriberSet`](crate::SubscriberSet).

mod event;

pub use event::{Event, EventKind};
