//! # Notification sinks for the supervisor.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and, behind the `logging` feature, the demo [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Supervisor loop ── set_state() ──► SubscriberSet::emit(Event)
//!                                          │
//!                                    ┌─────┴──────┬────────────┐
//!                                    ▼            ▼            ▼
//!                                [queue 1]    [queue 2]    [queue N]
//!                                    │            │            │
//!                              tray icon     LogWriter      custom
//! ```
//!
//! ## Implementing a sink
//! ```no_run
//! use childvisor::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct TrayIcon;
//!
//! #[async_trait]
//! impl Subscribe for TrayIcon {
//!     async fn on_event(&self, ev: &Event) {
//!         match ev.kind {
//!             EventKind::Flash => { /* toggle the icon */ }
//!             _ => { /* pick an icon for ev.state */ }
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "tray" }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscriber;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
