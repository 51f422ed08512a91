//! # Notification sink trait.
//!
//! Provides [`Subscribe`], the extension point for whatever renders supervisor
//! state (tray icon, tooltip, log, metrics).
//!
//! Each subscriber gets:
//! - **Dedicated worker task** (runs independently of the supervisor loop)
//! - **Per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (panics are caught and logged)
//!
//! ## Rules
//! - Events are processed sequentially (FIFO) per subscriber, in the order the
//!   supervisor emitted them.
//! - Flash ticks are coalesced: a slow subscriber sees at most one pending
//!   tick, never a backlog.
//! - Transitions and launch reports are never dropped. If a subscriber's queue
//!   is full of them, the supervisor loop waits for room.

use async_trait::async_trait;

use crate::events::Event;

/// Consumer of supervisor notifications.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from a dedicated worker task, not from the supervisor loop.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this subscriber.
    ///
    /// The runtime clamps capacity to a minimum of 1.
    ///
    /// Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
