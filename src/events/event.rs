//! # Notifications emitted by the supervisor loop.
//!
//! The [`EventKind`] enum classifies notifications:
//! - **Transitions**: the state changed (`StateChanged`)
//! - **Flash ticks**: the state is still `CannotStart` after another interval (`Flash`)
//! - **Launch reports**: the user-facing launch failure report (`LaunchFailed`)
//!
//! Every event carries the state the supervisor is in **after** the update
//! that produced it, so subscribers never pair a transition with the old state.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use childvisor::{Event, EventKind, SupervisorState};
//!
//! let ev = Event::new(EventKind::StateChanged, SupervisorState::Running).with_pid(4242);
//!
//! assert_eq!(ev.kind, EventKind::StateChanged);
//! assert_eq!(ev.state, SupervisorState::Running);
//! assert_eq!(ev.pid, Some(4242));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::error::LaunchError;
use crate::state::SupervisorState;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of supervisor notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The supervisor moved to a new state.
    ///
    /// Sets:
    /// - `state`: the new state
    /// - `pid`: child pid when the new state owns a child
    StateChanged,

    /// Periodic tick while in `CannotStart` (drives a flashing indicator).
    ///
    /// Sets:
    /// - `state`: always `CannotStart`
    Flash,

    /// Spawning the child failed; user-facing report.
    ///
    /// Emitted right before the `StateChanged` to `CannotStart`.
    ///
    /// Sets:
    /// - `title`: fixed report title
    /// - `reason`: fixed user-facing message
    /// - `error`: underlying spawn error
    /// - `state`: always `CannotStart`
    LaunchFailed,
}

/// Supervisor notification with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Supervisor state after the update that produced this event.
    pub state: SupervisorState,
    /// Child pid, if the supervisor holds a child.
    pub pid: Option<u32>,
    /// Short title for user-facing reports.
    pub title: Option<Arc<str>>,
    /// Human-readable reason.
    pub reason: Option<Arc<str>>,
    /// Underlying error text.
    pub error: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event with current timestamp and next sequence number.
    pub fn new(kind: EventKind, state: SupervisorState) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            state,
            pid: None,
            title: None,
            reason: None,
            error: None,
        }
    }

    /// Creates a transition event.
    #[inline]
    pub fn state_changed(state: SupervisorState, pid: Option<u32>) -> Self {
        let mut ev = Event::new(EventKind::StateChanged, state);
        ev.pid = pid;
        ev
    }

    /// Creates a flash tick for the `CannotStart` state.
    #[inline]
    pub fn flash() -> Self {
        Event::new(EventKind::Flash, SupervisorState::CannotStart)
    }

    /// Creates the user-facing launch failure report.
    ///
    /// A failed launch always leaves the supervisor in `CannotStart`.
    pub fn launch_failed(err: &LaunchError) -> Self {
        Event::new(EventKind::LaunchFailed, SupervisorState::CannotStart)
            .with_title(err.title())
            .with_reason(err.user_message())
            .with_error(err.to_string())
    }

    /// Attaches a child pid.
    #[inline]
    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    /// Attaches a report title.
    #[inline]
    pub fn with_title(mut self, title: impl Into<Arc<str>>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches error text.
    #[inline]
    pub fn with_error(mut self, error: impl Into<Arc<str>>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// True for transition events into `state`.
    #[inline]
    pub fn is_transition_to(&self, state: SupervisorState) -> bool {
        self.kind == EventKind::StateChanged && self.state == state
    }
}
