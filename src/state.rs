//! # Supervisor state and its published snapshot.
//!
//! [`SupervisorState`] is owned and mutated by the supervisor loop only.
//! Everyone else observes it through a [`StateView`], a read-only handle over a
//! `tokio::sync::watch` channel that the loop updates **before** it notifies
//! subscribers.
//!
//! ## Transitions
//! ```text
//!            Start ok                 Stop                 escalation done
//! Stopped ───────────► Running ──────────────► Stopping ───────────────────► Stopped
//!    │                    │     Restart                                  ▲
//!    │ Start failed       ├──────────────────► Restarting ───────────────┘
//!    ▼                    │ child exited
//! CannotStart ◄───────────┘
//!    │ (flash tick every flash_interval)
//!    └──── Stop ─────────────────────────────────────────────────────────► Stopped
//! ```
//!
//! A snapshot is stale by the time the caller reads it: the loop may already
//! have moved on.

use std::fmt;

use tokio::sync::watch;

/// Lifecycle state of the supervised child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SupervisorState {
    /// Child launched and believed alive.
    Running,
    /// Launch failed or the child exited on its own; notifications flash.
    CannotStart,
    /// Shutdown escalation in progress.
    Stopping,
    /// Shutdown escalation in progress, followed by a relaunch.
    Restarting,
    /// No child.
    #[default]
    Stopped,
}

impl SupervisorState {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SupervisorState::Running => "running",
            SupervisorState::CannotStart => "cannot_start",
            SupervisorState::Stopping => "stopping",
            SupervisorState::Restarting => "restarting",
            SupervisorState::Stopped => "stopped",
        }
    }

    /// True for the states in which the supervisor may hold a process handle.
    #[inline]
    pub fn may_own_child(&self) -> bool {
        matches!(
            self,
            SupervisorState::Running | SupervisorState::Stopping | SupervisorState::Restarting
        )
    }
}

impl fmt::Display for SupervisorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Point-in-time view of the supervisor: state plus the child pid, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Status {
    pub state: SupervisorState,
    pub pid: Option<u32>,
}

/// Read-only handle on the supervisor's published [`Status`].
///
/// Cheap to clone; every clone observes the same channel.
#[derive(Clone, Debug)]
pub struct StateView {
    rx: watch::Receiver<Status>,
}

impl StateView {
    pub(crate) fn new(rx: watch::Receiver<Status>) -> Self {
        Self { rx }
    }

    /// Returns the latest published status.
    pub fn snapshot(&self) -> Status {
        *self.rx.borrow()
    }

    /// Waits until the published status satisfies `pred` and returns it.
    ///
    /// Returns the last known status if the supervisor has exited without
    /// ever satisfying the predicate.
    pub async fn changed_to<F>(&mut self, mut pred: F) -> Status
    where
        F: FnMut(&Status) -> bool,
    {
        let seen = self.rx.wait_for(|s| pred(s)).await.map(|status| *status);
        match seen {
            Ok(status) => status,
            Err(_closed) => *self.rx.borrow(),
        }
    }
}
