//! # Shutdown escalation: graceful first, forceful last.
//!
//! Terminates a [`ProcessHandle`] with as little disruption as possible.
//!
//! ## Steps
//! ```text
//! already exited? ─────────────────────────────────────────► AlreadyExited
//!        │ no
//!        ▼
//! request_close()     ── wait close_grace ──── exited ─────► Closed
//!        │ still alive
//!        ▼
//! request_interrupt() ── wait interrupt_grace ─ exited ────► Interrupted
//!        │ still alive
//!        ▼
//! kill() + reap ───────────────────────────────────────────► Killed
//! ```
//!
//! ## Rules
//! - Any step that sees the process exit short-circuits the rest.
//! - Step timeouts are expected escalation triggers, not errors (`debug!` only).
//! - Request and wait errors are logged and treated as "still alive", so the
//!   escalation always reaches a terminal outcome.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::SupervisorConfig;
use crate::process::ProcessHandle;

/// Bounded waits used by the two cooperative steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationGrace {
    /// Wait after the polite close request.
    pub close: Duration,
    /// Wait after the interrupt request.
    pub interrupt: Duration,
}

impl From<&SupervisorConfig> for EscalationGrace {
    fn from(cfg: &SupervisorConfig) -> Self {
        Self {
            close: cfg.close_grace,
            interrupt: cfg.interrupt_grace,
        }
    }
}

/// Which step ended the child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    /// The child had exited before the escalation started.
    AlreadyExited,
    /// Exited after the polite close request.
    Closed,
    /// Exited after the interrupt request.
    Interrupted,
    /// Forcibly terminated.
    Killed,
}

impl Escalation {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Escalation::AlreadyExited => "already_exited",
            Escalation::Closed => "closed",
            Escalation::Interrupted => "interrupted",
            Escalation::Killed => "killed",
        }
    }

    /// True if the final, forceful step was needed.
    #[inline]
    pub fn was_forced(&self) -> bool {
        matches!(self, Escalation::Killed)
    }
}

/// Runs the escalation against `handle` until the child is gone.
pub async fn escalate(handle: &mut ProcessHandle, grace: EscalationGrace) -> Escalation {
    let pid = handle.pid();

    if let Ok(Some(status)) = handle.try_exited() {
        debug!(pid, %status, "child already exited before shutdown");
        return Escalation::AlreadyExited;
    }

    if let Err(err) = handle.request_close() {
        warn!(pid, %err, "close request failed");
    }
    if exited_within(handle, grace.close).await {
        return Escalation::Closed;
    }
    debug!(pid, grace = ?grace.close, "child ignored close request");

    if let Err(err) = handle.request_interrupt() {
        warn!(pid, %err, "interrupt request failed");
    }
    if exited_within(handle, grace.interrupt).await {
        return Escalation::Interrupted;
    }
    debug!(pid, grace = ?grace.interrupt, "child ignored interrupt request");

    if let Err(err) = handle.kill().await {
        warn!(pid, %err, "forced termination reported an error");
    }
    Escalation::Killed
}

async fn exited_within(handle: &mut ProcessHandle, limit: Duration) -> bool {
    match handle.wait_timeout(limit).await {
        Ok(Some(status)) => {
            debug!(pid = handle.pid(), %status, "child exited");
            true
        }
        Ok(None) => false,
        Err(err) => {
            warn!(pid = handle.pid(), %err, "waiting for child exit failed");
            false
        }
    }
}
