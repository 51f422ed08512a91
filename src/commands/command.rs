//! # Commands understood by the supervisor loop.

use std::fmt;

/// A request from the host to the supervisor.
///
/// Commands are consumed exactly once, in delivery order per producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Launch the child (only from `Stopped` or `CannotStart`).
    Start,
    /// Run the shutdown escalation and end in `Stopped`.
    Stop,
    /// Stop the running child (labelled `Restarting`), then launch again.
    Restart,
    /// Exit the loop once the current batch of commands has been applied.
    Quit,
    /// No-op; lets a host check that the channel is being consumed.
    Probe,
}

impl Command {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Stop => "stop",
            Command::Restart => "restart",
            Command::Quit => "quit",
            Command::Probe => "probe",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
