//! Error types used by the childvisor runtime.
//!
//! This module defines two enums:
//!
//! - [`RuntimeError`]: errors that end the supervisor loop itself.
//! - [`LaunchError`]: failures to spawn the child; absorbed by the loop
//!   (state becomes `CannotStart`) and surfaced as a `LaunchFailed` event.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logs.

use std::io;

use thiserror::Error;

/// Title of the user-facing launch failure report.
pub const LAUNCH_FAILURE_TITLE: &str = "Error starting process";

/// Body of the user-facing launch failure report.
pub const LAUNCH_FAILURE_MESSAGE: &str = "Couldn't start the child process,\n\
     make sure the configuration points at a valid executable";

/// # Errors that terminate the supervisor loop.
///
/// The loop exits immediately and leaves state as last observed; it does not
/// attempt to stop the child first.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Waiting on the child's liveness primitive failed.
    #[error("waiting on child pid={pid:?} failed: {source}")]
    WaitFailed {
        /// Pid of the child being awaited, if known.
        pid: Option<u32>,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use childvisor::RuntimeError;
    ///
    /// let err = RuntimeError::WaitFailed { pid: None, source: std::io::Error::other("boom") };
    /// assert_eq!(err.as_label(), "runtime_wait_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::WaitFailed { .. } => "runtime_wait_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::WaitFailed { pid, source } => {
                format!("liveness wait failed (pid={pid:?}): {source}")
            }
        }
    }
}

/// # Errors produced while launching the child.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The OS refused to spawn the configured command line.
    #[error("failed to spawn `{command_line}`: {source}")]
    Spawn {
        /// `program + " " + args`, as configured.
        command_line: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            LaunchError::Spawn { .. } => "launch_spawn_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            LaunchError::Spawn {
                command_line,
                source,
            } => format!("spawn `{command_line}`: {source}"),
        }
    }

    /// Title shown to the user for this failure.
    pub fn title(&self) -> &'static str {
        LAUNCH_FAILURE_TITLE
    }

    /// Fixed, user-facing description of this failure.
    pub fn user_message(&self) -> &'static str {
        LAUNCH_FAILURE_MESSAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_error_carries_fixed_user_strings() {
        let err = LaunchError::Spawn {
            command_line: "/missing/java -jar node.jar".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(err.title(), LAUNCH_FAILURE_TITLE);
        assert!(err.user_message().starts_with("Couldn't start"));
        assert_eq!(err.as_label(), "launch_spawn_failed");
        assert!(err.as_message().contains("/missing/java -jar node.jar"));
    }

    #[test]
    fn wait_failed_mentions_pid() {
        let err = RuntimeError::WaitFailed {
            pid: Some(7),
            source: io::Error::other("bad handle"),
        };
        assert!(err.to_string().contains("pid=Some(7)"));
        assert!(err.as_message().contains("bad handle"));
    }
}
