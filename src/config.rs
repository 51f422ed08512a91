//! # Supervisor configuration.
//!
//! Provides [`SupervisorConfig`], the settings of one supervisor: which
//! program to launch and the timing of the flash cadence and of each shutdown
//! escalation step.
//!
//! Resolving the executable path (config files, registry, environment) is the
//! host's job; the supervisor receives an already resolved path and reports a
//! bad one as a launch failure.
//!
//! ## Sentinel values
//! - `flash_interval = 0s` → clamped to 1 ms (a zero timeout would spin)
//! - `close_grace = 0s` / `interrupt_grace = 0s` → the step sends its request and
//!   moves on without waiting

use std::path::PathBuf;
use std::time::Duration;

/// How the supervisor decides that a freshly spawned child is ready.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Readiness {
    /// Ready as soon as spawn succeeds.
    #[default]
    Immediate,
    /// Ready after the child has been given this long to settle.
    Settle(Duration),
}

/// Configuration for one supervisor.
///
/// ## Field semantics
/// - `program`: executable or interpreter to launch
/// - `args`: single argument string appended to the command line
/// - `flash_interval`: notification cadence while in `CannotStart`
/// - `close_grace`: wait after the polite close request (escalation step 2)
/// - `interrupt_grace`: wait after the interrupt request (escalation step 3)
/// - `readiness`: readiness policy applied after a successful spawn
///
/// ## Notes
/// All fields are public for flexibility. Prefer the helper accessors to avoid
/// sprinkling sentinel checks across the codebase.
#[derive(Clone, Debug)]
pub struct SupervisorConfig {
    /// Path of the executable (or interpreter) to launch.
    pub program: PathBuf,

    /// Argument string; passed to the child split on whitespace.
    pub args: String,

    /// Interval between flash notifications while the child cannot start.
    pub flash_interval: Duration,

    /// Maximum wait for the child to exit after the polite close request.
    pub close_grace: Duration,

    /// Maximum wait for the child to exit after the interrupt request.
    pub interrupt_grace: Duration,

    /// Readiness policy applied after spawn.
    pub readiness: Readiness,
}

impl SupervisorConfig {
    /// Creates a config for `program args` with default timings.
    pub fn new(program: impl Into<PathBuf>, args: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: args.into(),
            ..Self::default()
        }
    }

    /// Returns the command line as configured: `program + " " + args`.
    ///
    /// Used for logs and error reports; the child receives `args` split on
    /// whitespace.
    pub fn command_line(&self) -> String {
        let program = self.program.display().to_string();
        if self.args.trim().is_empty() {
            program
        } else {
            format!("{program} {}", self.args)
        }
    }

    /// Returns the arguments passed to the child.
    pub fn arg_list(&self) -> impl Iterator<Item = &str> {
        self.args.split_whitespace()
    }

    /// Returns the flash interval clamped to at least 1 ms.
    #[inline]
    pub fn flash_interval_clamped(&self) -> Duration {
        self.flash_interval.max(Duration::from_millis(1))
    }

    /// Returns the sum of both cooperative escalation waits.
    ///
    /// An unresponsive child is force-killed no earlier than this after the
    /// escalation starts.
    #[inline]
    pub fn cooperative_budget(&self) -> Duration {
        self.close_grace + self.interrupt_grace
    }
}

impl Default for SupervisorConfig {
    /// Default configuration:
    ///
    /// - `program = ""`, `args = ""` (must be set by the host)
    /// - `flash_interval = 500ms`
    /// - `close_grace = 5000ms`
    /// - `interrupt_grace = 2500ms`
    /// - `readiness = Readiness::Immediate`
    fn default() -> Self {
        Self {
            program: PathBuf::new(),
            args: String::new(),
            flash_interval: Duration::from_millis(500),
            close_grace: Duration::from_millis(5000),
            interrupt_grace: Duration::from_millis(2500),
            readiness: Readiness::default(),
        }
    }
}
