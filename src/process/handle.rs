//! # Owned handle to the supervised child.
//!
//! [`ProcessHandle`] wraps a [`tokio::process::Child`]: its pid, its liveness
//! wait, and the requests the shutdown escalator sends to it.
//!
//! ## Signals (Unix)
//! - [`ProcessHandle::request_close`] → `SIGTERM`
//! - [`ProcessHandle::request_interrupt`] → `SIGINT`
//! - [`ProcessHandle::kill`] → `SIGKILL` (via tokio) and reap
//!
//! On other platforms the two cooperative requests are no-ops; only
//! [`ProcessHandle::kill`] acts.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::config::{Readiness, SupervisorConfig};
use crate::error::LaunchError;

/// The supervised child. Dropping it releases the OS handle but does not kill
/// the process.
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    pid: u32,
}

impl ProcessHandle {
    fn new(child: Child) -> Self {
        let pid = child.id().unwrap_or(0);
        Self { child, pid }
    }

    /// OS process id recorded at spawn time.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Waits until the child exits and reaps it.
    ///
    /// Cancel safe: usable as a `tokio::select!` branch.
    pub async fn wait(&mut self) -> io::Result<ExitStatus> {
        self.child.wait().await
    }

    /// Waits up to `limit` for the child to exit.
    ///
    /// Returns `Ok(None)` if it is still alive afterwards.
    pub async fn wait_timeout(&mut self, limit: Duration) -> io::Result<Option<ExitStatus>> {
        match tokio::time::timeout(limit, self.child.wait()).await {
            Ok(res) => res.map(Some),
            Err(_elapsed) => Ok(None),
        }
    }

    /// Returns the exit status if the child has already exited.
    pub fn try_exited(&mut self) -> io::Result<Option<ExitStatus>> {
        self.child.try_wait()
    }

    /// Asks the child politely to close (step 2 of the escalation).
    pub fn request_close(&self) -> io::Result<()> {
        #[cfg(unix)]
        {
            self.signal(nix::sys::signal::Signal::SIGTERM)
        }
        #[cfg(not(unix))]
        {
            Ok(())
        }
    }

    /// Asks the child to stop what it is doing (step 3 of the escalation).
    pub fn request_interrupt(&self) -> io::Result<()> {
        #[cfg(unix)]
        {
            self.signal(nix::sys::signal::Signal::SIGINT)
        }
        #[cfg(not(unix))]
        {
            Ok(())
        }
    }

    /// Forcibly terminates the child and waits for it to be reaped.
    pub async fn kill(&mut self) -> io::Result<()> {
        self.child.kill().await
    }

    #[cfg(unix)]
    fn signal(&self, sig: nix::sys::signal::Signal) -> io::Result<()> {
        use nix::errno::Errno;
        use nix::sys::signal::kill;
        use nix::unistd::Pid;

        let pid = i32::try_from(self.pid).map_err(|_| io::Error::other("pid out of range"))?;
        match kill(Pid::from_raw(pid), sig) {
            // Already gone; the following wait observes the exit.
            Ok(()) | Err(Errno::ESRCH) => Ok(()),
            Err(errno) => Err(io::Error::from(errno)),
        }
    }
}

/// Spawns the configured child hidden and waits for it to become ready.
///
/// The child gets null stdio, normal priority, and (on Windows) no console
/// window. Readiness follows [`SupervisorConfig::readiness`]; a child that
/// exits while settling is still returned, the caller's liveness wait observes
/// the exit.
pub async fn launch(cfg: &SupervisorConfig) -> Result<ProcessHandle, LaunchError> {
    let command_line = cfg.command_line();

    let mut cmd = Command::new(&cfg.program);
    cmd.args(cfg.arg_list())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(false);
    #[cfg(windows)]
    {
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }

    let child = cmd.spawn().map_err(|source| LaunchError::Spawn {
        command_line: command_line.clone(),
        source,
    })?;
    let mut handle = ProcessHandle::new(child);
    debug!(pid = handle.pid, %command_line, "child spawned");

    if let Readiness::Settle(period) = cfg.readiness {
        if let Ok(Some(status)) = handle.wait_timeout(period).await {
            debug!(pid = handle.pid, %status, "child exited while settling");
        }
    }

    info!(pid = handle.pid, %command_line, "child ready");
    Ok(handle)
}
