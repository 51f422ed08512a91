//! # Wait selection for the supervisor loop.
//!
//! Each iteration the loop derives a [`WaitPolicy`] from its current state and
//! blocks in [`next_wake`] until one of the selected sources fires:
//!
//! | State                           | Awaited                   | Timeout        |
//! |---------------------------------|---------------------------|----------------|
//! | Running                         | child exit OR next command| none           |
//! | CannotStart                     | next command              | flash interval |
//! | Stopping / Restarting / Stopped | next command              | none           |
//!
//! Commands win ties (`biased` select): a command that is already queued is
//! applied before a simultaneous child exit or timer tick.

use std::future::pending;
use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use crate::commands::{Command, CommandReceiver};
use crate::process::ProcessHandle;
use crate::state::SupervisorState;

/// What the loop waits on in one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WaitPolicy {
    /// Wake when the child exits.
    pub watch_child: bool,
    /// Wake with [`Wake::Tick`] after this long without a command.
    pub timeout: Option<Duration>,
}

/// Computes the wait policy for `state`.
pub(crate) fn wait_policy(state: SupervisorState, flash_interval: Duration) -> WaitPolicy {
    match state {
        SupervisorState::Running => WaitPolicy {
            watch_child: true,
            timeout: None,
        },
        SupervisorState::CannotStart => WaitPolicy {
            watch_child: false,
            timeout: Some(flash_interval),
        },
        SupervisorState::Stopping | SupervisorState::Restarting | SupervisorState::Stopped => {
            WaitPolicy {
                watch_child: false,
                timeout: None,
            }
        }
    }
}

/// Why the loop woke up.
#[derive(Debug)]
pub(crate) enum Wake {
    /// A command arrived.
    Command(Command),
    /// Every sender is gone; no command can arrive any more.
    Closed,
    /// The watched child exited.
    Exited(ExitStatus),
    /// The timeout elapsed.
    Tick,
    /// The liveness wait failed.
    Failed(io::Error),
}

/// Blocks until a source selected by `policy` fires.
pub(crate) async fn next_wake(
    policy: WaitPolicy,
    commands: &mut CommandReceiver,
    child: Option<&mut ProcessHandle>,
) -> Wake {
    let liveness = async move {
        match child.filter(|_| policy.watch_child) {
            Some(handle) => match handle.wait().await {
                Ok(status) => Wake::Exited(status),
                Err(err) => Wake::Failed(err),
            },
            None => pending::<Wake>().await,
        }
    };
    let tick = async move {
        match policy.timeout {
            Some(d) => {
                tokio::time::sleep(d).await;
                Wake::Tick
            }
            None => pending::<Wake>().await,
        }
    };

    tokio::select! {
        biased;
        cmd = commands.recv() => match cmd {
            Some(cmd) => Wake::Command(cmd),
            None => Wake::Closed,
        },
        wake = liveness => wake,
        wake = tick => wake,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::commands::command_channel;

    const FLASH: Duration = Duration::from_millis(500);

    #[test]
    fn running_watches_child_without_timeout() {
        let p = wait_policy(SupervisorState::Running, FLASH);
        assert!(p.watch_child);
        assert_eq!(p.timeout, None);
    }

    #[test]
    fn cannot_start_polls_at_flash_interval() {
        let p = wait_policy(SupervisorState::CannotStart, FLASH);
        assert!(!p.watch_child);
        assert_eq!(p.timeout, Some(FLASH));
    }

    #[test]
    fn idle_states_wait_for_commands_only() {
        for state in [
            SupervisorState::Stopping,
            SupervisorState::Restarting,
            SupervisorState::Stopped,
        ] {
            let p = wait_policy(state, FLASH);
            assert!(!p.watch_child);
            assert_eq!(p.timeout, None);
        }
    }

    #[tokio::test]
    async fn queued_command_wins_over_tick() {
        let (tx, mut rx) = command_channel();
        tx.send(Command::Probe).unwrap();
        let policy = WaitPolicy {
            watch_child: false,
            timeout: Some(Duration::ZERO),
        };

        let wake = next_wake(policy, &mut rx, None).await;
        assert!(matches!(wake, Wake::Command(Command::Probe)));
    }

    #[tokio::test]
    async fn tick_fires_after_timeout() {
        let (_tx, mut rx) = command_channel();
        let policy = wait_policy(SupervisorState::CannotStart, Duration::from_millis(40));

        let started = Instant::now();
        let wake = next_wake(policy, &mut rx, None).await;
        assert!(matches!(wake, Wake::Tick));
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn closed_channel_is_reported() {
        let (tx, mut rx) = command_channel();
        drop(tx);
        let policy = wait_policy(SupervisorState::Stopped, FLASH);

        let wake = next_wake(policy, &mut rx, None).await;
        assert!(matches!(wake, Wake::Closed));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn child_exit_wakes_running_loop() {
        let (_tx, mut rx) = command_channel();
        let cfg = crate::SupervisorConfig::new("true", "");
        let mut handle = crate::process::launch(&cfg).await.unwrap();
        let policy = wait_policy(SupervisorState::Running, FLASH);

        let wake = next_wake(policy, &mut rx, Some(&mut handle)).await;
        assert!(matches!(wake, Wake::Exited(status) if status.success()));
    }
}
