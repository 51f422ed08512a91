//! # Supervisor: the control loop for one child process.
//!
//! The [`Supervisor`] is the single owner of the [`SupervisorState`] and the
//! optional [`ProcessHandle`]. Hosts talk to it only through commands; they
//! read its state only through a [`StateView`] snapshot.
//!
//! ## Key responsibilities
//! - pick what to wait on for the current state ([`wait_policy`])
//! - drain every queued command per wake, in arrival order
//! - launch the child, run the shutdown escalation, observe unexpected exits
//! - publish the new [`Status`] and then notify subscribers, for every change
//!
//! ## High-level architecture
//! ```text
//! CommandSender (any thread) ──► CommandReceiver ─┐
//!                                                 ▼
//! loop {                                    next_wake(policy)
//!   policy = wait_policy(state)                   │
//!   match wake {                                  │
//!     Command(c) → apply(c), then try_recv() until empty
//!                   ├─ Start   → launch → Running | CannotStart
//!                   ├─ Stop    → escalate → Stopping → Stopped
//!                   ├─ Restart → escalate → Restarting → Stopped → launch
//!                   ├─ Quit    → exit after this batch
//!                   └─ Probe   → nothing
//!     Exited      → drop handle → CannotStart (first flash)
//!     Tick        → Flash event (CannotStart only)
//!     Closed      → exit
//!     Failed(err) → return RuntimeError::WaitFailed
//!   }
//! }
//! on exit: SubscriberSet::shutdown() (flush queued notifications)
//! ```
//!
//! ## Rules
//! - Never two children: `Start` while a child is supervised is ignored.
//! - `Quit` is honored only after every command of its batch has run, so a
//!   `Stop` queued right before it always completes.
//! - Launch and escalation are never interrupted by later commands; those wait
//!   in the queue and are applied in the same batch.
//! - `Quit` does not stop a running child; send `Stop` first to shut it down.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use childvisor::{Command, Supervisor, SupervisorConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = SupervisorConfig::new("/usr/bin/java", "-jar node.jar");
//!     let (sup, commands) = Supervisor::builder(cfg).build();
//!     let view = sup.state_view();
//!     let task = sup.spawn();
//!
//!     commands.send(Command::Start)?;
//!     // ... later
//!     commands.send(Command::Stop)?;
//!     commands.send(Command::Quit)?;
//!     task.await??;
//!
//!     println!("final state: {}", view.snapshot().state);
//!     Ok(())
//! }
//! ```

use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, error, info, trace, warn};

use super::builder::SupervisorBuilder;
use super::wait::{Wake, next_wake, wait_policy};
use crate::{
    commands::{Command, CommandReceiver},
    config::SupervisorConfig,
    error::RuntimeError,
    events::Event,
    process::{EscalationGrace, ProcessHandle, escalate, launch},
    state::{StateView, Status, SupervisorState},
    subscribers::SubscriberSet,
};

/// Owns one child process's lifecycle and state.
pub struct Supervisor {
    cfg: SupervisorConfig,
    state: SupervisorState,
    child: Option<ProcessHandle>,
    commands: CommandReceiver,
    status_tx: watch::Sender<Status>,
    subs: SubscriberSet,
}

impl Supervisor {
    /// Returns a builder for a supervisor with the given configuration.
    pub fn builder(cfg: SupervisorConfig) -> SupervisorBuilder {
        SupervisorBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: SupervisorConfig,
        commands: CommandReceiver,
        status_tx: watch::Sender<Status>,
        subs: SubscriberSet,
    ) -> Self {
        Self {
            cfg,
            state: SupervisorState::Stopped,
            child: None,
            commands,
            status_tx,
            subs,
        }
    }

    /// Returns a read-only view of the published state.
    ///
    /// Views stay valid after the loop exits and then report the final status.
    pub fn state_view(&self) -> StateView {
        StateView::new(self.status_tx.subscribe())
    }

    /// Runs the loop on a dedicated tokio task.
    pub fn spawn(self) -> JoinHandle<Result<(), RuntimeError>> {
        tokio::spawn(self.run())
    }

    /// Runs the loop until `Quit` (or until every command sender is dropped).
    ///
    /// Returns [`RuntimeError::WaitFailed`] if waiting on the child fails; the
    /// state is then left as last observed. In every case queued notifications
    /// are delivered before this returns.
    pub async fn run(mut self) -> Result<(), RuntimeError> {
        info!(command_line = %self.cfg.command_line(), "supervisor started");
        let res = self.drive().await;
        info!(state = %self.state, "supervisor exited");

        self.subs.shutdown().await;
        res
    }

    async fn drive(&mut self) -> Result<(), RuntimeError> {
        let mut quit = false;
        while !quit {
            let policy = wait_policy(self.state, self.cfg.flash_interval_clamped());
            match next_wake(policy, &mut self.commands, self.child.as_mut()).await {
                Wake::Command(first) => quit = self.drain(first).await,
                Wake::Closed => {
                    info!("all command senders dropped");
                    quit = true;
                }
                Wake::Exited(status) => {
                    let pid = self.child.take().map(|h| h.pid());
                    warn!(?pid, %status, "child exited unexpectedly");
                    // The transition notification doubles as the first flash.
                    self.set_state(SupervisorState::CannotStart).await;
                }
                Wake::Tick => self.flash().await,
                Wake::Failed(source) => {
                    let pid = self.child.as_ref().map(ProcessHandle::pid);
                    error!(?pid, %source, "liveness wait failed; giving up");
                    return Err(RuntimeError::WaitFailed { pid, source });
                }
            }
        }
        Ok(())
    }

    /// Applies `first` and every command queued behind it. Returns `true` if
    /// one of them was `Quit`.
    async fn drain(&mut self, first: Command) -> bool {
        let mut quit = false;
        let mut next = Some(first);
        while let Some(cmd) = next {
            quit |= self.apply(cmd).await;
            next = self.commands.try_recv();
        }
        quit
    }

    async fn apply(&mut self, cmd: Command) -> bool {
        debug!(command = %cmd, state = %self.state, "applying command");
        match cmd {
            Command::Start => self.start().await,
            Command::Stop => self.stop(SupervisorState::Stopping).await,
            Command::Restart => {
                if self.child.is_some() {
                    self.stop(SupervisorState::Restarting).await;
                }
                self.start().await;
            }
            Command::Quit => return true,
            Command::Probe => trace!("probe"),
        }
        false
    }

    async fn start(&mut self) {
        if let Some(child) = &self.child {
            debug!(pid = child.pid(), "start ignored: child already supervised");
            return;
        }

        match launch(&self.cfg).await {
            Ok(handle) => {
                self.child = Some(handle);
                self.set_state(SupervisorState::Running).await;
            }
            Err(err) => {
                error!(label = err.as_label(), %err, "{}", err.user_message());
                self.subs.emit(Event::launch_failed(&err)).await;
                self.set_state(SupervisorState::CannotStart).await;
            }
        }
    }

    /// Runs the shutdown escalation. `label` is `Stopping` or `Restarting`.
    async fn stop(&mut self, label: SupervisorState) {
        if self.child.is_none() {
            if self.state == SupervisorState::Stopped {
                debug!("stop ignored: already stopped");
            } else {
                self.set_state(SupervisorState::Stopped).await;
            }
            return;
        }

        self.set_state(label).await;
        if let Some(handle) = self.child.as_mut() {
            let pid = handle.pid();
            let outcome = escalate(handle, EscalationGrace::from(&self.cfg)).await;
            info!(pid, outcome = outcome.as_label(), "child stopped");
        }
        self.child = None;
        self.set_state(SupervisorState::Stopped).await;
    }

    async fn flash(&self) {
        if self.state == SupervisorState::CannotStart {
            trace!("flash");
            self.subs.emit(Event::flash()).await;
        }
    }

    /// Updates the state, publishes the snapshot, then notifies. Always in
    /// that order. Waits only if a subscriber's queue is full.
    async fn set_state(&mut self, state: SupervisorState) {
        let pid = self.child.as_ref().map(ProcessHandle::pid);
        self.state = state;
        self.status_tx.send_replace(Status { state, pid });
        debug!(%state, ?pid, "state changed");
        self.subs.emit(Event::state_changed(state, pid)).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::events::EventKind;
    use crate::subscribers::Subscribe;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<Event>>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, ev: &Event) {
            self.events.lock().unwrap().push(ev.clone());
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    fn missing_program() -> SupervisorConfig {
        let mut cfg = SupervisorConfig::new("/definitely/not/here", "");
        cfg.flash_interval = Duration::from_millis(30);
        cfg
    }

    #[tokio::test]
    async fn probe_never_notifies() {
        let rec = Arc::new(Recorder::default());
        let (sup, tx) = Supervisor::builder(missing_program())
            .with_subscriber(rec.clone())
            .build();
        let view = sup.state_view();

        for _ in 0..5 {
            tx.send(Command::Probe).unwrap();
        }
        tx.send(Command::Quit).unwrap();
        sup.run().await.unwrap();

        assert!(rec.events.lock().unwrap().is_empty());
        assert_eq!(view.snapshot(), Status::default());
    }

    #[tokio::test]
    async fn launch_failure_reports_then_enters_cannot_start() {
        let rec = Arc::new(Recorder::default());
        let (sup, tx) = Supervisor::builder(missing_program())
            .with_subscriber(rec.clone())
            .build();
        let view = sup.state_view();

        tx.send(Command::Start).unwrap();
        tx.send(Command::Quit).unwrap();
        sup.run().await.unwrap();

        let events = rec.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::LaunchFailed);
        assert_eq!(events[0].state, SupervisorState::CannotStart);
        assert!(events[1].is_transition_to(SupervisorState::CannotStart));
        assert_eq!(events[1].pid, None);
        assert_eq!(view.snapshot().state, SupervisorState::CannotStart);
    }

    #[tokio::test]
    async fn stop_without_child_leaves_cannot_start() {
        let rec = Arc::new(Recorder::default());
        let (sup, tx) = Supervisor::builder(missing_program())
            .with_subscriber(rec.clone())
            .build();

        tx.send(Command::Start).unwrap();
        tx.send(Command::Stop).unwrap();
        tx.send(Command::Stop).unwrap();
        tx.send(Command::Quit).unwrap();
        sup.run().await.unwrap();

        let events = rec.events.lock().unwrap();
        let transitions: Vec<_> = events
            .iter()
            .filter(|e| e.kind == EventKind::StateChanged)
            .map(|e| e.state)
            .collect();
        assert_eq!(
            transitions,
            vec![SupervisorState::CannotStart, SupervisorState::Stopped]
        );
    }

    /// Holds `LaunchFailed` until released, like a sink showing a modal
    /// error dialog.
    struct DialogSink {
        events: Mutex<Vec<Event>>,
        release: tokio::sync::Semaphore,
    }

    impl DialogSink {
        fn new() -> Self {
            Self {
                events: Mutex::new(Vec::new()),
                release: tokio::sync::Semaphore::new(0),
            }
        }
    }

    #[async_trait]
    impl Subscribe for DialogSink {
        async fn on_event(&self, ev: &Event) {
            self.events.lock().unwrap().push(ev.clone());
            if ev.kind == EventKind::LaunchFailed {
                let _ = self.release.acquire().await;
            }
        }

        fn name(&self) -> &'static str {
            "dialog"
        }
    }

    #[tokio::test]
    async fn stop_is_delivered_past_a_blocked_subscriber() {
        let sink = Arc::new(DialogSink::new());
        let mut cfg = missing_program();
        cfg.flash_interval = Duration::from_millis(1);
        let (sup, tx) = Supervisor::builder(cfg)
            .with_subscriber(sink.clone())
            .build();
        let task = sup.spawn();

        tx.send(Command::Start).unwrap();
        // Far more ticks than the default queue holds.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        tx.send(Command::Stop).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        sink.release.add_permits(1);
        tx.send(Command::Quit).unwrap();
        task.await.unwrap().unwrap();

        let events = sink.events.lock().unwrap();
        let transitions: Vec<_> = events
            .iter()
            .filter(|e| e.kind == EventKind::StateChanged)
            .map(|e| e.state)
            .collect();
        assert_eq!(
            transitions,
            vec![SupervisorState::CannotStart, SupervisorState::Stopped]
        );
        let flashes = events.iter().filter(|e| e.kind == EventKind::Flash).count();
        assert!(flashes <= 2, "flashes were not coalesced: {flashes}");
    }

    #[tokio::test]
    async fn dropping_all_senders_ends_loop() {
        let (sup, tx) = Supervisor::builder(missing_program()).build();
        drop(tx);
        sup.run().await.unwrap();
    }
}
