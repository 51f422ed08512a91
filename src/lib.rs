//! # childvisor
//!
//! **Childvisor** supervises a single long-running child process on behalf of
//! a host application.
//!
//! It launches the process, notices whether it started, watches it for
//! unexpected termination, and on request drives an orderly shutdown that
//! escalates from a polite close request to forced termination. It reports
//! every state change to subscribers and leaves restart decisions to the host.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   host threads (UI, signal handler, ...)
//!        │ CommandSender::send(Start | Stop | Restart | Quit | Probe)
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Supervisor loop (one task, sole owner of state + child)          │
//! │  - wait_policy(state) → child exit? command? flash timeout?       │
//! │  - launch()       → Running | CannotStart                         │
//! │  - escalate()     → Stopping|Restarting → Stopped                 │
//! │  - set_state()    → watch::Sender<Status> → StateView snapshots   │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                │ Event (after the state update)
//!                                ▼
//!                       ┌─────────────────┐
//!                       │  SubscriberSet  │
//!                       └───┬─────────┬───┘
//!                           ▼         ▼
//!                     tray icon    LogWriter ...
//! ```
//!
//! ### Shutdown escalation
//! ```text
//! close request (SIGTERM) ── 5000ms ──► interrupt (SIGINT) ── 2500ms ──► kill
//!        └── exited: done              └── exited: done
//! ```
//!
//! ## Features
//! | Area              | Description                                        | Key types / traits                        |
//! |-------------------|----------------------------------------------------|-------------------------------------------|
//! | **Supervision**   | Loop, state machine, launch and escalation.        | [`Supervisor`], [`SupervisorState`]       |
//! | **Commands**      | Thread-safe inbox for host requests.               | [`Command`], [`CommandSender`]            |
//! | **Notifications** | Transition/flash events for indicators and logs.   | [`Subscribe`], [`Event`], [`EventKind`]   |
//! | **State**         | Stale-by-design snapshots for external readers.    | [`StateView`], [`Status`]                 |
//! | **Errors**        | Typed errors for the loop and for launching.       | [`RuntimeError`], [`LaunchError`]         |
//! | **Configuration** | Program, arguments and escalation timings.         | [`SupervisorConfig`], [`Readiness`]       |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust,no_run
//! use childvisor::{Command, Supervisor, SupervisorConfig, stop_on_signal};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = SupervisorConfig::new("/usr/bin/java", "-jar node.jar");
//!     let (sup, commands) = Supervisor::builder(cfg).build();
//!
//!     commands.send(Command::Start)?;
//!     tokio::spawn(stop_on_signal(commands.clone()));
//!
//!     sup.run().await?;
//!     Ok(())
//! }
//! ```
mod commands;
mod config;
mod core;
mod error;
mod events;
mod process;
mod state;
mod subscribers;

// ---- Public re-exports ----

pub use commands::{Command, CommandReceiver, CommandSender, SendError, command_channel};
pub use config::{Readiness, SupervisorConfig};
pub use crate::core::{Supervisor, SupervisorBuilder, stop_on_signal, wait_for_shutdown_signal};
pub use error::{LAUNCH_FAILURE_MESSAGE, LAUNCH_FAILURE_TITLE, LaunchError, RuntimeError};
pub use events::{Event, EventKind};
pub use process::{Escalation, EscalationGrace, ProcessHandle, escalate, launch};
pub use state::{StateView, Status, SupervisorState};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
