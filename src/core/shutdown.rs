//! # Cross-platform OS signal handling.
//!
//! Provides [`wait_for_shutdown_signal`], an async helper that completes when the
//! host process receives a termination signal, and [`stop_on_signal`], which
//! turns that signal into an orderly `Stop` + `Quit` for the supervisor.
//!
//! ## Signals
//! **Unix platforms:**
//! - `SIGINT` (Ctrl-C in terminal)
//! - `SIGTERM` (default kill signal, used by systemd/Kubernetes)
//! - `SIGQUIT` (quit signal, often used for core dumps or hard stop)
//!
//! **Windows platforms:**
//! - `Ctrl-C` via [`tokio::signal::ctrl_c`]

use tracing::info;

use crate::commands::{Command, CommandSender};

/// Waits for a termination signal.
///
/// Each call creates independent signal listeners.
///
/// Returns `Ok(())` when any signal is received, or `Err` if signal registration fails.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = sigint.recv()  => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

/// Waits for a termination signal.
///
/// Each call creates independent signal listeners.
///
/// Returns `Ok(())` when any signal is received, or `Err` if signal registration fails.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

/// Waits for a termination signal, then asks the supervisor to stop its child
/// and exit.
///
/// `Stop` and `Quit` go through the same sender, so the loop applies them in
/// that order within one batch. Send errors (supervisor already gone) are ignored.
pub async fn stop_on_signal(sender: CommandSender) -> std::io::Result<()> {
    wait_for_shutdown_signal().await?;
    info!("termination signal received; stopping supervised child");

    let _ = sender.send(Command::Stop);
    let _ = sender.send(Command::Quit);
    Ok(())
}
