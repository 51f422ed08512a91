//! Supervises one child from the command line.
//!
//! ```text
//! RUST_LOG=info cargo run --example run_child --features logging -- sleep 60
//! ```
//!
//! Ctrl-C stops the child (escalating if needed) and exits.

use std::sync::Arc;

use childvisor::{Command, LogWriter, Supervisor, SupervisorConfig, stop_on_signal};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut argv = std::env::args().skip(1);
    let program = argv.next().unwrap_or_else(|| "sleep".to_string());
    let args = argv.collect::<Vec<_>>().join(" ");

    let cfg = SupervisorConfig::new(program, args);
    let (sup, commands) = Supervisor::builder(cfg)
        .with_subscriber(Arc::new(LogWriter::new()))
        .build();

    commands.send(Command::Start)?;
    tokio::spawn(stop_on_signal(commands.clone()));

    sup.run().await?;
    Ok(())
}
