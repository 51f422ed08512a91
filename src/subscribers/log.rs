//! # LogWriter: simple event logger
//!
//! A minimal subscriber that writes incoming [`Event`]s through `tracing`.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! INFO childvisor: [state] state=running pid=Some(4242)
//! INFO childvisor: [flash] state=cannot_start
//! ERROR childvisor: [launch-failed] title="Error starting process" err="failed to spawn ..."
//! ```

use async_trait::async_trait;
use tracing::{error, info};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::StateChanged => {
                info!(target: "childvisor", "[state] state={} pid={:?}", e.state, e.pid);
            }
            EventKind::Flash => {
                info!(target: "childvisor", "[flash] state={}", e.state);
            }
            EventKind::LaunchFailed => {
                error!(
                    target: "childvisor",
                    "[launch-failed] title={:?} msg={:?} err={:?}",
                    e.title.as_deref().unwrap_or("unknown"),
                    e.reason.as_deref().unwrap_or("unknown"),
                    e.error.as_deref().unwrap_or("unknown"),
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
