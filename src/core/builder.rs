use std::sync::Arc;

use tokio::sync::watch;

use super::supervisor::Supervisor;
use crate::{
    commands::{CommandSender, command_channel},
    config::SupervisorConfig,
    state::Status,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a [`Supervisor`].
pub struct SupervisorBuilder {
    cfg: SupervisorConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SupervisorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: SupervisorConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets the notification sinks.
    ///
    /// Subscribers receive every transition and flash tick through dedicated
    /// workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds one notification sink.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds the supervisor and the first sender of its command channel.
    ///
    /// Must be called inside a tokio runtime (subscriber workers are spawned here).
    /// The supervisor starts in `Stopped`; nothing is launched until a `Start`
    /// command arrives.
    pub fn build(self) -> (Supervisor, CommandSender) {
        let (tx, rx) = command_channel();
        let (status_tx, _status_rx) = watch::channel(Status::default());
        let subs = SubscriberSet::new(self.subscribers);

        let sup = Supervisor::new_internal(self.cfg, rx, status_tx, subs);
        (sup, tx)
    }
}
