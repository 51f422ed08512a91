//! # Event fan-out to multiple subscribers.
//!
//! [`SubscriberSet`] distributes each [`Event`] to every subscriber without
//! awaiting their processing. Enqueueing only waits when a subscriber's queue
//! is full of transitions.
//!
//! ## Architecture
//! ```text
//! emit(event)
//!     │
//!     ├──► [queue 1] ──► worker 1 ──► subscriber1.on_event()
//!     │    (bounded)         └──────► panic → warn! log
//!     └──► [queue N] ──► worker N ──► subscriberN.on_event()
//! ```
//!
//! ## Rules
//! - **Per-subscriber FIFO**: each subscriber sees events in emit order
//! - **No cross-subscriber ordering**
//! - **Flash coalescing**: at most one `Flash` tick waits in a queue; later
//!   ticks are skipped until the worker picks it up
//! - **No lost transitions**: `StateChanged` and `LaunchFailed` are never
//!   dropped; on a full queue `emit` waits for room (logged with `warn!`)
//! - **Isolation**: a panicking subscriber keeps receiving later events
//! - **Flush on shutdown**: [`SubscriberSet::shutdown`] waits until every queued
//!   event has been handled
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if subscriber uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{trace, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Per-subscriber channel metadata.
struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
    /// Set while a `Flash` tick sits in the queue.
    flash_queued: Arc<AtomicBool>,
}

impl SubscriberChannel {
    fn offer_flash(&self, event: &Arc<Event>) {
        if self.flash_queued.swap(true, Ordering::AcqRel) {
            trace!(subscriber = self.name, seq = event.seq, "flash coalesced");
            return;
        }
        if let Err(err) = self.sender.try_send(Arc::clone(event)) {
            self.flash_queued.store(false, Ordering::Release);
            let reason = match err {
                mpsc::error::TrySendError::Full(_) => "queue full",
                mpsc::error::TrySendError::Closed(_) => "worker closed",
            };
            warn!(subscriber = self.name, seq = event.seq, reason, "subscriber skipped flash");
        }
    }

    async fn deliver(&self, event: &Arc<Event>) {
        let pending = match self.sender.try_send(Arc::clone(event)) {
            Ok(()) => return,
            Err(mpsc::error::TrySendError::Full(ev)) => ev,
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!(subscriber = self.name, seq = event.seq, "subscriber dropped event: worker closed");
                return;
            }
        };
        warn!(subscriber = self.name, seq = event.seq, "subscriber queue full: waiting for room");
        if self.sender.send(pending).await.is_err() {
            warn!(subscriber = self.name, seq = event.seq, "subscriber dropped event: worker closed");
        }
    }
}

/// Fan-out coordinator for notification sinks.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker task per subscriber.
    ///
    /// Must be called inside a tokio runtime.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);
            let s = Arc::clone(&sub);
            let flash_queued = Arc::new(AtomicBool::new(false));
            let worker_flash = Arc::clone(&flash_queued);

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    if ev.kind == EventKind::Flash {
                        worker_flash.store(false, Ordering::Release);
                    }
                    let fut = s.on_event(ev.as_ref());

                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        let info = {
                            let any = &*panic_err;
                            if let Some(msg) = any.downcast_ref::<&'static str>() {
                                (*msg).to_string()
                            } else if let Some(msg) = any.downcast_ref::<String>() {
                                msg.clone()
                            } else {
                                "unknown panic".to_string()
                            }
                        };
                        warn!(subscriber = s.name(), seq = ev.seq, %info, "subscriber panicked");
                    }
                }
            });
            channels.push(SubscriberChannel {
                name,
                sender: tx,
                flash_queued,
            });
            workers.push(handle);
        }
        Self { channels, workers }
    }

    /// Emits an event to all subscribers.
    ///
    /// Flash ticks are coalesced per subscriber and never wait. Transitions
    /// and launch reports wait for queue room instead of being dropped.
    pub async fn emit(&self, event: Event) {
        let event = Arc::new(event);
        for channel in &self.channels {
            if event.kind == EventKind::Flash {
                channel.offer_flash(&event);
            } else {
                channel.deliver(&event).await;
            }
        }
    }

    /// Closes all queues and waits for the workers to drain them.
    pub async fn shutdown(self) {
        drop(self.channels);

        for h in self.workers {
            let _ = h.await;
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::state::SupervisorState;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<u64>>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, ev: &Event) {
            self.seen.lock().unwrap().push(ev.seq);
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    struct Panicker;

    #[async_trait]
    impl Subscribe for Panicker {
        async fn on_event(&self, ev: &Event) {
            if ev.state == SupervisorState::CannotStart {
                panic!("boom");
            }
        }
    }

    #[tokio::test]
    async fn delivers_in_emit_order_and_flushes_on_shutdown() {
        let rec = Arc::new(Recorder::default());
        let set = SubscriberSet::new(vec![rec.clone() as Arc<dyn Subscribe>]);
        assert_eq!(set.len(), 1);

        let events: Vec<Event> = (0..10)
            .map(|_| Event::state_changed(SupervisorState::Stopped, None))
            .collect();
        let expected: Vec<u64> = events.iter().map(|e| e.seq).collect();
        for ev in events {
            set.emit(ev).await;
        }
        set.shutdown().await;

        assert_eq!(*rec.seen.lock().unwrap(), expected);
    }

    #[tokio::test]
    async fn panicking_subscriber_is_isolated() {
        let rec = Arc::new(Recorder::default());
        let set = SubscriberSet::new(vec![
            Arc::new(Panicker) as Arc<dyn Subscribe>,
            rec.clone() as Arc<dyn Subscribe>,
        ]);

        set.emit(Event::flash()).await;
        set.emit(Event::state_changed(SupervisorState::Stopped, None)).await;
        set.shutdown().await;

        assert_eq!(rec.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn empty_set_accepts_events() {
        let set = SubscriberSet::new(Vec::new());
        assert!(set.is_empty());
        set.emit(Event::flash()).await;
        set.shutdown().await;
    }

    /// Blocks inside `on_event` for `LaunchFailed` until released, like a
    /// sink that shows a modal error dialog.
    struct DialogSink {
        kinds: Mutex<Vec<EventKind>>,
        states: Mutex<Vec<SupervisorState>>,
        release: tokio::sync::Semaphore,
        capacity: usize,
    }

    impl DialogSink {
        fn new(capacity: usize) -> Self {
            Self {
                kinds: Mutex::new(Vec::new()),
                states: Mutex::new(Vec::new()),
                release: tokio::sync::Semaphore::new(0),
                capacity,
            }
        }
    }

    #[async_trait]
    impl Subscribe for DialogSink {
        async fn on_event(&self, ev: &Event) {
            self.kinds.lock().unwrap().push(ev.kind);
            if ev.kind == EventKind::StateChanged {
                self.states.lock().unwrap().push(ev.state);
            }
            if ev.kind == EventKind::LaunchFailed {
                let _ = self.release.acquire().await;
            }
        }

        fn name(&self) -> &'static str {
            "dialog"
        }

        fn queue_capacity(&self) -> usize {
            self.capacity
        }
    }

    #[tokio::test]
    async fn blocked_subscriber_keeps_transitions_and_coalesces_flashes() {
        let sink = Arc::new(DialogSink::new(4));
        let set = SubscriberSet::new(vec![sink.clone() as Arc<dyn Subscribe>]);

        let err = crate::error::LaunchError::Spawn {
            command_line: "/missing".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        set.emit(Event::launch_failed(&err)).await;
        set.emit(Event::state_changed(SupervisorState::CannotStart, None))
            .await;
        // Let the worker pick up the report and block on it.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        for _ in 0..500 {
            set.emit(Event::flash()).await;
        }
        set.emit(Event::state_changed(SupervisorState::Stopped, None))
            .await;

        sink.release.add_permits(1);
        set.shutdown().await;

        assert_eq!(
            *sink.states.lock().unwrap(),
            vec![SupervisorState::CannotStart, SupervisorState::Stopped]
        );
        let flashes = sink
            .kinds
            .lock()
            .unwrap()
            .iter()
            .filter(|k| **k == EventKind::Flash)
            .count();
        assert_eq!(flashes, 1);
    }

    #[tokio::test]
    async fn full_queue_waits_instead_of_dropping_transitions() {
        let sink = Arc::new(DialogSink::new(1));
        let set = SubscriberSet::new(vec![sink.clone() as Arc<dyn Subscribe>]);

        let err = crate::error::LaunchError::Spawn {
            command_line: "/missing".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        set.emit(Event::launch_failed(&err)).await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let releaser = {
            let sink = Arc::clone(&sink);
            tokio::spawn(async move {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                sink.release.add_permits(1);
            })
        };
        for state in [
            SupervisorState::CannotStart,
            SupervisorState::Stopped,
            SupervisorState::Running,
        ] {
            set.emit(Event::state_changed(state, None)).await;
        }
        set.shutdown().await;
        releaser.await.unwrap();

        assert_eq!(
            *sink.states.lock().unwrap(),
            vec![
                SupervisorState::CannotStart,
                SupervisorState::Stopped,
                SupervisorState::Running,
            ]
        );
    }
}
