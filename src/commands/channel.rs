//! # Command channel between hosts and the supervisor loop.
//!
//! ## Architecture
//! ```text
//! Producers (many):                      Consumer (one):
//!   UI thread   ──┐
//!   signal task ──┼──► CommandSender ──► CommandReceiver ──► Supervisor loop
//!   anything    ──┘   (unbounded mpsc)
//! ```
//!
//! ## Rules
//! - **Non-blocking send**: `send()` never waits; the queue is unbounded.
//! - **FIFO per producer**: commands from one sender arrive in send order.
//!   Ordering across different senders is not defined.
//! - **Closed channel**: once the loop has exited, `send()` returns the
//!   rejected command in [`SendError`].

use tokio::sync::mpsc;

use super::Command;

pub use mpsc::error::SendError;

/// Creates a connected sender/receiver pair.
pub fn command_channel() -> (CommandSender, CommandReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CommandSender { tx }, CommandReceiver { rx })
}

/// Producer side of the command channel.
///
/// Cheap to clone; each clone is an independent producer.
#[derive(Clone, Debug)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<Command>,
}

impl CommandSender {
    /// Enqueues a command for the supervisor loop.
    pub fn send(&self, cmd: Command) -> Result<(), SendError<Command>> {
        self.tx.send(cmd)
    }

    /// True once the supervisor loop has exited and dropped its receiver.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side of the command channel, owned by the supervisor loop.
#[derive(Debug)]
pub struct CommandReceiver {
    rx: mpsc::UnboundedReceiver<Command>,
}

impl CommandReceiver {
    /// Waits for the next command. `None` means every sender is gone.
    ///
    /// Cancel safe: usable as a `tokio::select!` branch.
    pub async fn recv(&mut self) -> Option<Command> {
        self.rx.recv().await
    }

    /// Takes the next already-queued command without waiting.
    pub fn try_recv(&mut self) -> Option<Command> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn preserves_order_for_one_producer() {
        let (tx, mut rx) = command_channel();
        tx.send(Command::Start).unwrap();
        tx.send(Command::Probe).unwrap();
        tx.send(Command::Stop).unwrap();

        assert_eq!(rx.recv().await, Some(Command::Start));
        assert_eq!(rx.try_recv(), Some(Command::Probe));
        assert_eq!(rx.try_recv(), Some(Command::Stop));
        assert_eq!(rx.try_recv(), None);
    }

    #[tokio::test]
    async fn recv_reports_closed_when_senders_dropped() {
        let (tx, mut rx) = command_channel();
        let other = tx.clone();
        other.send(Command::Quit).unwrap();
        drop(tx);
        drop(other);

        assert_eq!(rx.recv().await, Some(Command::Quit));
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn send_fails_after_receiver_dropped() {
        let (tx, rx) = command_channel();
        drop(rx);

        assert!(tx.is_closed());
        let err = tx.send(Command::Stop).unwrap_err();
        assert_eq!(err.0, Command::Stop);
    }

    #[test]
    fn senders_from_many_threads() {
        let (tx, mut rx) = command_channel();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let tx = tx.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        tx.send(Command::Probe).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let mut n = 0;
        while rx.try_recv().is_some() {
            n += 1;
        }
        assert_eq!(n, 100);
    }
}
