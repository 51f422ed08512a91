//! Supervisor commands and the channel that carries them.
//!
//! ## Contents
//! - [`Command`] the values a host can send
//! - [`CommandSender`] / [`CommandReceiver`] thin wrappers over an unbounded
//!   `tokio::sync::mpsc` channel (many producers, one consumer: the loop)

mod channel;
mod command;

pub use channel::{CommandReceiver, CommandSender, SendError, command_channel};
pub use command::Command;
