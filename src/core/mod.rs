//! Runtime core: the supervisor loop and its wiring.
//!
//! The public API from this module is [`Supervisor`], its
//! [`SupervisorBuilder`], and the [`stop_on_signal`] host helper.
//!
//! Internal modules:
//! - [`supervisor`]: the loop and state machine;
//! - [`wait`]: per-state wait selection and the multiplexed wait;
//! - [`builder`]: wires config, subscribers and the command channel;
//! - [`shutdown`]: cross-platform termination signal bridge.

mod builder;
mod shutdown;
mod supervisor;
mod wait;

pub use builder::SupervisorBuilder;
pub use shutdown::{stop_on_signal, wait_for_shutdown_signal};
pub use supervisor::Supervisor;
