//! Child process primitives.
//!
//! Internal modules:
//! - [`handle`]: the owned [`ProcessHandle`] plus launch and signal primitives;
//! - [`escalate`]: the three-step graceful-then-forceful shutdown.

mod escalate;
mod handle;

pub use escalate::{Escalation, EscalationGrace, escalate};
pub use handle::{ProcessHandle, launch};
