//! Core primitives shared by the fstree crates.
//!
//! - [`Signal`]: synchronous observer list used for change notification
//! - [`logging`]: tracing targets, span names and [`PerfSpan`]

pub mod logging;
pub mod signal;

pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
