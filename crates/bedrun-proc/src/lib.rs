//! Child-process lifecycle for the launcher.
//!
//! Both the dedicated server and the tunnel run as supervised children
//! with piped stdio. Their output is streamed line-by-line into `tracing`,
//! and teardown is always graceful-then-forced: SIGTERM, a bounded grace
//! wait, then SIGKILL.

pub use error::{Error, Result};
pub use signal::shutdown_signal;
pub use supervisor::{ServerHandle, StopOutcome, StopPlan, spawn_server};
pub use tunnel::{TunnelHandle, TunnelSpec, spawn_tunnel};

mod child;
mod error;
mod signal;
mod supervisor;
mod tunnel;
