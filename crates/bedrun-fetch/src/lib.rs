//! HTTP downloading for the launcher.
//!
//! A download streams to a `.part` file next to its destination and is
//! renamed into place only after validation (minimum size, optional
//! SHA-256), so an interrupted transfer never clobbers an existing file.
//! Each URL is retried with exponential backoff; mirrors are tried in
//! priority order.

pub use client::ClientSetting;
pub use error::{Error, Result};
pub use fetch::{Fetcher, fetch_first};
pub use options::{FetchOptions, Progress, ProgressFn};
pub use retry::retry_delay;
pub use verify::sha256_of;

mod client;
mod error;
mod fetch;
mod options;
mod retry;
mod verify;
