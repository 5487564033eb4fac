//! Logging setup shared by the binaries.
//!
//! Library crates only emit `tracing` events; installing a subscriber is the
//! job of whoever owns the process.

/// Subscriber configuration (filters, output format).
pub mod subscriber;

pub use subscriber::{LogFormat, UnknownLogFormat, init, init_with};
