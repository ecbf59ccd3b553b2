//! Upstream gateway subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher (resolved URL + query)
//!     → client.rs (pooled GET, timeouts, bearer token)
//!     → error.rs (transport / status / payload classification)
//!     → JSON value back to the dispatcher
//! ```
//!
//! # Design Decisions
//! - One pool per process, created at startup and injected explicitly
//! - Timeouts are enforced by the pool, not by callers
//! - No retries: every failure surfaces immediately

pub mod client;
pub mod error;

pub use client::{UpstreamClient, UpstreamResponse};
pub use error::{UpstreamError, UpstreamResult};
