//! Typed client for the transit proxy's JSON endpoints.

pub mod client;

pub use client::{ApiError, SdkError, TransitClient};
