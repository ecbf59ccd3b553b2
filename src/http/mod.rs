//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (assign / propagate request ID)
//!     → handlers.rs (JSON proxy endpoints) | pages.rs (HTML pages)
//!     → proxy dispatcher
//!     → response.rs (no-store marking, error mapping)
//!     → Send to client
//! ```

pub mod handlers;
pub mod pages;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use response::{ErrorBody, NoStore, PageError};
pub use server::{AppState, HttpServer};
