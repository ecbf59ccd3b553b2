//! Proxy dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Validated OrgRef / RouteRef
//!     → dispatcher.rs (resolve target via routing, build query)
//!     → upstream client (GET + JSON decode)
//!     → envelope.rs (unwrap {orgs|routes: [...]} for list kinds)
//!     → JSON array / object, or DispatchError
//! ```

pub mod dispatcher;
pub mod envelope;
pub mod error;

pub use dispatcher::{Dispatcher, RouteDetail};
pub use envelope::{normalize, EnvelopeError};
pub use error::{DispatchError, DispatchResult};
