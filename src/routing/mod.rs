//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound query params (orgId, routeId)
//!     → resource.rs (validated OrgRef / RouteRef, ResourceKind)
//!     → router.rs (org id → profile → base URL + path)
//!     → Return: UpstreamTarget
//!
//! Route Compilation (at startup):
//!     ProfileConfig[] + OrgRouteConfig[]
//!     → Resolve profile names to indices
//!     → Freeze as immutable UpstreamRouter
//! ```
//!
//! # Design Decisions
//! - Routing compiled at startup, immutable at runtime
//! - Deterministic: same org always resolves to same upstream
//! - Unmapped orgs fall back to the default profile

pub mod resource;
pub mod router;

pub use resource::{OrgRef, ParamError, ResourceKind, RouteRef};
pub use router::{RoutingError, UpstreamProfile, UpstreamRouter, UpstreamTarget};
