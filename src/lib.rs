//! Transit proxy library.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌───────────────────────────────────────────────┐
//!                          │                 TRANSIT PROXY                 │
//!   Browser / client code  │  ┌────────┐   ┌───────────┐   ┌───────────┐   │
//!   ───────────────────────┼─▶│  http  │──▶│   proxy   │──▶│  routing  │   │
//!                          │  │ server │   │dispatcher │   │ org→host  │   │
//!                          │  └───┬────┘   └─────┬─────┘   └───────────┘   │
//!                          │      │              │                         │
//!                          │      ▼              ▼                         │
//!                          │  ┌────────┐   ┌───────────┐                   │
//!   HTML / JSON            │  │ render │   │ upstream  │───────────────────┼──▶ Transit API
//!   ◀──────────────────────┼──│ pages  │   │  client   │◀──────────────────┼─── (primary /
//!                          │  └────────┘   └───────────┘                   │     secondary)
//!                          │                                               │
//!                          │  config · lifecycle · observability           │
//!                          └───────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod render;
pub mod routing;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
