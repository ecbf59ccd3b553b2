//! Page rendering.
//!
//! # Data Flow
//! ```text
//! Page handler
//!     → dispatcher (orgs / routes / route detail)
//!     → Page (template name + data payload)
//!     → PageRenderer::render → HTML
//! ```
//!
//! # Design Decisions
//! - Rendering is a collaborator behind a trait; markup is not proxy logic
//! - Pages carry data only, client-side bundles do the drawing

pub mod shell;

use serde_json::{json, Value};
use thiserror::Error;

use crate::proxy::RouteDetail;

pub use shell::ShellRenderer;

/// Errors producing markup.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to serialize page payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// A page and the data it is rendered from.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    /// Organization picker.
    Home { orgs: Vec<Value> },
    /// Routes of one organization.
    RouteList { org: String, routes: Vec<Value> },
    /// Stops of one route.
    RouteDetail {
        org: String,
        route_id: String,
        detail: RouteDetail,
    },
}

impl Page {
    /// Template / bundle name.
    pub fn name(&self) -> &'static str {
        match self {
            Page::Home { .. } => "home",
            Page::RouteList { .. } => "route_list",
            Page::RouteDetail { .. } => "route_detail",
        }
    }

    /// Heading shown before the site title.
    pub fn heading(&self) -> Option<String> {
        match self {
            Page::Home { .. } => None,
            Page::RouteList { org, .. } => Some(org.clone()),
            Page::RouteDetail { org, route_id, .. } => Some(format!("{} {}", org, route_id)),
        }
    }

    /// Data handed to the client-side bundle.
    pub fn payload(&self) -> Value {
        match self {
            Page::Home { orgs } => json!({ "orgs": orgs }),
            Page::RouteList { org, routes } => json!({ "org": org, "routes": routes }),
            Page::RouteDetail {
                org,
                route_id,
                detail,
            } => json!({
                "org": org,
                "routeId": route_id,
                "route": detail.route,
                "stops": detail.stops,
            }),
        }
    }
}

/// Turns a page into an HTML document.
pub trait PageRenderer: Send + Sync {
    fn render(&self, page: &Page) -> Result<String, RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_detail_payload() {
        let page = Page::RouteDetail {
            org: "SCH".into(),
            route_id: "1501".into(),
            detail: RouteDetail {
                route: json!({"routeNo": "1501"}),
                stops: json!([{"stopId": 946, "name": "Sindong", "seq": 1}]),
            },
        };

        assert_eq!(page.name(), "route_detail");
        assert_eq!(page.heading().as_deref(), Some("SCH 1501"));
        let payload = page.payload();
        assert_eq!(payload["routeId"], "1501");
        assert_eq!(payload["stops"][0]["stopId"], 946);
    }
}
