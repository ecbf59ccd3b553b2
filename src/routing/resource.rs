//! Request-scoped identifiers and resource kinds.
//!
//! # Design Decisions
//! - Identifiers are validated on construction, so a `RouteRef` in hand is
//!   always dispatchable
//! - Surrounding whitespace is trimmed; blank values count as missing

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The upstream resources the proxy knows how to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Orgs,
    Routes,
    Meta,
    Stops,
    Vehicles,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Orgs,
        ResourceKind::Routes,
        ResourceKind::Meta,
        ResourceKind::Stops,
        ResourceKind::Vehicles,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Orgs => "orgs",
            ResourceKind::Routes => "routes",
            ResourceKind::Meta => "meta",
            ResourceKind::Stops => "stops",
            ResourceKind::Vehicles => "vehicles",
        }
    }

    /// Key under which the upstream may wrap a list of this kind.
    pub fn envelope_key(self) -> Option<&'static str> {
        match self {
            ResourceKind::Orgs => Some("orgs"),
            ResourceKind::Routes => Some("routes"),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invalid or missing inbound parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("missing required parameter `{0}`")]
    Missing(&'static str),
}

/// An organization id, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrgRef {
    id: String,
}

impl OrgRef {
    pub fn new(id: impl Into<String>) -> Result<Self, ParamError> {
        Ok(Self {
            id: required("orgId", Some(id.into()))?,
        })
    }

    /// Build from an optional query parameter.
    pub fn from_param(id: Option<String>) -> Result<Self, ParamError> {
        Ok(Self {
            id: required("orgId", id)?,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// A route within an organization; both parts are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteRef {
    org: OrgRef,
    route_id: String,
}

impl RouteRef {
    pub fn new(org_id: impl Into<String>, route_id: impl Into<String>) -> Result<Self, ParamError> {
        Self::from_params(Some(org_id.into()), Some(route_id.into()))
    }

    /// Build from optional query parameters. `orgId` is checked first.
    pub fn from_params(org_id: Option<String>, route_id: Option<String>) -> Result<Self, ParamError> {
        let org = OrgRef::from_param(org_id)?;
        let route_id = required("routeId", route_id)?;
        Ok(Self { org, route_id })
    }

    pub fn org(&self) -> &OrgRef {
        &self.org
    }

    pub fn org_id(&self) -> &str {
        self.org.id()
    }

    pub fn route_id(&self) -> &str {
        &self.route_id
    }
}

fn required(name: &'static str, value: Option<String>) -> Result<String, ParamError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ParamError::Missing(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_keys() {
        assert_eq!(ResourceKind::Orgs.envelope_key(), Some("orgs"));
        assert_eq!(ResourceKind::Routes.envelope_key(), Some("routes"));
        assert_eq!(ResourceKind::Stops.envelope_key(), None);
        assert_eq!(ResourceKind::Vehicles.to_string(), "vehicles");
    }

    #[test]
    fn test_route_ref_requires_both_parts() {
        let route = RouteRef::new(" 2 ", "R10").unwrap();
        assert_eq!(route.org_id(), "2");
        assert_eq!(route.route_id(), "R10");

        assert_eq!(
            RouteRef::from_params(None, Some("R10".into())),
            Err(ParamError::Missing("orgId"))
        );
        assert_eq!(
            RouteRef::from_params(Some("2".into()), Some("   ".into())),
            Err(ParamError::Missing("routeId"))
        );
        assert_eq!(
            RouteRef::from_params(None, None),
            Err(ParamError::Missing("orgId"))
        );
    }

    #[test]
    fn test_org_ref_rejects_blank() {
        assert!(OrgRef::new("").is_err());
        assert_eq!(
            OrgRef::from_param(None).unwrap_err().to_string(),
            "missing required parameter `orgId`"
        );
    }
}
