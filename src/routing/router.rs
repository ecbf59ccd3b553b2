//! Upstream target resolution.
//!
//! # Responsibilities
//! - Store compiled upstream profiles
//! - Map an organization id to its profile
//! - Produce the `UpstreamTarget` for a `(resource, org)` pair
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) org lookup via HashMap, falling back to the default profile
//! - Base URL and path are joined verbatim so base paths survive

use std::collections::HashMap;

use thiserror::Error;

use crate::config::{ProfileConfig, ProxyConfig, ResourcePaths};
use crate::routing::resource::{OrgRef, ResourceKind};

/// Errors building the router from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("{context} references unknown profile `{profile}`")]
    UnknownProfile { context: String, profile: String },
}

/// A compiled upstream profile.
#[derive(Debug, Clone)]
pub struct UpstreamProfile {
    name: String,
    base_url: String,
    paths: ResourcePaths,
}

impl UpstreamProfile {
    fn from_config(config: &ProfileConfig) -> Self {
        Self {
            name: config.name.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            paths: config.paths.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn path(&self, kind: ResourceKind) -> &str {
        match kind {
            ResourceKind::Orgs => &self.paths.orgs,
            ResourceKind::Routes => &self.paths.routes,
            ResourceKind::Meta => &self.paths.meta,
            ResourceKind::Stops => &self.paths.stops,
            ResourceKind::Vehicles => &self.paths.vehicles,
        }
    }
}

/// Where a single call goes. Recomputed per call, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    pub profile: String,
    pub base_url: String,
    pub path: String,
}

impl UpstreamTarget {
    /// Absolute URL of the call, without query string.
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }
}

/// Organization-keyed upstream selection.
#[derive(Debug, Clone)]
pub struct UpstreamRouter {
    profiles: Vec<UpstreamProfile>,
    org_profiles: HashMap<String, usize>,
    default_profile: usize,
    orgs_profile: usize,
}

impl UpstreamRouter {
    /// Compile the routing table from configuration.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, RoutingError> {
        let profiles: Vec<UpstreamProfile> =
            config.profiles.iter().map(UpstreamProfile::from_config).collect();

        let index_of = |context: &str, name: &str| {
            profiles
                .iter()
                .position(|p| p.name == name)
                .ok_or_else(|| RoutingError::UnknownProfile {
                    context: context.to_string(),
                    profile: name.to_string(),
                })
        };

        let mut org_profiles = HashMap::new();
        for rule in &config.org_routes {
            let idx = index_of(&format!("org_routes[{}]", rule.org_id), &rule.profile)?;
            org_profiles.insert(rule.org_id.trim().to_string(), idx);
        }

        let default_profile = index_of("routing.default_profile", &config.routing.default_profile)?;
        let orgs_profile = index_of("routing.orgs_profile", &config.routing.orgs_profile)?;

        tracing::debug!(
            profiles = profiles.len(),
            org_rules = org_profiles.len(),
            default_profile = %profiles[default_profile].name,
            "Upstream routing compiled"
        );

        Ok(Self {
            profiles,
            org_profiles,
            default_profile,
            orgs_profile,
        })
    }

    /// Profile serving `org`.
    pub fn profile_for(&self, org: &OrgRef) -> &UpstreamProfile {
        let idx = self
            .org_profiles
            .get(org.id())
            .copied()
            .unwrap_or(self.default_profile);
        &self.profiles[idx]
    }

    /// Resolve the target for `kind`. The organization list ignores `org`.
    pub fn resolve(&self, kind: ResourceKind, org: Option<&OrgRef>) -> UpstreamTarget {
        let profile = match (kind, org) {
            (ResourceKind::Orgs, _) | (_, None) => &self.profiles[self.orgs_profile],
            (_, Some(org)) => self.profile_for(org),
        };
        UpstreamTarget {
            profile: profile.name.clone(),
            base_url: profile.base_url.clone(),
            path: profile.path(kind).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrgRouteConfig;

    fn test_config() -> ProxyConfig {
        let mut config = ProxyConfig::default();
        config.profiles[0].base_url = "http://primary.example/".into();
        config.profiles[1].base_url = "http://secondary.example/api".into();
        config
    }

    #[test]
    fn test_org_one_routes_to_primary() {
        let router = UpstreamRouter::from_config(&test_config()).unwrap();
        let org = OrgRef::new("1").unwrap();

        let target = router.resolve(ResourceKind::Meta, Some(&org));
        assert_eq!(target.profile, "primary");
        assert_eq!(target.url(), "http://primary.example/user/meta");

        let target = router.resolve(ResourceKind::Routes, Some(&org));
        assert_eq!(target.url(), "http://primary.example/route-list");
    }

    #[test]
    fn test_other_orgs_use_default_profile() {
        let router = UpstreamRouter::from_config(&test_config()).unwrap();
        let org = OrgRef::new("2").unwrap();

        for kind in [ResourceKind::Meta, ResourceKind::Stops, ResourceKind::Vehicles] {
            let target = router.resolve(kind, Some(&org));
            assert_eq!(target.profile, "secondary");
            assert_eq!(target.url(), format!("http://secondary.example/api/{}", kind));
        }
        assert_eq!(
            router.resolve(ResourceKind::Routes, Some(&org)).url(),
            "http://secondary.example/api/routes"
        );
    }

    #[test]
    fn test_orgs_resolve_to_orgs_profile() {
        let router = UpstreamRouter::from_config(&test_config()).unwrap();
        let org = OrgRef::new("2").unwrap();

        assert_eq!(
            router.resolve(ResourceKind::Orgs, None).url(),
            "http://primary.example/orgs"
        );
        assert_eq!(
            router.resolve(ResourceKind::Orgs, Some(&org)).url(),
            "http://primary.example/orgs"
        );
    }

    #[test]
    fn test_unknown_profile_rejected() {
        let mut config = test_config();
        config.org_routes.push(OrgRouteConfig {
            org_id: "9".into(),
            profile: "missing".into(),
        });

        let err = UpstreamRouter::from_config(&config).unwrap_err();
        assert_eq!(
            err,
            RoutingError::UnknownProfile {
                context: "org_routes[9]".into(),
                profile: "missing".into(),
            }
        );
    }
}
