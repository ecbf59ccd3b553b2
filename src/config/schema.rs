//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Name of the profile served by `UPSTREAM_API_BASE`.
pub const PRIMARY_PROFILE: &str = "primary";

/// Name of the profile served by `UPSTREAM_API_BASE2`.
pub const SECONDARY_PROFILE: &str = "secondary";

const DEFAULT_UPSTREAM_BASE: &str = "http://localhost:9000";

/// Root configuration for the transit proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Outbound client policy shared by every upstream call.
    pub upstream: UpstreamConfig,

    /// Named upstream hosts with their per-resource paths.
    pub profiles: Vec<ProfileConfig>,

    /// Organization id to profile overrides.
    pub org_routes: Vec<OrgRouteConfig>,

    /// Profile selection defaults.
    pub routing: RoutingConfig,

    /// Inbound timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// HTML page settings.
    pub pages: PagesConfig,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            upstream: UpstreamConfig::default(),
            profiles: vec![
                ProfileConfig {
                    name: PRIMARY_PROFILE.to_string(),
                    base_url: DEFAULT_UPSTREAM_BASE.to_string(),
                    paths: ResourcePaths::primary(),
                },
                ProfileConfig {
                    name: SECONDARY_PROFILE.to_string(),
                    base_url: DEFAULT_UPSTREAM_BASE.to_string(),
                    paths: ResourcePaths::default(),
                },
            ],
            org_routes: vec![OrgRouteConfig {
                org_id: "1".to_string(),
                profile: PRIMARY_PROFILE.to_string(),
            }],
            routing: RoutingConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
            pages: PagesConfig::default(),
        }
    }
}

impl ProxyConfig {
    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Option<&ProfileConfig> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Mutable profile lookup, used by the environment overlay.
    pub fn profile_mut(&mut self, name: &str) -> Option<&mut ProfileConfig> {
        self.profiles.iter_mut().find(|p| p.name == name)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Outbound client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: f64,

    /// Total time allowed per upstream call in seconds.
    pub timeout_secs: f64,

    /// Static bearer token forwarded to the upstream. Empty disables it.
    pub api_key: String,

    /// Honour HTTP(S)_PROXY environment variables for outbound calls.
    pub use_system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 5.0,
            timeout_secs: 10.0,
            api_key: String::new(),
            use_system_proxy: true,
        }
    }
}

/// A named upstream host.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProfileConfig {
    /// Profile identifier referenced by routing rules.
    pub name: String,

    /// Base URL; resource paths are appended verbatim.
    pub base_url: String,

    /// Path for each resource kind.
    #[serde(default)]
    pub paths: ResourcePaths,
}

/// Upstream path per resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ResourcePaths {
    pub orgs: String,
    pub routes: String,
    pub meta: String,
    pub stops: String,
    pub vehicles: String,
}

impl Default for ResourcePaths {
    fn default() -> Self {
        Self {
            orgs: "/orgs".to_string(),
            routes: "/routes".to_string(),
            meta: "/meta".to_string(),
            stops: "/stops".to_string(),
            vehicles: "/vehicles".to_string(),
        }
    }
}

impl ResourcePaths {
    /// Path layout of the primary upstream.
    pub fn primary() -> Self {
        Self {
            orgs: "/orgs".to_string(),
            routes: "/route-list".to_string(),
            meta: "/user/meta".to_string(),
            stops: "/user/stops".to_string(),
            vehicles: "/user/vehicles".to_string(),
        }
    }
}

/// Routes one organization to a named profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrgRouteConfig {
    pub org_id: String,
    pub profile: String,
}

/// Profile selection defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Profile used for organizations without an explicit rule.
    pub default_profile: String,

    /// Profile serving the organization list.
    pub orgs_profile: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            default_profile: SECONDARY_PROFILE.to_string(),
            orgs_profile: PRIMARY_PROFILE.to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default tracing filter, overridden by `RUST_LOG`.
    pub log_filter: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "transit_proxy=debug,tower_http=debug".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// HTML page shell settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PagesConfig {
    /// Site title shown in every page.
    pub site_title: String,

    /// `lang` attribute of the document.
    pub lang: String,

    /// URL prefix of the client-side bundles.
    pub static_prefix: String,

    /// Directory served under `static_prefix`.
    pub static_dir: PathBuf,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            site_title: "Shuttle Passenger".to_string(),
            lang: "ko".to_string(),
            static_prefix: "/static".to_string(),
            static_dir: PathBuf::from("static"),
        }
    }
}
