//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (org rules reference existing profiles)
//! - Validate value ranges (timeouts > 0, bind address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{ProxyConfig, ResourcePaths};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a `host:port` address")]
    InvalidBindAddress(String),

    #[error("pages.static_prefix `{0}` must start with '/' and name a path below the root")]
    InvalidStaticPrefix(String),

    #[error("profile `{profile}` has invalid base_url `{url}`: {reason}")]
    InvalidBaseUrl {
        profile: String,
        url: String,
        reason: String,
    },

    #[error("profile `{profile}` path for {resource} must start with '/', got `{path}`")]
    InvalidPath {
        profile: String,
        resource: &'static str,
        path: String,
    },

    #[error("profile `{0}` is defined more than once")]
    DuplicateProfile(String),

    #[error("{context} references unknown profile `{profile}`")]
    UnknownProfile { context: String, profile: String },

    #[error("org_routes contains an empty org_id")]
    EmptyOrgId,

    #[error("org `{0}` is routed more than once")]
    DuplicateOrgRoute(String),

    #[error("{field} must be a positive number of seconds, got {value}")]
    InvalidTimeout { field: &'static str, value: f64 },

    #[error("upstream.connect_timeout_secs ({connect}) exceeds upstream.timeout_secs ({total})")]
    ConnectExceedsTotal { connect: f64, total: f64 },
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_bind_address(&config.listener.bind_address) {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    check_timeouts(config, &mut errors);

    let prefix = config.pages.static_prefix.trim_end_matches('/');
    if !prefix.starts_with('/') {
        errors.push(ValidationError::InvalidStaticPrefix(
            config.pages.static_prefix.clone(),
        ));
    }

    let mut names = HashSet::new();
    for profile in &config.profiles {
        if !names.insert(profile.name.as_str()) {
            errors.push(ValidationError::DuplicateProfile(profile.name.clone()));
        }
        if let Err(reason) = check_base_url(&profile.base_url) {
            errors.push(ValidationError::InvalidBaseUrl {
                profile: profile.name.clone(),
                url: profile.base_url.clone(),
                reason,
            });
        }
        for (resource, path) in paths_of(&profile.paths) {
            if !path.starts_with('/') {
                errors.push(ValidationError::InvalidPath {
                    profile: profile.name.clone(),
                    resource,
                    path: path.to_string(),
                });
            }
        }
    }

    let mut routed = HashSet::new();
    for rule in &config.org_routes {
        let org_id = rule.org_id.trim();
        if org_id.is_empty() {
            errors.push(ValidationError::EmptyOrgId);
        } else if !routed.insert(org_id) {
            errors.push(ValidationError::DuplicateOrgRoute(org_id.to_string()));
        }
        if !names.contains(rule.profile.as_str()) {
            errors.push(ValidationError::UnknownProfile {
                context: format!("org_routes[{}]", rule.org_id),
                profile: rule.profile.clone(),
            });
        }
    }

    for (context, profile) in [
        ("routing.default_profile", &config.routing.default_profile),
        ("routing.orgs_profile", &config.routing.orgs_profile),
    ] {
        if !names.contains(profile.as_str()) {
            errors.push(ValidationError::UnknownProfile {
                context: context.to_string(),
                profile: profile.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A literal socket address, or `host:port` with a name resolved at bind time.
fn is_bind_address(raw: &str) -> bool {
    if raw.parse::<SocketAddr>().is_ok() {
        return true;
    }
    match raw.rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty()
                && !host.contains(|c: char| c.is_whitespace() || c == '/' || c == ':')
                && port.parse::<u16>().is_ok()
        }
        None => false,
    }
}

fn check_timeouts(config: &ProxyConfig, errors: &mut Vec<ValidationError>) {
    let connect = config.upstream.connect_timeout_secs;
    let total = config.upstream.timeout_secs;
    let mut valid = true;

    for (field, value) in [
        ("upstream.connect_timeout_secs", connect),
        ("upstream.timeout_secs", total),
    ] {
        if !value.is_finite() || value <= 0.0 {
            errors.push(ValidationError::InvalidTimeout { field, value });
            valid = false;
        }
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::InvalidTimeout {
            field: "timeouts.request_secs",
            value: 0.0,
        });
    }
    if valid && connect > total {
        errors.push(ValidationError::ConnectExceedsTotal { connect, total });
    }
}

fn check_base_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme `{}`", other)),
    }
    if url.query().is_some() {
        return Err("query strings are not allowed in a base url".to_string());
    }
    Ok(())
}

fn paths_of(paths: &ResourcePaths) -> [(&'static str, &str); 5] {
    [
        ("orgs", &paths.orgs),
        ("routes", &paths.routes),
        ("meta", &paths.meta),
        ("stops", &paths.stops),
        ("vehicles", &paths.vehicles),
    ]
}
