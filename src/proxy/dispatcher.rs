//! Resource dispatch: resolve, call, normalize.
//!
//! # Responsibilities
//! - Resolve the upstream target for each resource kind
//! - Build the forwarded query parameters
//! - Unwrap list envelopes for orgs and routes
//! - Log every outbound call before and after
//!
//! # Design Decisions
//! - Holds no mutable state; one instance serves every request
//! - The client is borrowed through `Arc`, its lifecycle belongs to startup
//! - meta, stops and vehicles are passed through untouched

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;

use crate::observability::metrics;
use crate::proxy::envelope;
use crate::proxy::error::DispatchResult;
use crate::routing::{OrgRef, ResourceKind, RouteRef, UpstreamRouter, UpstreamTarget};
use crate::upstream::{UpstreamClient, UpstreamError, UpstreamResult};

/// Route metadata and its stops, fetched together for the detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteDetail {
    pub route: Value,
    pub stops: Value,
}

/// Maps inbound resource requests onto upstream calls.
#[derive(Debug)]
pub struct Dispatcher {
    client: Arc<UpstreamClient>,
    router: UpstreamRouter,
}

impl Dispatcher {
    pub fn new(client: Arc<UpstreamClient>, router: UpstreamRouter) -> Self {
        Self { client, router }
    }

    /// Organization list, optionally filtered by search text.
    pub async fn orgs(&self, search: Option<&str>) -> DispatchResult<Vec<Value>> {
        let target = self.router.resolve(ResourceKind::Orgs, None);
        let mut query = Vec::new();
        if let Some(q) = search.map(str::trim).filter(|q| !q.is_empty()) {
            query.push(("q", q));
        }

        let body = self.call(ResourceKind::Orgs, &target, &query).await?;
        Ok(self.unwrap_list(ResourceKind::Orgs, &target, body)?)
    }

    /// Route list of one organization.
    pub async fn routes(&self, org: &OrgRef) -> DispatchResult<Vec<Value>> {
        let target = self.router.resolve(ResourceKind::Routes, Some(org));
        let query = [("orgId", org.id())];

        let body = self.call(ResourceKind::Routes, &target, &query).await?;
        Ok(self.unwrap_list(ResourceKind::Routes, &target, body)?)
    }

    pub async fn meta(&self, route: &RouteRef) -> DispatchResult<Value> {
        self.route_scoped(ResourceKind::Meta, route).await
    }

    pub async fn stops(&self, route: &RouteRef) -> DispatchResult<Value> {
        self.route_scoped(ResourceKind::Stops, route).await
    }

    pub async fn vehicles(&self, route: &RouteRef) -> DispatchResult<Value> {
        self.route_scoped(ResourceKind::Vehicles, route).await
    }

    /// Metadata and stops of a route, fetched concurrently.
    ///
    /// Fails as a whole if either call fails; no partial detail is returned.
    pub async fn route_detail(&self, route: &RouteRef) -> DispatchResult<RouteDetail> {
        let (meta, stops) = tokio::try_join!(self.meta(route), self.stops(route))?;
        Ok(RouteDetail { route: meta, stops })
    }

    async fn route_scoped(&self, kind: ResourceKind, route: &RouteRef) -> DispatchResult<Value> {
        let target = self.router.resolve(kind, Some(route.org()));
        let query = [("orgId", route.org_id()), ("routeId", route.route_id())];
        Ok(self.call(kind, &target, &query).await?)
    }

    async fn call(
        &self,
        kind: ResourceKind,
        target: &UpstreamTarget,
        query: &[(&str, &str)],
    ) -> UpstreamResult<Value> {
        let url = target.url();
        let start = Instant::now();

        tracing::info!(
            resource = %kind,
            profile = %target.profile,
            url = %url,
            params = ?query,
            "Dispatching upstream request"
        );

        let result = self
            .client
            .fetch(&url, query)
            .await
            .and_then(|response| {
                tracing::info!(
                    resource = %kind,
                    url = %url,
                    status = response.status.as_u16(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Upstream responded"
                );
                response.into_json(&url)
            });

        match &result {
            Ok(_) => metrics::record_upstream_request(kind, "ok", start),
            Err(e) => {
                tracing::warn!(
                    resource = %kind,
                    url = %url,
                    error = %e.detail(),
                    "Upstream request failed"
                );
                metrics::record_upstream_request(kind, e.kind(), start);
            }
        }

        result
    }

    fn unwrap_list(
        &self,
        kind: ResourceKind,
        target: &UpstreamTarget,
        body: Value,
    ) -> UpstreamResult<Vec<Value>> {
        envelope::normalize(kind, body).map_err(|e| {
            tracing::warn!(resource = %kind, url = %target.url(), error = %e, "Unexpected upstream envelope");
            UpstreamError::InvalidPayload {
                url: target.url(),
                reason: e.to_string(),
            }
        })
    }
}
