//! JSON proxy endpoints.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::http::response::NoStore;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::proxy::DispatchError;
use crate::routing::{OrgRef, ParamError, ResourceKind, RouteRef};

/// `GET /orgs-data` parameters.
#[derive(Debug, Default, Deserialize)]
pub struct OrgsQuery {
    pub q: Option<String>,
}

/// `GET /routes-data` parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgQuery {
    pub org_id: Option<String>,
}

/// Parameters of the route-scoped endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuery {
    pub org_id: Option<String>,
    pub route_id: Option<String>,
}

pub async fn orgs_data(
    State(state): State<AppState>,
    Query(params): Query<OrgsQuery>,
) -> Result<impl IntoResponse, DispatchError> {
    let orgs = state.dispatcher.orgs(params.q.as_deref()).await?;
    Ok(NoStore(orgs))
}

pub async fn routes_data(
    State(state): State<AppState>,
    Query(params): Query<OrgQuery>,
) -> Result<impl IntoResponse, DispatchError> {
    let org = OrgRef::from_param(params.org_id).map_err(|e| rejected(ResourceKind::Routes, e))?;
    let routes = state.dispatcher.routes(&org).await?;
    Ok(NoStore(routes))
}

pub async fn meta(
    State(state): State<AppState>,
    Query(params): Query<RouteQuery>,
) -> Result<impl IntoResponse, DispatchError> {
    let route = route_ref(ResourceKind::Meta, params)?;
    Ok(NoStore(state.dispatcher.meta(&route).await?))
}

pub async fn stops(
    State(state): State<AppState>,
    Query(params): Query<RouteQuery>,
) -> Result<impl IntoResponse, DispatchError> {
    let route = route_ref(ResourceKind::Stops, params)?;
    Ok(NoStore(state.dispatcher.stops(&route).await?))
}

pub async fn vehicles(
    State(state): State<AppState>,
    Query(params): Query<RouteQuery>,
) -> Result<impl IntoResponse, DispatchError> {
    let route = route_ref(ResourceKind::Vehicles, params)?;
    Ok(NoStore(state.dispatcher.vehicles(&route).await?))
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// Liveness probe. Never touches the upstream.
pub async fn healthz() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn route_ref(kind: ResourceKind, params: RouteQuery) -> Result<RouteRef, DispatchError> {
    RouteRef::from_params(params.org_id, params.route_id).map_err(|e| rejected(kind, e))
}

fn rejected(kind: ResourceKind, err: ParamError) -> DispatchError {
    tracing::debug!(resource = %kind, error = %err, "Rejected request before dispatch");
    metrics::record_rejected(kind);
    DispatchError::from(err)
}
