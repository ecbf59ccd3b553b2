//! HTML page endpoints.
//!
//! Pages fetch through the same dispatcher as the JSON endpoints, then hand
//! the data to the configured renderer. They are not marked `no-store`.

use axum::extract::{Path, State};
use axum::response::Html;

use crate::http::response::PageError;
use crate::http::server::AppState;
use crate::proxy::DispatchError;
use crate::render::Page;
use crate::routing::{OrgRef, RouteRef};

/// `/`: organization picker.
pub async fn home(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let orgs = state.dispatcher.orgs(None).await?;
    render(&state, Page::Home { orgs })
}

/// `/{org}`: routes of one organization.
pub async fn route_list(
    State(state): State<AppState>,
    Path(org): Path<String>,
) -> Result<Html<String>, PageError> {
    let org = OrgRef::new(org).map_err(DispatchError::from)?;
    let routes = state.dispatcher.routes(&org).await?;
    render(
        &state,
        Page::RouteList {
            org: org.id().to_string(),
            routes,
        },
    )
}

/// `/{org}/{route}`: stops of one route.
pub async fn route_detail(
    State(state): State<AppState>,
    Path((org, route)): Path<(String, String)>,
) -> Result<Html<String>, PageError> {
    let route = RouteRef::new(org, route).map_err(DispatchError::from)?;
    let detail = state.dispatcher.route_detail(&route).await?;
    render(
        &state,
        Page::RouteDetail {
            org: route.org_id().to_string(),
            route_id: route.route_id().to_string(),
            detail,
        },
    )
}

fn render(state: &AppState, page: Page) -> Result<Html<String>, PageError> {
    Ok(Html(state.renderer.render(&page)?))
}
