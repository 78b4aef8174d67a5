//! Dashboard and navigation handlers.

use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use domain::{navigation, Dashboard, Route};

use crate::extractors::CurrentSession;
use crate::state::AppState;

/// Banner shown when the dashboard data could not be fetched
pub const DASHBOARD_UNAVAILABLE: &str = "Dashboard data could not be loaded";

/// Dashboard data, with a notice when it could not be loaded.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub dashboard: Dashboard,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Sidebar entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct NavigationEntry {
    pub route: Route,
    pub path: String,
}

/// Create dashboard routes (mounted at the root, session required)
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/navigation", get(navigation_entries))
}

/// Completion statistics across every project
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard data", body = DashboardResponse),
        (status = 303, description = "Not signed in")
    )
)]
pub async fn dashboard(
    _current: CurrentSession,
    State(state): State<AppState>,
) -> Json<DashboardResponse> {
    let response = match state.board.dashboard().await {
        Ok(dashboard) => DashboardResponse {
            dashboard,
            notice: None,
        },
        Err(e) => {
            warn!("Dashboard fetch failed: {}", e);
            DashboardResponse {
                dashboard: Dashboard::default(),
                notice: Some(DASHBOARD_UNAVAILABLE.to_string()),
            }
        }
    };

    Json(response)
}

/// Views the signed-in user may open
#[utoipa::path(
    get,
    path = "/navigation",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Visible routes in display order", body = Vec<NavigationEntry>),
        (status = 303, description = "Not signed in")
    )
)]
pub async fn navigation_entries(current: CurrentSession) -> Json<Vec<NavigationEntry>> {
    let entries = navigation(current.session.role)
        .into_iter()
        .map(|route| NavigationEntry {
            route,
            path: route.path().to_string(),
        })
        .collect();

    Json(entries)
}
