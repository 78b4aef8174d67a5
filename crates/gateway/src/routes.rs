//! Route configuration.

use axum::{http::HeaderValue, middleware, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{
    auth_routes, dashboard_routes, health_routes, profile_routes, project_routes, task_routes,
    user_routes,
};
use crate::middleware::session_guard;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let guarded = |routes: Router<AppState>| {
        routes.route_layer(middleware::from_fn_with_state(state.clone(), session_guard))
    };

    Router::new()
        // Public
        .nest("/health", health_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/auth", auth_routes())
        // Session required; manager-only handlers re-check the role
        .merge(guarded(dashboard_routes()))
        .nest("/projects", guarded(project_routes()))
        .nest("/tasks", guarded(task_routes()))
        .nest("/profile", guarded(profile_routes()))
        .nest("/users", guarded(user_routes()))
        .layer(cors_layer(&state.config.cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match origin {
        "" | "*" => layer.allow_origin(Any),
        origin => match HeaderValue::from_str(origin) {
            Ok(value) => layer.allow_origin(value),
            Err(_) => {
                warn!("Invalid CORS_ORIGIN {:?}; allowing any origin", origin);
                layer.allow_origin(Any)
            }
        },
    }
}
