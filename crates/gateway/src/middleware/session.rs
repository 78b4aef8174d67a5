//! Session guard middleware.

use axum::{
    extract::{Request, State},
    http::{header::LOCATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tracing::debug;

use common::AppError;
use domain::{AccessGuard, GuardDecision, SessionState};

use crate::extractors::CurrentSession;
use crate::state::AppState;

/// Resolve the bearer token and let the request through only for a signed-in
/// visitor. The resolved session is stored in the request extensions.
pub async fn session_guard(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (token, resolved) = match bearer {
        Some(TypedHeader(Authorization(bearer))) => {
            let token = bearer.token().to_string();
            let resolved = state.sessions.resolve(&token).await?;
            (token, resolved)
        }
        None => (String::new(), SessionState::Anonymous),
    };

    match AccessGuard::evaluate(resolved, None) {
        GuardDecision::Allow(session) => {
            request
                .extensions_mut()
                .insert(CurrentSession { token, session });
            Ok(next.run(request).await)
        }
        decision => Ok(guard_response(&decision)),
    }
}

/// HTTP rendition of a guard decision that does not allow the request:
/// `303 See Other` towards the route for a redirect, an empty `204` while the
/// session is pending.
pub fn guard_response(decision: &GuardDecision) -> Response {
    match decision {
        GuardDecision::Redirect(route) => {
            debug!("Guard redirects to {}", route.path());
            (StatusCode::SEE_OTHER, [(LOCATION, route.path())]).into_response()
        }
        GuardDecision::Pending | GuardDecision::Allow(_) => StatusCode::NO_CONTENT.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Route;

    #[test]
    fn test_redirect_carries_location() {
        let response = guard_response(&GuardDecision::Redirect(Route::Login));
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/auth/login");
    }

    #[test]
    fn test_pending_renders_nothing() {
        let response = guard_response(&GuardDecision::Pending);
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().get(LOCATION).is_none());
    }
}
