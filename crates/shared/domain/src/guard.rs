//! Access guard for protected views.
//!
//! The guard is a pure decision over the session resolution state and an
//! optional required role. No redirect is decided while the session is still
//! resolving.

use serde::{Deserialize, Serialize};

use crate::user::{Role, Session};

/// Views reachable in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Login,
    Dashboard,
    Projects,
    Profile,
    Users,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/auth/login",
            Route::Dashboard => "/dashboard",
            Route::Projects => "/projects",
            Route::Profile => "/profile",
            Route::Users => "/users",
        }
    }

    /// Role a visitor needs to open this view, if any beyond being signed in.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::Users => Some(Role::Gerente),
            _ => None,
        }
    }

    /// Where a signed-in visitor lacking the required role lands.
    pub const DEFAULT: Route = Route::Dashboard;
}

/// How far session resolution has progressed for a visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Persisted session not read yet
    Loading,
    Anonymous,
    Authenticated(Session),
}

impl From<Option<Session>> for SessionState {
    fn from(session: Option<Session>) -> Self {
        match session {
            Some(s) => SessionState::Authenticated(s),
            None => SessionState::Anonymous,
        }
    }
}

/// Outcome of guarding a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render nothing and wait for the session to resolve
    Pending,
    /// Render nothing and send the visitor elsewhere
    Redirect(Route),
    /// Render the wrapped content for this session
    Allow(Session),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow(_))
    }
}

pub struct AccessGuard;

impl AccessGuard {
    pub fn evaluate(state: SessionState, required: Option<Role>) -> GuardDecision {
        match state {
            SessionState::Loading => GuardDecision::Pending,
            SessionState::Anonymous => GuardDecision::Redirect(Route::Login),
            SessionState::Authenticated(session) => match required {
                Some(role) if session.role != role => GuardDecision::Redirect(Route::DEFAULT),
                _ => GuardDecision::Allow(session),
            },
        }
    }

    /// Guard a specific view using its own role requirement.
    pub fn evaluate_route(state: SessionState, route: Route) -> GuardDecision {
        Self::evaluate(state, route.required_role())
    }
}

/// Sidebar entries visible to a role, in display order.
pub fn navigation(role: Role) -> Vec<Route> {
    [Route::Dashboard, Route::Projects, Route::Users, Route::Profile]
        .into_iter()
        .filter(|route| match route.required_role() {
            Some(required) => required == role,
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::EntityId;

    fn session(role: Role) -> Session {
        Session {
            id: EntityId::from("1"),
            name: "Luis".to_string(),
            email: "luis@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn loading_decides_nothing() {
        assert_eq!(
            AccessGuard::evaluate(SessionState::Loading, Some(Role::Gerente)),
            GuardDecision::Pending
        );
        assert_eq!(
            AccessGuard::evaluate(SessionState::Loading, None),
            GuardDecision::Pending
        );
    }

    #[test]
    fn anonymous_goes_to_login() {
        assert_eq!(
            AccessGuard::evaluate(SessionState::Anonymous, None),
            GuardDecision::Redirect(Route::Login)
        );
        assert_eq!(
            AccessGuard::evaluate(SessionState::Anonymous, Some(Role::Gerente)),
            GuardDecision::Redirect(Route::Login)
        );
    }

    #[test]
    fn wrong_role_goes_to_default_page() {
        let decision = AccessGuard::evaluate(
            SessionState::Authenticated(session(Role::Usuario)),
            Some(Role::Gerente),
        );
        assert_eq!(decision, GuardDecision::Redirect(Route::Dashboard));
    }

    #[test]
    fn matching_or_unrestricted_role_is_allowed() {
        let manager = session(Role::Gerente);
        assert_eq!(
            AccessGuard::evaluate(
                SessionState::Authenticated(manager.clone()),
                Some(Role::Gerente)
            ),
            GuardDecision::Allow(manager.clone())
        );
        assert!(AccessGuard::evaluate(SessionState::Authenticated(manager), None).is_allowed());
    }

    #[test]
    fn required_role_is_exact_match() {
        // A manager guarding a usuario-only view is redirected as well.
        let decision = AccessGuard::evaluate(
            SessionState::Authenticated(session(Role::Gerente)),
            Some(Role::Usuario),
        );
        assert_eq!(decision, GuardDecision::Redirect(Route::Dashboard));
    }

    #[test]
    fn users_view_requires_manager() {
        let decision = AccessGuard::evaluate_route(
            SessionState::from(Some(session(Role::Usuario))),
            Route::Users,
        );
        assert_eq!(decision, GuardDecision::Redirect(Route::Dashboard));
    }

    #[test]
    fn navigation_hides_user_admin_from_members() {
        assert_eq!(
            navigation(Role::Usuario),
            vec![Route::Dashboard, Route::Projects, Route::Profile]
        );
        assert!(navigation(Role::Gerente).contains(&Route::Users));
    }
}
