//! Session extractors for guarded handlers.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, response::Response};

use domain::{AccessGuard, GuardDecision, Role, Session, SessionState};

use crate::middleware::guard_response;

/// Session placed in the request by [`crate::middleware::session_guard`].
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub token: String,
    pub session: Session,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentSession>()
            .cloned()
            .ok_or_else(|| guard_response(&AccessGuard::evaluate(SessionState::Anonymous, None)))
    }
}

/// A session holding the `gerente` role. Other visitors are turned away the
/// same way the guard turns them away from a manager-only view.
#[derive(Debug, Clone)]
pub struct ManagerSession(pub CurrentSession);

impl ManagerSession {
    pub fn session(&self) -> &Session {
        &self.0.session
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ManagerSession
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let current = CurrentSession::from_request_parts(parts, state).await?;
        let resolved = SessionState::Authenticated(current.session.clone());

        match AccessGuard::evaluate(resolved, Some(Role::Gerente)) {
            GuardDecision::Allow(_) => Ok(ManagerSession(current)),
            decision => Err(guard_response(&decision)),
        }
    }
}
