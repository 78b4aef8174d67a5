//! Session Store - who is signed in, and how they got there.
//!
//! Credentials are checked against the remote `users` collection; issued
//! sessions are kept in a [`SessionStorage`] under an opaque token.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use common::{AppError, AppResult, EmailLock};
use domain::{EntityId, NewUser, Password, Role, Session, SessionState, User};
use remote::UserBackend;

use crate::storage::SessionStorage;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A session together with the token that identifies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedSession {
    pub token: String,
    pub session: Session,
}

/// Registration form as submitted by a visitor.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Session service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Create a user and sign them in
    async fn register(&self, registration: Registration) -> AppResult<IssuedSession>;

    /// Verify credentials and issue a session
    async fn login(&self, email: &str, password: &str) -> AppResult<IssuedSession>;

    /// Forget the session. Unknown tokens are ignored.
    async fn logout(&self, token: &str) -> AppResult<()>;

    async fn is_authenticated(&self, token: &str) -> AppResult<bool>;

    async fn current(&self, token: &str) -> AppResult<Option<Session>>;

    /// Session state for the access guard. An unknown token is anonymous.
    async fn resolve(&self, token: &str) -> AppResult<SessionState>;

    /// Rewrite the stored snapshot of every session `user` holds
    async fn sync_user(&self, user: &User) -> AppResult<()>;

    /// Close every session of a removed account
    async fn revoke_user(&self, id: &EntityId) -> AppResult<()>;

    /// Drop sessions that should not outlive the process
    async fn teardown(&self) -> AppResult<()>;
}

/// Concrete implementation of SessionService backed by the remote users
/// collection.
pub struct SessionStore {
    users: Arc<dyn UserBackend>,
    storage: Arc<dyn SessionStorage>,
    email_lock: EmailLock,
}

impl SessionStore {
    pub fn new(users: Arc<dyn UserBackend>, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            users,
            storage,
            email_lock: EmailLock::new(),
        }
    }

    /// Share the lock other user-writing services hold
    pub fn with_email_lock(mut self, lock: EmailLock) -> Self {
        self.email_lock = lock;
        self
    }

    async fn issue(&self, user: &User) -> AppResult<IssuedSession> {
        let token = Uuid::new_v4().simple().to_string();
        let session = user.to_session();
        self.storage.save(&token, &session).await?;

        info!(user_id = %session.id, role = %session.role, "Session issued");
        Ok(IssuedSession { token, session })
    }
}

#[async_trait]
impl SessionService for SessionStore {
    async fn register(&self, registration: Registration) -> AppResult<IssuedSession> {
        let name = registration.name.trim().to_string();
        let email = registration.email.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        if email.is_empty() {
            return Err(AppError::validation("Email is required"));
        }

        let password = Password::new(&registration.password)?;

        let user = {
            let _guard = self.email_lock.acquire().await;
            let existing = self.users.list_users().await?;
            if existing.iter().any(|u| u.has_email(&email)) {
                return Err(AppError::duplicate_email(email));
            }

            self.users
                .create_user(&NewUser {
                    name,
                    email,
                    password: password.into_string(),
                    role: registration.role,
                })
                .await?
        };

        self.issue(&user).await
    }

    async fn login(&self, email: &str, password: &str) -> AppResult<IssuedSession> {
        let users = self.users.list_users().await?;
        let user = users.iter().find(|u| u.has_email(email));

        // Verify even for unknown emails so timing does not reveal accounts.
        let stored = match user {
            Some(u) => Password::from_hash(u.password.as_str()),
            None => Password::dummy(),
        };
        let valid = stored.verify(password);

        match user {
            Some(user) if valid => self.issue(user).await,
            _ => {
                warn!("Failed login attempt");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    async fn logout(&self, token: &str) -> AppResult<()> {
        self.storage.remove(token).await?;
        debug!("Session closed");
        Ok(())
    }

    async fn is_authenticated(&self, token: &str) -> AppResult<bool> {
        Ok(self.storage.load(token).await?.is_some())
    }

    async fn current(&self, token: &str) -> AppResult<Option<Session>> {
        self.storage.load(token).await
    }

    async fn resolve(&self, token: &str) -> AppResult<SessionState> {
        Ok(SessionState::from(self.storage.load(token).await?))
    }

    async fn sync_user(&self, user: &User) -> AppResult<()> {
        let session = user.to_session();
        let tokens = self.storage.tokens_of(&user.id).await?;
        for token in &tokens {
            self.storage.save(token, &session).await?;
        }

        debug!(user_id = %user.id, sessions = tokens.len(), "Sessions refreshed");
        Ok(())
    }

    async fn revoke_user(&self, id: &EntityId) -> AppResult<()> {
        let tokens = self.storage.tokens_of(id).await?;
        for token in &tokens {
            self.storage.remove(token).await?;
        }

        if !tokens.is_empty() {
            info!(user_id = %id, sessions = tokens.len(), "Sessions revoked");
        }
        Ok(())
    }

    async fn teardown(&self) -> AppResult<()> {
        self.storage.teardown().await
    }
}
