//! Profile of the signed-in user.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use common::{AppError, AppResult};
use domain::{DomainError, EntityId, Password, User};
use remote::UserBackend;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone)]
pub struct PasswordChange {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProfileService: Send + Sync {
    async fn profile(&self, user_id: &EntityId) -> AppResult<User>;

    async fn change_password(&self, user_id: &EntityId, change: PasswordChange) -> AppResult<()>;
}

pub struct ProfileManager {
    users: Arc<dyn UserBackend>,
}

impl ProfileManager {
    pub fn new(users: Arc<dyn UserBackend>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl ProfileService for ProfileManager {
    async fn profile(&self, user_id: &EntityId) -> AppResult<User> {
        self.users.get_user(user_id).await
    }

    async fn change_password(&self, user_id: &EntityId, change: PasswordChange) -> AppResult<()> {
        if change.new != change.confirm {
            return Err(DomainError::PasswordMismatch.into());
        }

        let user = self.users.get_user(user_id).await?;
        if !Password::from_hash(user.password.as_str()).verify(&change.current) {
            return Err(AppError::InvalidCredentials);
        }

        let hash = Password::new(&change.new)?.into_string();
        self.users.set_password(user_id, &hash).await?;

        info!(user_id = %user_id, "Password changed");
        Ok(())
    }
}
