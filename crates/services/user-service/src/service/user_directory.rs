//! User directory - cached listing and administration of users.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use common::{AppError, AppResult, EmailLock};
use domain::{EntityId, NewUser, Password, User, UserChanges};
use remote::UserBackend;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
///
/// Every write goes to the remote collection first; the cached list is only
/// reconciled after the call succeeds. Nothing is rolled back on failure.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Replace the cached list with the remote one
    async fn refresh(&self) -> AppResult<Vec<User>>;

    /// Last fetched list, without a remote call
    async fn users(&self) -> Vec<User>;

    async fn get_user(&self, id: &EntityId) -> AppResult<User>;

    /// Create a user. `user.password` is the plain text password.
    async fn add(&self, user: NewUser) -> AppResult<User>;

    /// Replace a user's fields. The stored password is kept unless a new one
    /// is given.
    async fn update(&self, id: &EntityId, changes: UserChanges) -> AppResult<User>;

    async fn remove(&self, id: &EntityId) -> AppResult<()>;
}

/// Concrete implementation of UserService over the remote users collection.
pub struct UserDirectory {
    backend: Arc<dyn UserBackend>,
    cache: RwLock<Vec<User>>,
    email_lock: EmailLock,
}

impl UserDirectory {
    pub fn new(backend: Arc<dyn UserBackend>) -> Self {
        Self {
            backend,
            cache: RwLock::new(Vec::new()),
            email_lock: EmailLock::new(),
        }
    }

    /// Share the lock other user-writing services hold
    pub fn with_email_lock(mut self, lock: EmailLock) -> Self {
        self.email_lock = lock;
        self
    }

    async fn reconcile(&self, user: &User) {
        let mut cache = self.cache.write().await;
        match cache.iter_mut().find(|u| u.id == user.id) {
            Some(slot) => *slot = user.clone(),
            None => cache.push(user.clone()),
        }
    }

    fn ensure_unique_email(users: &[User], email: &str, except: Option<&EntityId>) -> AppResult<()> {
        let taken = users
            .iter()
            .any(|u| Some(&u.id) != except && u.has_email(email));
        if taken {
            return Err(AppError::duplicate_email(email));
        }
        Ok(())
    }
}

fn required(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

#[async_trait]
impl UserService for UserDirectory {
    async fn refresh(&self) -> AppResult<Vec<User>> {
        let users = self.backend.list_users().await?;
        *self.cache.write().await = users.clone();
        Ok(users)
    }

    async fn users(&self) -> Vec<User> {
        self.cache.read().await.clone()
    }

    async fn get_user(&self, id: &EntityId) -> AppResult<User> {
        self.backend.get_user(id).await
    }

    async fn add(&self, user: NewUser) -> AppResult<User> {
        let name = required(&user.name, "Name")?;
        let email = required(&user.email, "Email")?;

        let password = Password::new(&user.password)?;

        let created = {
            let _guard = self.email_lock.acquire().await;
            let existing = self.refresh().await?;
            Self::ensure_unique_email(&existing, &email, None)?;

            self.backend
                .create_user(&NewUser {
                    name,
                    email,
                    password: password.into_string(),
                    role: user.role,
                })
                .await?
        };

        self.reconcile(&created).await;
        info!(user_id = %created.id, role = %created.role, "User added");
        Ok(created)
    }

    async fn update(&self, id: &EntityId, changes: UserChanges) -> AppResult<User> {
        let name = required(&changes.name, "Name")?;
        let email = required(&changes.email, "Email")?;

        // A blank field keeps the stored password; anything else is hashed as typed.
        let new_password = match changes.password.as_deref() {
            Some(plain) if !plain.trim().is_empty() => Some(Password::new(plain)?.into_string()),
            _ => None,
        };

        let updated = {
            let _guard = self.email_lock.acquire().await;
            let current = self.backend.get_user(id).await?;
            let existing = self.backend.list_users().await?;
            Self::ensure_unique_email(&existing, &email, Some(id))?;

            self.backend
                .replace_user(
                    id,
                    &User {
                        id: id.clone(),
                        name,
                        email,
                        password: new_password.unwrap_or(current.password),
                        role: changes.role,
                    },
                )
                .await?
        };

        self.reconcile(&updated).await;
        info!(user_id = %updated.id, "User updated");
        Ok(updated)
    }

    async fn remove(&self, id: &EntityId) -> AppResult<()> {
        self.backend.delete_user(id).await?;
        self.cache.write().await.retain(|u| &u.id != id);
        info!(user_id = %id, "User removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Role;
    use remote::{InMemoryBackend, MockUserBackend};

    fn user(id: u64, email: &str) -> User {
        User {
            id: EntityId::from(id),
            name: format!("Usuario {}", id),
            email: email.into(),
            password: Password::new("original-pass").unwrap().into_string(),
            role: Role::Usuario,
        }
    }

    fn directory(users: Vec<User>) -> (UserDirectory, Arc<InMemoryBackend>) {
        let backend = Arc::new(InMemoryBackend::with_data(users, vec![], vec![]));
        (UserDirectory::new(backend.clone()), backend)
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Carla".into(),
            email: email.into(),
            password: "carla-pass-1".into(),
            role: Role::Gerente,
        }
    }

    #[tokio::test]
    async fn test_refresh_replaces_cache() {
        let (dir, _) = directory(vec![user(1, "a@x.com"), user(2, "b@x.com")]);
        assert!(dir.users().await.is_empty());

        dir.refresh().await.unwrap();
        assert_eq!(dir.users().await.len(), 2);
    }

    #[tokio::test]
    async fn test_add_hashes_password_and_reconciles() {
        let (dir, backend) = directory(vec![user(1, "a@x.com")]);

        let created = dir.add(new_user("carla@x.com")).await.unwrap();

        let cached = dir.users().await;
        assert_eq!(cached.len(), 2);
        assert!(cached.iter().any(|u| u.id == created.id));

        let stored = backend.get_user(&created.id).await.unwrap();
        assert_ne!(stored.password, "carla-pass-1");
        assert!(Password::from_hash(stored.password.as_str()).verify("carla-pass-1"));
    }

    #[tokio::test]
    async fn test_add_rejects_duplicate_email() {
        let (dir, backend) = directory(vec![user(1, "carla@x.com")]);

        let result = dir.add(new_user("Carla@X.com")).await;
        assert!(matches!(result, Err(AppError::DuplicateEmail(_))));
        assert_eq!(backend.user_snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_password_when_not_given() {
        let (dir, backend) = directory(vec![user(1, "a@x.com")]);
        dir.refresh().await.unwrap();

        let updated = dir
            .update(
                &EntityId::from("1"),
                UserChanges {
                    name: "Nuevo".into(),
                    email: "a@x.com".into(),
                    password: None,
                    role: Role::Gerente,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.role, Role::Gerente);
        assert_eq!(dir.users().await[0].name, "Nuevo");
        let stored = backend.get_user(&EntityId::from("1")).await.unwrap();
        assert!(Password::from_hash(stored.password.as_str()).verify("original-pass"));
    }

    #[tokio::test]
    async fn test_update_hashes_new_password_as_typed() {
        let (dir, backend) = directory(vec![user(1, "a@x.com")]);

        dir.update(
            &EntityId::from("1"),
            UserChanges {
                name: "A".into(),
                email: "a@x.com".into(),
                password: Some("  clave nueva  ".into()),
                role: Role::Usuario,
            },
        )
        .await
        .unwrap();

        let stored = backend.get_user(&EntityId::from("1")).await.unwrap();
        let hash = Password::from_hash(stored.password.as_str());
        assert!(hash.verify("  clave nueva  "));
        assert!(!hash.verify("clave nueva"));
    }

    #[tokio::test]
    async fn test_update_treats_blank_password_as_absent() {
        let (dir, backend) = directory(vec![user(1, "a@x.com")]);

        dir.update(
            &EntityId::from("1"),
            UserChanges {
                name: "A".into(),
                email: "a@x.com".into(),
                password: Some("   ".into()),
                role: Role::Usuario,
            },
        )
        .await
        .unwrap();

        let stored = backend.get_user(&EntityId::from("1")).await.unwrap();
        assert!(Password::from_hash(stored.password.as_str()).verify("original-pass"));
    }

    #[tokio::test]
    async fn test_update_rejects_email_of_another_user() {
        let (dir, _) = directory(vec![user(1, "a@x.com"), user(2, "b@x.com")]);

        let result = dir
            .update(
                &EntityId::from("1"),
                UserChanges {
                    name: "A".into(),
                    email: "B@x.com".into(),
                    password: None,
                    role: Role::Usuario,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_remove_reconciles_cache() {
        let (dir, _) = directory(vec![user(1, "a@x.com"), user(2, "b@x.com")]);
        dir.refresh().await.unwrap();

        dir.remove(&EntityId::from("1")).await.unwrap();
        let ids: Vec<String> = dir.users().await.iter().map(|u| u.id.to_string()).collect();
        assert_eq!(ids, vec!["2"]);
    }

    #[tokio::test]
    async fn test_failed_remote_call_leaves_cache_untouched() {
        let mut backend = MockUserBackend::new();
        backend
            .expect_list_users()
            .times(1)
            .returning(|| Ok(vec![user(1, "a@x.com")]));
        backend
            .expect_delete_user()
            .returning(|_| Err(AppError::remote("503")));

        let dir = UserDirectory::new(Arc::new(backend));
        dir.refresh().await.unwrap();

        let result = dir.remove(&EntityId::from("1")).await;
        assert!(matches!(result, Err(AppError::RemoteCall(_))));
        assert_eq!(dir.users().await.len(), 1);
    }
}
