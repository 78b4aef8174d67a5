//! Collections exposed by the external REST collaborator.
//!
//! Services depend on these traits rather than on the HTTP client so they can
//! be exercised against mocks or the in-memory backend.

use async_trait::async_trait;

use common::AppResult;
use domain::{EntityId, NewProject, NewTask, NewUser, Project, Task, TaskPatch, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// `users` collection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserBackend: Send + Sync {
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Fails with `NotFound` when no user has this id
    async fn get_user(&self, id: &EntityId) -> AppResult<User>;

    async fn create_user(&self, user: &NewUser) -> AppResult<User>;

    /// Full replacement (PUT). `user.id` is ignored in favour of `id`.
    async fn replace_user(&self, id: &EntityId, user: &User) -> AppResult<User>;

    /// Partial update of the stored password hash (PATCH)
    async fn set_password(&self, id: &EntityId, password_hash: &str) -> AppResult<User>;

    async fn delete_user(&self, id: &EntityId) -> AppResult<()>;
}

/// `projects` collection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProjectBackend: Send + Sync {
    async fn list_projects(&self) -> AppResult<Vec<Project>>;

    /// Fails with `NotFound` when no project has this id
    async fn get_project(&self, id: &EntityId) -> AppResult<Project>;

    /// Query form (`?id=`); an unknown id yields `None` rather than an error
    async fn find_project(&self, id: &EntityId) -> AppResult<Option<Project>>;

    async fn create_project(&self, project: &NewProject) -> AppResult<Project>;

    async fn replace_project(&self, id: &EntityId, project: &NewProject) -> AppResult<Project>;

    async fn delete_project(&self, id: &EntityId) -> AppResult<()>;
}

/// `tasks` collection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TaskBackend: Send + Sync {
    async fn list_tasks(&self) -> AppResult<Vec<Task>>;

    async fn tasks_for_project(&self, project_id: &EntityId) -> AppResult<Vec<Task>>;

    /// Fails with `NotFound` when no task has this id
    async fn get_task(&self, id: &EntityId) -> AppResult<Task>;

    async fn create_task(&self, task: &NewTask) -> AppResult<Task>;

    async fn patch_task(&self, id: &EntityId, patch: &TaskPatch) -> AppResult<Task>;

    async fn delete_task(&self, id: &EntityId) -> AppResult<()>;
}

/// Reachability of the collaborator, for health reporting.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Succeeds when the collaborator answers at all, whatever the status
    async fn ping(&self) -> AppResult<()>;
}
