//! Project board - projects, their tasks and the dashboard over both.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::try_join_all;
use tracing::{debug, info};

use common::{AppError, AppResult, OptionExt};
use domain::{
    projects_with_stats, Dashboard, EntityId, Move, Project, ProjectDraft, ProjectWithStats,
    Session, Task, TaskDraft, TaskPatch,
};
use remote::{ProjectBackend, TaskBackend, UserBackend};

use crate::view::ProjectDetail;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Board service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BoardService: Send + Sync {
    /// Status counts, per-project progress and the latest finished tasks
    async fn dashboard(&self) -> AppResult<Dashboard>;

    async fn projects(&self) -> AppResult<Vec<ProjectWithStats>>;

    async fn project_detail(&self, id: &EntityId) -> AppResult<ProjectDetail>;

    /// The signed-in manager becomes the project's manager
    async fn create_project(&self, manager: &Session, draft: ProjectDraft) -> AppResult<Project>;

    async fn update_project(
        &self,
        manager: &Session,
        id: &EntityId,
        draft: ProjectDraft,
    ) -> AppResult<Project>;

    /// Delete every task of the project, then the project. Not atomic: a
    /// failure part way leaves the remaining records in place.
    async fn delete_project(&self, id: &EntityId) -> AppResult<()>;

    async fn create_task(&self, project_id: &EntityId, draft: TaskDraft) -> AppResult<Task>;

    async fn update_task(&self, id: &EntityId, patch: TaskPatch) -> AppResult<Task>;

    async fn delete_task(&self, id: &EntityId) -> AppResult<()>;

    /// Move a task one status step. Only its assignee or a manager may.
    async fn move_task(&self, actor: &Session, id: &EntityId, step: Move) -> AppResult<Task>;
}

/// Concrete implementation of BoardService over the remote collections.
pub struct ProjectBoard {
    projects: Arc<dyn ProjectBackend>,
    tasks: Arc<dyn TaskBackend>,
    users: Arc<dyn UserBackend>,
}

impl ProjectBoard {
    pub fn new(
        projects: Arc<dyn ProjectBackend>,
        tasks: Arc<dyn TaskBackend>,
        users: Arc<dyn UserBackend>,
    ) -> Self {
        Self {
            projects,
            tasks,
            users,
        }
    }

    async fn snapshot(&self) -> AppResult<(Vec<Project>, Vec<Task>)> {
        tokio::try_join!(self.projects.list_projects(), self.tasks.list_tasks())
    }
}

#[async_trait]
impl BoardService for ProjectBoard {
    async fn dashboard(&self) -> AppResult<Dashboard> {
        let (projects, tasks) = self.snapshot().await?;
        debug!(
            projects = projects.len(),
            tasks = tasks.len(),
            "Building dashboard"
        );
        Ok(Dashboard::build(&projects, &tasks))
    }

    async fn projects(&self) -> AppResult<Vec<ProjectWithStats>> {
        let (projects, tasks) = self.snapshot().await?;
        Ok(projects_with_stats(&projects, &tasks))
    }

    async fn project_detail(&self, id: &EntityId) -> AppResult<ProjectDetail> {
        let (project, tasks, users) = tokio::try_join!(
            self.projects.find_project(id),
            self.tasks.tasks_for_project(id),
            self.users.list_users(),
        )?;
        let project = project.ok_or_not_found()?;

        Ok(ProjectDetail::build(
            project,
            tasks,
            &users,
            Utc::now().date_naive(),
        ))
    }

    async fn create_project(&self, manager: &Session, draft: ProjectDraft) -> AppResult<Project> {
        let new_project = draft.into_new_project(manager.id.clone())?;
        let created = self.projects.create_project(&new_project).await?;

        info!(project_id = %created.id, manager_id = %manager.id, "Project created");
        Ok(created)
    }

    async fn update_project(
        &self,
        manager: &Session,
        id: &EntityId,
        draft: ProjectDraft,
    ) -> AppResult<Project> {
        draft.validate()?;
        let current = self.projects.get_project(id).await?;
        let manager_id = current.manager_id.unwrap_or_else(|| manager.id.clone());

        let replacement = draft.into_new_project(manager_id)?;
        let updated = self.projects.replace_project(id, &replacement).await?;

        info!(project_id = %id, "Project updated");
        Ok(updated)
    }

    async fn delete_project(&self, id: &EntityId) -> AppResult<()> {
        let tasks = self.tasks.tasks_for_project(id).await?;
        try_join_all(tasks.iter().map(|t| self.tasks.delete_task(&t.id))).await?;
        self.projects.delete_project(id).await?;

        info!(project_id = %id, tasks = tasks.len(), "Project deleted");
        Ok(())
    }

    async fn create_task(&self, project_id: &EntityId, draft: TaskDraft) -> AppResult<Task> {
        let new_task = draft.into_new_task(project_id.clone())?;
        if self.projects.find_project(project_id).await?.is_none() {
            return Err(AppError::NotFound);
        }

        let created = self.tasks.create_task(&new_task).await?;
        info!(task_id = %created.id, project_id = %project_id, "Task created");
        Ok(created)
    }

    async fn update_task(&self, id: &EntityId, patch: TaskPatch) -> AppResult<Task> {
        let current = self.tasks.get_task(id).await?;
        patch.validate_against(&current)?;

        let updated = self.tasks.patch_task(id, &patch).await?;
        info!(task_id = %id, "Task updated");
        Ok(updated)
    }

    async fn delete_task(&self, id: &EntityId) -> AppResult<()> {
        self.tasks.delete_task(id).await?;
        info!(task_id = %id, "Task deleted");
        Ok(())
    }

    async fn move_task(&self, actor: &Session, id: &EntityId, step: Move) -> AppResult<Task> {
        let task = self.tasks.get_task(id).await?;
        if !actor.is_manager() && !task.is_assigned_to(&actor.id) {
            return Err(AppError::Forbidden);
        }

        let next = task.status.apply(step)?;
        let moved = self.tasks.patch_task(id, &TaskPatch::status(next)).await?;

        info!(task_id = %id, from = %task.status, to = %next, "Task moved");
        Ok(moved)
    }
}
