//! In-memory stand-in for the REST collaborator.
//!
//! Behaves like the remote collections (sequential numeric ids, 404 as
//! `NotFound`, no cascades) so services and routers can be tested without a
//! network.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use common::{AppError, AppResult};
use domain::{EntityId, NewProject, NewTask, NewUser, Project, Task, TaskPatch, User};

use crate::backend::{HealthProbe, ProjectBackend, TaskBackend, UserBackend};

#[derive(Default)]
pub struct InMemoryBackend {
    users: RwLock<Vec<User>>,
    projects: RwLock<Vec<Project>>,
    tasks: RwLock<Vec<Task>>,
    next_id: AtomicU64,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            ..Self::default()
        }
    }

    /// Seed the collections. Ids already used by the seed are never reissued.
    pub fn with_data(users: Vec<User>, projects: Vec<Project>, tasks: Vec<Task>) -> Self {
        let highest = users
            .iter()
            .map(|u| &u.id)
            .chain(projects.iter().map(|p| &p.id))
            .chain(tasks.iter().map(|t| &t.id))
            .filter_map(|id| id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        Self {
            users: RwLock::new(users),
            projects: RwLock::new(projects),
            tasks: RwLock::new(tasks),
            next_id: AtomicU64::new(highest + 1),
        }
    }

    fn issue_id(&self) -> EntityId {
        EntityId::from(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    pub async fn user_snapshot(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    pub async fn project_snapshot(&self) -> Vec<Project> {
        self.projects.read().await.clone()
    }

    pub async fn task_snapshot(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }
}

fn position<T>(items: &[T], id: &EntityId, key: impl Fn(&T) -> &EntityId) -> AppResult<usize> {
    items
        .iter()
        .position(|item| key(item) == id)
        .ok_or(AppError::NotFound)
}

#[async_trait]
impl UserBackend for InMemoryBackend {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn get_user(&self, id: &EntityId) -> AppResult<User> {
        let users = self.users.read().await;
        let idx = position(users.as_slice(), id, |u| &u.id)?;
        Ok(users[idx].clone())
    }

    async fn create_user(&self, user: &NewUser) -> AppResult<User> {
        let created = User {
            id: self.issue_id(),
            name: user.name.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
            role: user.role,
        };
        self.users.write().await.push(created.clone());
        Ok(created)
    }

    async fn replace_user(&self, id: &EntityId, user: &User) -> AppResult<User> {
        let mut users = self.users.write().await;
        let idx = position(users.as_slice(), id, |u| &u.id)?;
        let mut replaced = user.clone();
        replaced.id = id.clone();
        users[idx] = replaced.clone();
        Ok(replaced)
    }

    async fn set_password(&self, id: &EntityId, password_hash: &str) -> AppResult<User> {
        let mut users = self.users.write().await;
        let idx = position(users.as_slice(), id, |u| &u.id)?;
        users[idx].password = password_hash.to_string();
        Ok(users[idx].clone())
    }

    async fn delete_user(&self, id: &EntityId) -> AppResult<()> {
        let mut users = self.users.write().await;
        let idx = position(users.as_slice(), id, |u| &u.id)?;
        users.remove(idx);
        Ok(())
    }
}

fn project_from(id: EntityId, new: &NewProject) -> Project {
    Project {
        id,
        name: new.name.clone(),
        description: new.description.clone(),
        start_date: Some(new.start_date),
        end_date: Some(new.end_date),
        image_url: new.image_url.clone(),
        manager_id: Some(new.manager_id.clone()),
    }
}

#[async_trait]
impl ProjectBackend for InMemoryBackend {
    async fn list_projects(&self) -> AppResult<Vec<Project>> {
        Ok(self.projects.read().await.clone())
    }

    async fn get_project(&self, id: &EntityId) -> AppResult<Project> {
        let projects = self.projects.read().await;
        let idx = position(projects.as_slice(), id, |p| &p.id)?;
        Ok(projects[idx].clone())
    }

    async fn find_project(&self, id: &EntityId) -> AppResult<Option<Project>> {
        Ok(self
            .projects
            .read()
            .await
            .iter()
            .find(|p| &p.id == id)
            .cloned())
    }

    async fn create_project(&self, project: &NewProject) -> AppResult<Project> {
        let created = project_from(self.issue_id(), project);
        self.projects.write().await.push(created.clone());
        Ok(created)
    }

    async fn replace_project(&self, id: &EntityId, project: &NewProject) -> AppResult<Project> {
        let mut projects = self.projects.write().await;
        let idx = position(projects.as_slice(), id, |p| &p.id)?;
        projects[idx] = project_from(id.clone(), project);
        Ok(projects[idx].clone())
    }

    async fn delete_project(&self, id: &EntityId) -> AppResult<()> {
        let mut projects = self.projects.write().await;
        let idx = position(projects.as_slice(), id, |p| &p.id)?;
        projects.remove(idx);
        Ok(())
    }
}

#[async_trait]
impl TaskBackend for InMemoryBackend {
    async fn list_tasks(&self) -> AppResult<Vec<Task>> {
        Ok(self.tasks.read().await.clone())
    }

    async fn tasks_for_project(&self, project_id: &EntityId) -> AppResult<Vec<Task>> {
        Ok(self
            .tasks
            .read()
            .await
            .iter()
            .filter(|t| t.belongs_to(project_id))
            .cloned()
            .collect())
    }

    async fn get_task(&self, id: &EntityId) -> AppResult<Task> {
        let tasks = self.tasks.read().await;
        let idx = position(tasks.as_slice(), id, |t| &t.id)?;
        Ok(tasks[idx].clone())
    }

    async fn create_task(&self, task: &NewTask) -> AppResult<Task> {
        let created = Task {
            id: self.issue_id(),
            title: task.title.clone(),
            description: task.description.clone(),
            start_date: Some(task.start_date),
            due_date: Some(task.due_date),
            priority: task.priority,
            status: task.status,
            user_id: Some(task.user_id.clone()),
            project_id: task.project_id.clone(),
        };
        self.tasks.write().await.push(created.clone());
        Ok(created)
    }

    async fn patch_task(&self, id: &EntityId, patch: &TaskPatch) -> AppResult<Task> {
        let mut tasks = self.tasks.write().await;
        let idx = position(tasks.as_slice(), id, |t| &t.id)?;
        let task = &mut tasks[idx];

        if let Some(title) = &patch.title {
            task.title = title.clone();
        }
        if let Some(description) = &patch.description {
            task.description = description.clone();
        }
        if patch.start_date.is_some() {
            task.start_date = patch.start_date;
        }
        if patch.due_date.is_some() {
            task.due_date = patch.due_date;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if patch.user_id.is_some() {
            task.user_id = patch.user_id.clone();
        }
        Ok(task.clone())
    }

    async fn delete_task(&self, id: &EntityId) -> AppResult<()> {
        let mut tasks = self.tasks.write().await;
        let idx = position(tasks.as_slice(), id, |t| &t.id)?;
        tasks.remove(idx);
        Ok(())
    }
}

#[async_trait]
impl HealthProbe for InMemoryBackend {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
