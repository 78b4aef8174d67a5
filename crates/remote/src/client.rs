//! HTTP client for the external REST collaborator.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use common::{AppError, AppResult, RemoteConfig};
use domain::{EntityId, NewProject, NewTask, NewUser, Project, Task, TaskPatch, User};

use crate::backend::{HealthProbe, ProjectBackend, TaskBackend, UserBackend};

const USERS: &str = "users";
const PROJECTS: &str = "projects";
const TASKS: &str = "tasks";

/// JSON-over-HTTP client for the `projects`, `tasks` and `users` collections.
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(config: &RemoteConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::internal(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, collection: &str, id: Option<&EntityId>) -> String {
        match id {
            Some(id) => format!("{}/{}/{}", self.base_url, collection, id),
            None => format!("{}/{}", self.base_url, collection),
        }
    }

    fn request(&self, method: Method, collection: &str, id: Option<&EntityId>) -> RequestBuilder {
        let url = self.url(collection, id);
        debug!("{} {}", method, url);
        self.http.request(method, url)
    }

    /// Send and map the response status. `single` marks requests addressed to
    /// one record, where 404 means the record does not exist.
    async fn send(&self, builder: RequestBuilder, single: bool) -> AppResult<Response> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();

        if single && status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound);
        }
        if !status.is_success() {
            return Err(AppError::remote(format!(
                "{} responded {}",
                response.url(),
                status
            )));
        }
        Ok(response)
    }

    async fn read<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| AppError::remote(format!("unexpected response body: {}", e)))
    }

    async fn list<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: &[(&str, &str)],
    ) -> AppResult<Vec<T>> {
        let builder = self.request(Method::GET, collection, None).query(query);
        Self::read(self.send(builder, false).await?).await
    }

    async fn get<T: DeserializeOwned>(&self, collection: &str, id: &EntityId) -> AppResult<T> {
        let builder = self.request(Method::GET, collection, Some(id));
        Self::read(self.send(builder, true).await?).await
    }

    async fn write<B, T>(
        &self,
        method: Method,
        collection: &str,
        id: Option<&EntityId>,
        body: &B,
    ) -> AppResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let single = id.is_some();
        let builder = self.request(method, collection, id).json(body);
        Self::read(self.send(builder, single).await?).await
    }

    async fn delete(&self, collection: &str, id: &EntityId) -> AppResult<()> {
        let builder = self.request(Method::DELETE, collection, Some(id));
        self.send(builder, true).await?;
        Ok(())
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::remote(format!("request timed out: {}", err))
    } else {
        AppError::remote(err.to_string())
    }
}

#[async_trait]
impl UserBackend for RestClient {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.list(USERS, &[]).await
    }

    async fn get_user(&self, id: &EntityId) -> AppResult<User> {
        self.get(USERS, id).await
    }

    async fn create_user(&self, user: &NewUser) -> AppResult<User> {
        self.write(Method::POST, USERS, None, user).await
    }

    async fn replace_user(&self, id: &EntityId, user: &User) -> AppResult<User> {
        let mut body = user.clone();
        body.id = id.clone();
        self.write(Method::PUT, USERS, Some(id), &body).await
    }

    async fn set_password(&self, id: &EntityId, password_hash: &str) -> AppResult<User> {
        let body = serde_json::json!({ "password": password_hash });
        self.write(Method::PATCH, USERS, Some(id), &body).await
    }

    async fn delete_user(&self, id: &EntityId) -> AppResult<()> {
        self.delete(USERS, id).await
    }
}

#[async_trait]
impl ProjectBackend for RestClient {
    async fn list_projects(&self) -> AppResult<Vec<Project>> {
        self.list(PROJECTS, &[]).await
    }

    async fn get_project(&self, id: &EntityId) -> AppResult<Project> {
        self.get(PROJECTS, id).await
    }

    async fn find_project(&self, id: &EntityId) -> AppResult<Option<Project>> {
        let found: Vec<Project> = self.list(PROJECTS, &[("id", id.as_str())]).await?;
        Ok(found.into_iter().find(|p| &p.id == id))
    }

    async fn create_project(&self, project: &NewProject) -> AppResult<Project> {
        self.write(Method::POST, PROJECTS, None, project).await
    }

    async fn replace_project(&self, id: &EntityId, project: &NewProject) -> AppResult<Project> {
        self.write(Method::PUT, PROJECTS, Some(id), project).await
    }

    async fn delete_project(&self, id: &EntityId) -> AppResult<()> {
        self.delete(PROJECTS, id).await
    }
}

#[async_trait]
impl TaskBackend for RestClient {
    async fn list_tasks(&self) -> AppResult<Vec<Task>> {
        self.list(TASKS, &[]).await
    }

    async fn tasks_for_project(&self, project_id: &EntityId) -> AppResult<Vec<Task>> {
        let tasks: Vec<Task> = self
            .list(TASKS, &[("projectId", project_id.as_str())])
            .await?;
        // The filter is repeated locally: ids may be stored as numbers or strings.
        Ok(tasks.into_iter().filter(|t| t.belongs_to(project_id)).collect())
    }

    async fn get_task(&self, id: &EntityId) -> AppResult<Task> {
        self.get(TASKS, id).await
    }

    async fn create_task(&self, task: &NewTask) -> AppResult<Task> {
        self.write(Method::POST, TASKS, None, task).await
    }

    async fn patch_task(&self, id: &EntityId, patch: &TaskPatch) -> AppResult<Task> {
        self.write(Method::PATCH, TASKS, Some(id), patch).await
    }

    async fn delete_task(&self, id: &EntityId) -> AppResult<()> {
        self.delete(TASKS, id).await
    }
}

#[async_trait]
impl HealthProbe for RestClient {
    async fn ping(&self) -> AppResult<()> {
        self.http
            .get(&self.base_url)
            .send()
            .await
            .map_err(transport_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = RestClient::new(&RemoteConfig::new("http://api.local/")).unwrap();
        assert_eq!(client.base_url(), "http://api.local");
        assert_eq!(client.url(TASKS, None), "http://api.local/tasks");
        assert_eq!(
            client.url(PROJECTS, Some(&EntityId::from(7u64))),
            "http://api.local/projects/7"
        );
    }
}
