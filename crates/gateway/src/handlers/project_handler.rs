//! Project handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use board_service_lib::ProjectDetail;
use common::AppResult;
use domain::{EntityId, Priority, Project, ProjectDraft, ProjectWithStats, Task, TaskDraft};

use crate::extractors::{CurrentSession, ManagerSession, ValidatedJson};
use crate::state::AppState;

/// Project create/edit form
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    #[validate(length(min = 1, message = "Project name is required"))]
    #[schema(example = "Website relaunch")]
    pub name: String,
    #[validate(length(min = 1, message = "Project description is required"))]
    pub description: String,
    #[schema(value_type = Option<String>, format = Date, example = "2024-03-01")]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date, example = "2024-06-30")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<ProjectRequest> for ProjectDraft {
    fn from(req: ProjectRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            start_date: req.start_date,
            end_date: req.end_date,
            image_url: req.image_url,
        }
    }
}

/// Task create form
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    #[validate(length(min = 1, message = "Task title is required"))]
    #[schema(example = "Wireframes")]
    pub title: String,
    #[validate(length(min = 1, message = "Task description is required"))]
    pub description: String,
    #[schema(value_type = Option<String>, format = Date, example = "2024-03-04")]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date, example = "2024-03-15")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    /// Assignee
    #[schema(value_type = Option<String>)]
    pub user_id: Option<EntityId>,
}

impl From<TaskRequest> for TaskDraft {
    fn from(req: TaskRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            start_date: req.start_date,
            due_date: req.due_date,
            priority: req.priority,
            user_id: req.user_id,
        }
    }
}

/// Create project routes
pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route(
            "/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/:id/tasks", post(create_task))
}

/// List all projects with their progress
#[utoipa::path(
    get,
    path = "/projects",
    tag = "Projects",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Projects with stats", body = Vec<ProjectWithStats>),
        (status = 303, description = "Not signed in"),
        (status = 502, description = "REST collaborator failed")
    )
)]
pub async fn list_projects(
    _current: CurrentSession,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProjectWithStats>>> {
    Ok(Json(state.board.projects().await?))
}

/// Project page: stats, remaining days and task columns
#[utoipa::path(
    get,
    path = "/projects/{id}",
    tag = "Projects",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project detail", body = ProjectDetail),
        (status = 303, description = "Not signed in"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn get_project(
    _current: CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProjectDetail>> {
    let detail = state.board.project_detail(&EntityId::from(id)).await?;
    Ok(Json(detail))
}

/// Create a project managed by the caller (gerente only)
#[utoipa::path(
    post,
    path = "/projects",
    tag = "Projects",
    security(("bearer_auth" = [])),
    request_body = ProjectRequest,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 303, description = "Not signed in or not a manager"),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_project(
    manager: ManagerSession,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProjectRequest>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let project = state
        .board
        .create_project(manager.session(), payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// Edit a project (gerente only)
#[utoipa::path(
    put,
    path = "/projects/{id}",
    tag = "Projects",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Project ID")
    ),
    request_body = ProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = Project),
        (status = 303, description = "Not signed in or not a manager"),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn update_project(
    manager: ManagerSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<ProjectRequest>,
) -> AppResult<Json<Project>> {
    let project = state
        .board
        .update_project(manager.session(), &EntityId::from(id), payload.into())
        .await?;

    Ok(Json(project))
}

/// Delete a project and its tasks (gerente only)
#[utoipa::path(
    delete,
    path = "/projects/{id}",
    tag = "Projects",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Project ID")
    ),
    responses(
        (status = 204, description = "Project and its tasks deleted"),
        (status = 303, description = "Not signed in or not a manager"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn delete_project(
    _manager: ManagerSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.board.delete_project(&EntityId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a task to a project (gerente only)
#[utoipa::path(
    post,
    path = "/projects/{id}/tasks",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Project ID")
    ),
    request_body = TaskRequest,
    responses(
        (status = 201, description = "Task created as pending", body = Task),
        (status = 303, description = "Not signed in or not a manager"),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn create_task(
    _manager: ManagerSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<TaskRequest>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let task = state
        .board
        .create_task(&EntityId::from(id), payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}
