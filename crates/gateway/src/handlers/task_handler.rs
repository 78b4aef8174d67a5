//! Task handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{patch, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{EntityId, Move, Priority, Task, TaskPatch, TaskStatus};

use crate::extractors::{CurrentSession, ManagerSession, ValidatedJson};
use crate::state::AppState;

/// Task edit form. Absent fields are left as they are.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, message = "Task title is required"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Task description is required"))]
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    #[schema(value_type = Option<String>)]
    pub user_id: Option<EntityId>,
}

impl From<UpdateTaskRequest> for TaskPatch {
    fn from(req: UpdateTaskRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            start_date: req.start_date,
            due_date: req.due_date,
            priority: req.priority,
            status: req.status,
            user_id: req.user_id,
        }
    }
}

/// Create task routes
pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", patch(update_task).delete(delete_task))
        .route("/:id/advance", post(advance_task))
        .route("/:id/retreat", post(retreat_task))
}

/// Move a task one step towards `finalizado` (assignee or gerente)
#[utoipa::path(
    post,
    path = "/tasks/{id}/advance",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task moved", body = Task),
        (status = 400, description = "Task is already finished"),
        (status = 403, description = "Not the assignee nor a manager"),
        (status = 404, description = "Task not found")
    )
)]
pub async fn advance_task(
    current: CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Task>> {
    move_task(current, state, id, Move::Advance).await
}

/// Move a task one step back towards `pendiente` (assignee or gerente)
#[utoipa::path(
    post,
    path = "/tasks/{id}/retreat",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task moved", body = Task),
        (status = 400, description = "Task is still pending"),
        (status = 403, description = "Not the assignee nor a manager"),
        (status = 404, description = "Task not found")
    )
)]
pub async fn retreat_task(
    current: CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Task>> {
    move_task(current, state, id, Move::Retreat).await
}

async fn move_task(
    current: CurrentSession,
    state: AppState,
    id: String,
    step: Move,
) -> AppResult<Json<Task>> {
    let task = state
        .board
        .move_task(&current.session, &EntityId::from(id), step)
        .await?;
    Ok(Json(task))
}

/// Edit a task (gerente only)
#[utoipa::path(
    patch,
    path = "/tasks/{id}",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 303, description = "Not signed in or not a manager"),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Task not found")
    )
)]
pub async fn update_task(
    _manager: ManagerSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateTaskRequest>,
) -> AppResult<Json<Task>> {
    let task = state
        .board
        .update_task(&EntityId::from(id), payload.into())
        .await?;
    Ok(Json(task))
}

/// Delete a task (gerente only)
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    tag = "Tasks",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 303, description = "Not signed in or not a manager"),
        (status = 404, description = "Task not found")
    )
)]
pub async fn delete_task(
    _manager: ManagerSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.board.delete_task(&EntityId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
