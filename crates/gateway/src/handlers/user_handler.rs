//! User administration handlers (gerente only).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::{AppError, AppResult};
use domain::{EntityId, NewUser, Role, UserChanges, UserResponse};

use crate::extractors::{ManagerSession, ValidatedJson};
use crate::state::AppState;

/// New account form
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Luis Gómez")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "luis@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(min_length = 8)]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// Account edit form. Leave `password` out to keep the current one.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    pub role: Role,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// List all users, refreshing the directory
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of all users", body = Vec<UserResponse>),
        (status = 303, description = "Not signed in or not a manager")
    )
)]
pub async fn list_users(
    _manager: ManagerSession,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.users.refresh().await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 303, description = "Not signed in or not a manager"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    _manager: ManagerSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state.users.get_user(&EntityId::from(id)).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Create an account
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 303, description = "Not signed in or not a manager"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    _manager: ManagerSession,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .users
        .add(NewUser {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            role: payload.role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Replace an account's name, email, role and optionally password.
/// Open sessions of that account pick up the new name and role.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 303, description = "Not signed in or not a manager"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email used by another user")
    )
)]
pub async fn update_user(
    _manager: ManagerSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .users
        .update(
            &EntityId::from(id),
            UserChanges {
                name: payload.name,
                email: payload.email,
                password: payload.password,
                role: payload.role,
            },
        )
        .await?;
    state.sessions.sync_user(&user).await?;

    Ok(Json(UserResponse::from(user)))
}

/// Delete an account (not your own) and close its sessions
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Cannot delete your own account"),
        (status = 303, description = "Not signed in or not a manager"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    manager: ManagerSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = EntityId::from(id);
    if manager.session().id == id {
        return Err(AppError::validation("Cannot delete your own account"));
    }

    state.users.remove(&id).await?;
    state.sessions.revoke_user(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
