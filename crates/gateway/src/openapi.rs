//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use board_service_lib::{ProjectDetail, TaskCard, TaskColumns};
use domain::{
    CompletedTask, Dashboard, EntityId, Move, Priority, Project, ProjectStats, ProjectStatus,
    ProjectWithStats, Role, Route, Session, StatusCounts, Task, TaskCounts, TaskStatus,
    UserResponse,
};

use crate::handlers::auth_handler::{LoginRequest, RegisterRequest, SessionResponse, SessionStatus};
use crate::handlers::dashboard_handler::{DashboardResponse, NavigationEntry};
use crate::handlers::profile_handler::ChangePasswordRequest;
use crate::handlers::project_handler::{ProjectRequest, TaskRequest};
use crate::handlers::task_handler::UpdateTaskRequest;
use crate::handlers::user_handler::{CreateUserRequest, UpdateUserRequest};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth_handler::register,
        crate::handlers::auth_handler::login,
        crate::handlers::auth_handler::logout,
        crate::handlers::auth_handler::current_session,
        crate::handlers::dashboard_handler::dashboard,
        crate::handlers::dashboard_handler::navigation_entries,
        crate::handlers::project_handler::list_projects,
        crate::handlers::project_handler::get_project,
        crate::handlers::project_handler::create_project,
        crate::handlers::project_handler::update_project,
        crate::handlers::project_handler::delete_project,
        crate::handlers::project_handler::create_task,
        crate::handlers::task_handler::advance_task,
        crate::handlers::task_handler::retreat_task,
        crate::handlers::task_handler::update_task,
        crate::handlers::task_handler::delete_task,
        crate::handlers::profile_handler::get_profile,
        crate::handlers::profile_handler::change_password,
        crate::handlers::user_handler::list_users,
        crate::handlers::user_handler::get_user,
        crate::handlers::user_handler::create_user,
        crate::handlers::user_handler::update_user,
        crate::handlers::user_handler::delete_user,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            SessionResponse,
            SessionStatus,
            Session,
            EntityId,
            Role,
            Route,
            NavigationEntry,
            DashboardResponse,
            Dashboard,
            StatusCounts,
            CompletedTask,
            ProjectWithStats,
            ProjectStats,
            ProjectStatus,
            TaskCounts,
            Project,
            ProjectRequest,
            ProjectDetail,
            TaskColumns,
            TaskCard,
            Task,
            TaskRequest,
            UpdateTaskRequest,
            TaskStatus,
            Priority,
            Move,
            ChangePasswordRequest,
            UserResponse,
            CreateUserRequest,
            UpdateUserRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Session endpoints"),
        (name = "Dashboard", description = "Completion statistics and navigation"),
        (name = "Projects", description = "Project management"),
        (name = "Tasks", description = "Task management and status moves"),
        (name = "Profile", description = "Signed-in user's own account"),
        (name = "Users", description = "User administration"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("opaque session token")
                        .build(),
                ),
            );
        }
    }
}
