//! Profile handlers for the signed-in user.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::UserResponse;
use user_service_lib::PasswordChange;

use crate::extractors::{CurrentSession, ValidatedJson};
use crate::state::AppState;

/// Password change form
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[schema(min_length = 8)]
    pub new_password: String,
    pub confirm_password: String,
}

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile))
        .route("/password", put(change_password))
}

/// Profile of the signed-in user
#[utoipa::path(
    get,
    path = "/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 303, description = "Not signed in")
    )
)]
pub async fn get_profile(
    current: CurrentSession,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse>> {
    let user = state.profiles.profile(&current.session.id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Change the signed-in user's password
#[utoipa::path(
    put,
    path = "/profile/password",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Passwords do not match or the new one is too short"),
        (status = 401, description = "Current password is wrong"),
        (status = 303, description = "Not signed in")
    )
)]
pub async fn change_password(
    current: CurrentSession,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    state
        .profiles
        .change_password(
            &current.session.id,
            PasswordChange {
                current: payload.current_password,
                new: payload.new_password,
                confirm: payload.confirm_password,
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
