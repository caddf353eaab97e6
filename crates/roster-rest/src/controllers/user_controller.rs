//! User resource controller.

use crate::{
    extractors::{JsonBody, JsonBodyRejection},
    responses::{created, ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use roster_core::{ErrorResponse, RosterError, UserId};
use roster_service::{CreateUserRequest, MessageResponse, UpdateUserRequest, UserResponse};
use tracing::debug;

/// Body returned after a successful delete.
pub const DELETED_MESSAGE: &str = "User deleted successfully";

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user)
                .put(update_user)
                .patch(update_user)
                .delete(delete_user),
        )
}

/// List all users.
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    summary = "Get all users",
    responses(
        (status = 200, description = "List of users", body = [UserResponse]),
        (status = 500, description = "Server error", body = ErrorResponse)
    )
)]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<UserResponse>> {
    debug!("List users request");

    let response = state.user_service.list_users().await?;
    ok(response)
}

/// Create a new user.
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    summary = "Create a new user",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    debug!("Create user request: {:?}", request.email.as_str());

    let response = state.user_service.create_user(request).await?;
    Ok(created(response))
}

/// Get a user by ID.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    summary = "Get user by ID",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<UserResponse> {
    debug!("Get user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let response = state.user_service.get_user(user_id).await?;
    ok(response)
}

/// Update a user. Only the supplied fields change.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    summary = "Update user",
    description = "Also served for PATCH. Absent fields are left unchanged; null fields fail validation.",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<JsonBody<UpdateUserRequest>, JsonBodyRejection>,
) -> Result<Json<UserResponse>, Response> {
    debug!("Update user request: {}", id);

    let user_id = parse_user_id(&id).map_err(IntoResponse::into_response)?;
    let request = match body {
        Ok(JsonBody(request)) => request,
        Err(rejection) => {
            // An unknown user is reported before anything about the body.
            state
                .user_service
                .get_user(user_id)
                .await
                .map_err(|e| AppError(e).into_response())?;
            return Err(rejection.into_response());
        }
    };

    let response = state
        .user_service
        .update_user(user_id, request)
        .await
        .map_err(|e| AppError(e).into_response())?;
    Ok(Json(response))
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    summary = "Delete user",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted successfully", body = MessageResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    debug!("Delete user request: {}", id);

    let user_id = parse_user_id(&id)?;
    state.user_service.delete_user(user_id).await?;

    ok(MessageResponse::new(DELETED_MESSAGE))
}

/// Parses the path id. An id that is not a UUID cannot name a user.
fn parse_user_id(id: &str) -> Result<UserId, AppError> {
    UserId::parse(id).map_err(|_| AppError(RosterError::not_found("User", id)))
}
