//! Admin user-management handlers
//!
//! All routes here sit behind the auth middleware plus an admin role
//! guard; a non-admin caller never reaches a handler.

use crate::auth::AuthService;
use crate::error::AppError;
use crate::extract::ValidatedJson;
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAdminRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,
    #[validate(email(message = "Must be a valid email"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/v1/admin/allUsers",
    tag = "admin",
    responses(
        (status = 200, description = "All users", body = [crate::auth::UserPublic]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an admin"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::from_state(&state);
    let users = service.list_users().await?;
    Ok(ApiResponse::ok(users, "Users fetched successfully"))
}

/// Fetch a single user by id
#[utoipa::path(
    get,
    path = "/api/v1/admin/user/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = crate::auth::UserPublic),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "No such user"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::from_state(&state);
    let user = service.get_user(id).await?;
    Ok(ApiResponse::ok(user, "User fetched successfully"))
}

/// Create another admin account
///
/// Admin accounts skip email verification.
#[utoipa::path(
    post,
    path = "/api/v1/admin/users",
    tag = "admin",
    request_body = CreateAdminRequest,
    responses(
        (status = 201, description = "Admin created", body = crate::auth::UserPublic),
        (status = 400, description = "Invalid input or email already registered"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an admin"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_admin_handler(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateAdminRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::from_state(&state);
    let user = service
        .create_admin(request.name, request.email, request.password)
        .await?;
    Ok(ApiResponse::created(user, "Admin account created successfully"))
}

/// Delete any user account
#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "No such user"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_delete_user_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::from_state(&state);
    service.admin_delete_user(id).await?;
    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "User deleted successfully",
    ))
}
