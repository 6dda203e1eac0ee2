//! Profile management handlers
//!
//! Routes for updating role-specific profile data, profile pictures, and
//! self-service account deletion. All routes require authentication; the
//! mutation routes additionally require a verified email.

use crate::auth::{AlumniUpdate, AuthService, CurrentUser, StudentUpdate};
use crate::error::AppError;
use crate::extract::ValidatedJson;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::uploads;
use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Extension,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlumniRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
    #[validate(range(min = 1950, max = 2100, message = "Graduation year is out of range"))]
    pub graduation_year: Option<i32>,
    pub degree: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub industry: Option<String>,
    pub linked_in: Option<String>,
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
    #[validate(range(min = 1950, max = 2100, message = "Enrollment year is out of range"))]
    pub enrollment_year: Option<i32>,
    pub expected_graduation_year: Option<i32>,
    pub major: Option<String>,
    pub interests: Option<Vec<String>>,
}

/// Update the current alumni account
#[utoipa::path(
    put,
    path = "/api/v1/auth/updateAlumniAccount",
    tag = "profile",
    request_body = UpdateAlumniRequest,
    responses(
        (status = 200, description = "Account updated", body = crate::auth::UserPublic),
        (status = 401, description = "Unauthorized or email not verified"),
        (status = 404, description = "Current user is not an alumni"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_alumni_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(request): ValidatedJson<UpdateAlumniRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::from_state(&state);
    let updated = service
        .update_alumni(
            user.id,
            AlumniUpdate {
                name: request.name,
                bio: request.bio,
                graduation_year: request.graduation_year,
                degree: request.degree,
                company: request.company,
                position: request.position,
                industry: request.industry,
                linked_in: request.linked_in,
                skills: request.skills,
            },
        )
        .await?;
    Ok(ApiResponse::ok(updated, "Account updated successfully"))
}

/// Update the current student account
#[utoipa::path(
    put,
    path = "/api/v1/auth/updateStudentAccount",
    tag = "profile",
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Account updated", body = crate::auth::UserPublic),
        (status = 401, description = "Unauthorized or email not verified"),
        (status = 404, description = "Current user is not a student"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_student_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(request): ValidatedJson<UpdateStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::from_state(&state);
    let updated = service
        .update_student(
            user.id,
            StudentUpdate {
                name: request.name,
                bio: request.bio,
                enrollment_year: request.enrollment_year,
                expected_graduation_year: request.expected_graduation_year,
                major: request.major,
                interests: request.interests,
            },
        )
        .await?;
    Ok(ApiResponse::ok(updated, "Account updated successfully"))
}

/// Replace the current user's profile picture
///
/// Accepts a multipart form with a `profilePicture` image field. The old
/// file is removed after the document update succeeds.
#[utoipa::path(
    put,
    path = "/api/v1/auth/changeProfilePic",
    tag = "profile",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Profile picture updated", body = crate::auth::UserPublic),
        (status = 400, description = "Missing file or unsupported image type"),
        (status = 401, description = "Unauthorized or email not verified"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_profile_pic_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut stored: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("profilePicture") {
            continue;
        }

        let file_name = field
            .file_name()
            .ok_or_else(|| AppError::BadRequest("Missing file name".to_string()))?
            .to_string();
        let content_type = field
            .content_type()
            .ok_or_else(|| AppError::BadRequest("Missing content type".to_string()))?
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        stored = Some(
            uploads::save_image(&state.config.uploads, &file_name, &content_type, &data).await?,
        );
        break;
    }

    let path = stored
        .ok_or_else(|| AppError::BadRequest("Profile picture file is required".to_string()))?;

    let service = AuthService::from_state(&state);
    let (updated, old) = service.set_profile_picture(user.id, path).await?;

    if let Some(old) = old {
        uploads::remove_upload(&old).await;
    }

    Ok(ApiResponse::ok(updated, "Profile picture updated"))
}

/// Delete the current user's profile picture
#[utoipa::path(
    delete,
    path = "/api/v1/auth/deleteProfilePic",
    tag = "profile",
    responses(
        (status = 200, description = "Profile picture deleted"),
        (status = 400, description = "No profile picture to delete"),
        (status = 401, description = "Unauthorized or email not verified"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_profile_pic_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::from_state(&state);
    let path = service.clear_profile_picture(user.id).await?;

    uploads::remove_upload(&path).await;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Profile picture deleted successfully",
    ))
}

/// Delete an account
///
/// Users may only delete their own account; any other id is rejected.
#[utoipa::path(
    delete,
    path = "/api/v1/auth/deleteUser/{id}",
    tag = "profile",
    params(("id" = Uuid, Path, description = "Account id, must match the authenticated user")),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Attempt to delete another user"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::from_state(&state);
    service.delete_account(user.id, id).await?;
    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "User deleted successfully",
    ))
}
