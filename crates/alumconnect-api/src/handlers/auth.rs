//! Authentication API handlers
//!
//! HTTP surface for signup, login, token refresh, and the email-driven
//! verification and password-reset flows. Token pairs are returned in the
//! response body and mirrored as httpOnly cookies.

use crate::auth::{AuthService, AuthTokens, CurrentUser, NewAlumni, NewStudent, UserPublic};
use crate::error::AppError;
use crate::extract::ValidatedJson;
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Signup payload for alumni accounts
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupAlumniRequest {
    #[validate(email(message = "Must be a valid email"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,
    #[validate(range(min = 1950, max = 2100, message = "Graduation year is out of range"))]
    pub graduation_year: i32,
    #[validate(length(min = 2, message = "Degree is required"))]
    pub degree: String,
    pub company: Option<String>,
    pub position: Option<String>,
}

/// Signup payload for student accounts
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_student_years"))]
pub struct SignupStudentRequest {
    #[validate(email(message = "Must be a valid email"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,
    #[validate(range(min = 1950, max = 2100, message = "Enrollment year is out of range"))]
    pub enrollment_year: i32,
    pub expected_graduation_year: i32,
    #[validate(length(min = 2, message = "Major is required"))]
    pub major: String,
    #[validate(length(min = 1, message = "Student ID is required"))]
    pub student_id: String,
}

fn validate_student_years(req: &SignupStudentRequest) -> Result<(), ValidationError> {
    if req.expected_graduation_year <= req.enrollment_year {
        return Err(ValidationError::new("expected_graduation_year")
            .with_message("Expected graduation year must be after enrollment year".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Must be a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Optional body for refresh; the cookie takes precedence.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenBody {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Must be a valid email"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login/signup response payload: the user plus the token pair.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub user: UserPublic,
    pub access_token: String,
    pub refresh_token: String,
}

impl AuthData {
    fn new(user: UserPublic, tokens: AuthTokens) -> Self {
        Self {
            user,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }
}

/// Refresh response payload: just the rotated token pair.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenData {
    pub access_token: String,
    pub refresh_token: String,
}

fn secure_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(true)
        .path("/")
        .build()
}

/// Set both token cookies on the jar.
fn with_auth_cookies(jar: CookieJar, tokens: &AuthTokens) -> CookieJar {
    jar.add(secure_cookie(ACCESS_COOKIE, tokens.access_token.clone()))
        .add(secure_cookie(REFRESH_COOKIE, tokens.refresh_token.clone()))
}

fn without_auth_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(secure_cookie(ACCESS_COOKIE, String::new()))
        .remove(secure_cookie(REFRESH_COOKIE, String::new()))
}

/// Register a new alumni account
///
/// Creates an unverified alumni account, emails a verification link, and
/// logs the new user in with a token pair.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup/alumni",
    tag = "auth",
    request_body = SignupAlumniRequest,
    responses(
        (status = 201, description = "Alumni account created", body = AuthData),
        (status = 400, description = "Invalid input or email already registered"),
    )
)]
pub async fn signup_alumni_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<SignupAlumniRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::from_state(&state);
    let (user, tokens) = service
        .signup_alumni(NewAlumni {
            email: request.email,
            password: request.password,
            name: request.name,
            graduation_year: request.graduation_year,
            degree: request.degree,
            company: request.company,
            position: request.position,
        })
        .await?;

    let jar = with_auth_cookies(jar, &tokens);
    Ok((
        jar,
        ApiResponse::created(
            AuthData::new(user, tokens),
            "Alumni account created successfully. A verification email is sent to verify your email. If you did not receive any email, you can ask to resend Verification Email.",
        ),
    ))
}

/// Register a new student account
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup/student",
    tag = "auth",
    request_body = SignupStudentRequest,
    responses(
        (status = 201, description = "Student account created", body = AuthData),
        (status = 400, description = "Invalid input, email or student ID already registered"),
    )
)]
pub async fn signup_student_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<SignupStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::from_state(&state);
    let (user, tokens) = service
        .signup_student(NewStudent {
            email: request.email,
            password: request.password,
            name: request.name,
            enrollment_year: request.enrollment_year,
            expected_graduation_year: request.expected_graduation_year,
            major: request.major,
            student_id: request.student_id,
        })
        .await?;

    let jar = with_auth_cookies(jar, &tokens);
    Ok((
        jar,
        ApiResponse::created(
            AuthData::new(user, tokens),
            "Student account created successfully. A verification email is sent to verify your email. If you did not receive any email, you can ask to resend Verification Email.",
        ),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthData),
        (status = 401, description = "Invalid credentials"),
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::from_state(&state);
    let (user, tokens) = service.login(&request.email, &request.password).await?;

    let jar = with_auth_cookies(jar, &tokens);
    Ok((
        jar,
        ApiResponse::ok(AuthData::new(user, tokens), "User logged in successfully"),
    ))
}

/// Logout the current session
///
/// Drops the stored refresh token and clears both token cookies.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::from_state(&state);
    service.logout(user.id).await?;

    let jar = without_auth_cookies(jar);
    Ok((
        jar,
        ApiResponse::ok(serde_json::json!({}), "User logged out successfully."),
    ))
}

/// Exchange a refresh token for a fresh pair
///
/// The token is read from the `refreshToken` cookie first, then from the
/// optional JSON body. The stored token rotates on every redemption.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refreshAccessToken",
    tag = "auth",
    request_body(content = RefreshTokenBody, description = "Refresh token (optional if cookie is set)"),
    responses(
        (status = 200, description = "Token refreshed", body = TokenData),
        (status = 401, description = "Invalid, expired, or already used refresh token"),
    )
)]
pub async fn refresh_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: Option<Json<RefreshTokenBody>>,
) -> Result<impl IntoResponse, AppError> {
    let incoming = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| body.and_then(|Json(b)| b.refresh_token))
        .ok_or_else(|| AppError::Unauthorized("Unauthorized request".to_string()))?;

    let service = AuthService::from_state(&state);
    let (_, tokens) = service.refresh(&incoming).await?;

    let jar = with_auth_cookies(jar, &tokens);
    Ok((
        jar,
        ApiResponse::ok(
            TokenData {
                access_token: tokens.access_token.clone(),
                refresh_token: tokens.refresh_token.clone(),
            },
            "Access token refreshed successfully",
        ),
    ))
}

/// Get the current user's profile
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = UserPublic),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::from_state(&state);
    let public = service.me(user.id).await?;
    Ok(ApiResponse::ok(public, "Current user fetched successfully"))
}

/// Change the current user's password
#[utoipa::path(
    put,
    path = "/api/v1/auth/changeCurrentPassword",
    tag = "auth",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Old password does not match"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_password_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::from_state(&state);
    service
        .change_password(user.id, &request.old_password, &request.new_password)
        .await?;
    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Password changed successfully",
    ))
}

/// Request a password-reset email
#[utoipa::path(
    post,
    path = "/api/v1/auth/forgotPassword",
    tag = "auth",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset email sent"),
        (status = 404, description = "No account with that email"),
        (status = 500, description = "Email could not be sent"),
    )
)]
pub async fn forgot_password_handler(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::from_state(&state);
    service.forgot_password(&request.email).await?;
    Ok(ApiResponse::ok(serde_json::json!({}), "Email sent"))
}

/// Redeem a reset token and set a new password
///
/// Consumes the token and logs the user in with a fresh token pair.
#[utoipa::path(
    post,
    path = "/api/v1/auth/resetpassword/{token}",
    tag = "auth",
    params(("token" = String, Path, description = "Reset token from the emailed link")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = AuthData),
        (status = 400, description = "Invalid or expired token"),
    )
)]
pub async fn reset_password_handler(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::from_state(&state);
    let (user, tokens) = service.reset_password(&token, &request.password).await?;

    let jar = with_auth_cookies(jar, &tokens);
    Ok((
        jar,
        ApiResponse::ok(AuthData::new(user, tokens), "Password reset successful"),
    ))
}

/// Redeem an email-verification token
#[utoipa::path(
    get,
    path = "/api/v1/auth/verify-email/{token}",
    tag = "auth",
    params(("token" = String, Path, description = "Verification token from the emailed link")),
    responses(
        (status = 200, description = "Email verified", body = UserPublic),
        (status = 400, description = "Invalid verification token"),
    )
)]
pub async fn verify_email_handler(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::from_state(&state);
    let user = service.verify_email(&token).await?;
    Ok(ApiResponse::ok(user, "Email verification successful"))
}

/// Resend the verification email
#[utoipa::path(
    post,
    path = "/api/v1/auth/resend-verification-email",
    tag = "auth",
    responses(
        (status = 200, description = "Verification email sent"),
        (status = 400, description = "Email already verified"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Email could not be sent"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn resend_verification_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::from_state(&state);
    service.resend_verification(user.id).await?;
    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Verification email sent",
    ))
}
