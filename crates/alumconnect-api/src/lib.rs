//! AlumConnect API
//!
//! REST server for the AlumConnect alumni/student network: JWT
//! authentication with rotating refresh tokens, email verification and
//! password reset, role-guarded profile management, and an admin surface.

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod mail;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;
pub mod uploads;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::auth::signup_alumni_handler,
        handlers::auth::signup_student_handler,
        handlers::auth::login_handler,
        handlers::auth::logout_handler,
        handlers::auth::refresh_handler,
        handlers::auth::me_handler,
        handlers::auth::change_password_handler,
        handlers::auth::forgot_password_handler,
        handlers::auth::reset_password_handler,
        handlers::auth::verify_email_handler,
        handlers::auth::resend_verification_handler,
        handlers::profile::update_alumni_handler,
        handlers::profile::update_student_handler,
        handlers::profile::change_profile_pic_handler,
        handlers::profile::delete_profile_pic_handler,
        handlers::profile::delete_user_handler,
        handlers::users::list_users_handler,
        handlers::users::get_user_handler,
        handlers::users::create_admin_handler,
        handlers::users::admin_delete_user_handler,
    ),
    components(
        schemas(
            auth::models::Role,
            auth::models::AlumniProfile,
            auth::models::StudentProfile,
            auth::models::RoleProfile,
            auth::models::UserPublic,
            auth::models::UserSummary,
            handlers::auth::SignupAlumniRequest,
            handlers::auth::SignupStudentRequest,
            handlers::auth::LoginRequest,
            handlers::auth::RefreshTokenBody,
            handlers::auth::ChangePasswordRequest,
            handlers::auth::ForgotPasswordRequest,
            handlers::auth::ResetPasswordRequest,
            handlers::auth::AuthData,
            handlers::auth::TokenData,
            handlers::profile::UpdateAlumniRequest,
            handlers::profile::UpdateStudentRequest,
            handlers::users::CreateAdminRequest,
            handlers::health::HealthResponse,
            error::FieldError,
        )
    ),
    tags(
        (name = "auth", description = "Signup, login, tokens, and email flows"),
        (name = "profile", description = "Profile management for the current user"),
        (name = "admin", description = "Admin-only user management"),
        (name = "health", description = "Service health")
    ),
    info(
        title = "AlumConnect API",
        version = "0.1.0",
        description = "Alumni/student network backend",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "statusCode": 404,
            "data": null,
            "message": "Route not found",
            "success": false,
            "errors": [],
        })),
    )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
}

/// Build the full application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router over a fresh in-memory state, for tests.
pub fn create_router_for_testing() -> Router {
    create_router(Arc::new(AppState::default()))
}
