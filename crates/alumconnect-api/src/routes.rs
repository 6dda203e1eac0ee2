//! API route definitions
//!
//! Routes are grouped by guard: public, authenticated, authenticated plus
//! verified email, and admin-only. The auth middleware is applied last on
//! each guarded group so it runs before the role and verification guards,
//! keeping 401 ahead of 403.

use crate::auth::middleware::{auth_middleware, ensure_verified, require_role};
use crate::auth::Role;
use crate::handlers::{auth, profile, users};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

const JSON_BODY_LIMIT: usize = 16 * 1024;

/// Create API v1 routes
pub fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let public_routes = Router::new()
        .route("/auth/signup/alumni", post(auth::signup_alumni_handler))
        .route("/auth/signup/student", post(auth::signup_student_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/refreshAccessToken", post(auth::refresh_handler))
        .route("/auth/forgotPassword", post(auth::forgot_password_handler))
        .route("/auth/resetpassword/:token", post(auth::reset_password_handler))
        .route("/auth/verify-email/:token", get(auth::verify_email_handler))
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT));

    let protected_routes = Router::new()
        .route("/auth/logout", post(auth::logout_handler))
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/auth/changeCurrentPassword",
            put(auth::change_password_handler),
        )
        .route(
            "/auth/resend-verification-email",
            post(auth::resend_verification_handler),
        )
        .route("/auth/deleteUser/:id", delete(profile::delete_user_handler))
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Profile mutation requires a verified email on top of authentication.
    let verified_routes = Router::new()
        .route(
            "/auth/updateAlumniAccount",
            put(profile::update_alumni_handler),
        )
        .route(
            "/auth/updateStudentAccount",
            put(profile::update_student_handler),
        )
        .route(
            "/auth/changeProfilePic",
            put(profile::change_profile_pic_handler)
                .layer(DefaultBodyLimit::max(6 * 1024 * 1024)),
        )
        .route(
            "/auth/deleteProfilePic",
            delete(profile::delete_profile_pic_handler),
        )
        .layer(middleware::from_fn(ensure_verified))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route("/admin/allUsers", get(users::list_users_handler))
        .route("/admin/user/:id", get(users::get_user_handler))
        .route("/admin/users", post(users::create_admin_handler))
        .route("/admin/users/:id", delete(users::admin_delete_user_handler))
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(middleware::from_fn(require_role(&[Role::Admin])))
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(verified_routes)
        .merge(admin_routes)
}
