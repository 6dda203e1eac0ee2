//! API Integration Tests
//!
//! Exercises the full router against the in-memory store, end to end:
//! signup, login, token refresh and rotation, the email-driven flows, and
//! the role guards.

use alumconnect_api::auth::{hash_password, MemoryUserStore, RoleProfile, User, UserStore};
use alumconnect_api::mail::{MailError, Mailer};
use alumconnect_api::state::AppState;
use alumconnect_api::{create_router, create_router_for_testing};
use alumconnect_core::AppConfig;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

/// Captures outgoing mail so tests can pull emailed one-time tokens.
#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, _to: &str, _subject: &str, body: &str) -> Result<(), MailError> {
        self.sent.lock().await.push(body.to_string());
        Ok(())
    }
}

impl RecordingMailer {
    /// Last emailed one-time token (final path segment of the link).
    async fn last_token(&self) -> String {
        self.sent
            .lock()
            .await
            .last()
            .unwrap()
            .lines()
            .find(|l| l.starts_with("http"))
            .and_then(|l| l.rsplit('/').next())
            .unwrap()
            .to_string()
    }
}

fn test_app_with_mailer() -> (Router, Arc<RecordingMailer>, Arc<MemoryUserStore>) {
    let mailer = Arc::new(RecordingMailer::default());
    let store = Arc::new(MemoryUserStore::new());
    let state = Arc::new(AppState::new(
        AppConfig::default(),
        store.clone(),
        mailer.clone(),
    ));
    (create_router(state), mailer, store)
}

fn json_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    match body {
        Some(json_body) => builder
            .body(Body::from(serde_json::to_string(&json_body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn bearer_request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"));

    match body {
        Some(json_body) => builder
            .body(Body::from(serde_json::to_string(&json_body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn alumni_signup_body(email: &str) -> Value {
    json!({
        "email": email,
        "password": "SecurePass123!",
        "name": "Ada Lovelace",
        "graduationYear": 2018,
        "degree": "BSc Computer Science"
    })
}

fn student_signup_body(email: &str, student_id: &str) -> Value {
    json!({
        "email": email,
        "password": "SecurePass123!",
        "name": "Sam Student",
        "enrollmentYear": 2023,
        "expectedGraduationYear": 2027,
        "major": "Mathematics",
        "studentId": student_id
    })
}

/// Signup an alumni and return (access token, refresh token, user id).
async fn signup_alumni(app: &Router, email: &str) -> (String, String, String) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/signup/alumni",
            Some(alumni_signup_body(email)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    (
        json["data"]["accessToken"].as_str().unwrap().to_string(),
        json["data"]["refreshToken"].as_str().unwrap().to_string(),
        json["data"]["user"]["id"].as_str().unwrap().to_string(),
    )
}

/// Seed an admin directly in the store and log in through the API.
async fn seeded_admin_token(app: &Router, store: &MemoryUserStore) -> String {
    let mut admin = User::new(
        "root@alum.example".to_string(),
        hash_password("AdminPass123!").unwrap(),
        "Root".to_string(),
        RoleProfile::Admin,
    );
    admin.is_verified = true;
    store.create(admin).await.unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            Some(json!({"email": "root@alum.example", "password": "AdminPass123!"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    json["data"]["accessToken"].as_str().unwrap().to_string()
}

// =============================================================================
// Health and fallback
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_unknown_route_returns_envelope_404() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Route not found");
    assert_eq!(json["success"], false);
}

// =============================================================================
// Signup
// =============================================================================

#[tokio::test]
async fn test_signup_alumni_sets_cookies_and_hides_secrets() {
    let (app, mailer, _) = test_app_with_mailer();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/signup/alumni",
            Some(alumni_signup_body("ada@alum.example")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let cookies: Vec<_> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert!(cookies.iter().any(|c| c.starts_with("accessToken=")));
    assert!(cookies.iter().any(|c| c.starts_with("refreshToken=")));
    assert!(cookies.iter().all(|c| c.contains("HttpOnly")));

    let json = body_json(response).await;
    assert_eq!(json["statusCode"], 201);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["user"]["email"], "ada@alum.example");
    assert_eq!(json["data"]["user"]["isVerified"], false);
    assert_eq!(json["data"]["user"]["userType"], "Alumni");

    // Secret fields never serialize.
    let user = json["data"]["user"].as_object().unwrap();
    assert!(!user.contains_key("passwordHash"));
    assert!(!user.contains_key("refreshToken"));
    assert!(!user.contains_key("verificationTokenHash"));
    assert!(!user.contains_key("resetTokenHash"));

    // Verification email went out.
    assert_eq!(mailer.sent.lock().await.len(), 1);
}

#[tokio::test]
async fn test_signup_duplicate_email_rejected() {
    let (app, _, _) = test_app_with_mailer();
    signup_alumni(&app, "dup@alum.example").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/signup/alumni",
            Some(alumni_signup_body("dup@alum.example")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Alumni already exists with this email");
}

#[tokio::test]
async fn test_signup_duplicate_student_id_rejected() {
    let (app, _, _) = test_app_with_mailer();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/signup/student",
            Some(student_signup_body("s1@alum.example", "S-100")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/signup/student",
            Some(student_signup_body("s2@alum.example", "S-100")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Student ID already exists");
}

#[tokio::test]
async fn test_signup_validation_errors_have_fields() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/signup/alumni",
            Some(json!({
                "email": "not-an-email",
                "password": "short",
                "name": "A",
                "graduationYear": 2018,
                "degree": "BSc"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    let errors = json["errors"].as_array().unwrap();
    assert!(errors.iter().any(|e| e["field"] == "email"));
    assert!(errors.iter().any(|e| e["field"] == "password"));
}

// =============================================================================
// Login and /me
// =============================================================================

#[tokio::test]
async fn test_login_and_me() {
    let (app, _, _) = test_app_with_mailer();
    signup_alumni(&app, "login@alum.example").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            Some(json!({"email": "login@alum.example", "password": "SecurePass123!"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let access = json["data"]["accessToken"].as_str().unwrap().to_string();
    assert!(json["data"]["user"]["lastLogin"].is_string());

    let response = app
        .oneshot(bearer_request("GET", "/api/v1/auth/me", &access, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "login@alum.example");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (app, _, _) = test_app_with_mailer();
    signup_alumni(&app, "wrong@alum.example").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            Some(json!({"email": "wrong@alum.example", "password": "Nope12345!"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_me_without_token() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Unauthorized request");
}

#[tokio::test]
async fn test_me_with_garbage_token() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(bearer_request("GET", "/api/v1/auth/me", "not.a.jwt", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Invalid access token");
}

#[tokio::test]
async fn test_access_token_in_cookie_works() {
    let (app, _, _) = test_app_with_mailer();
    let (access, _, _) = signup_alumni(&app, "cookie@alum.example").await;

    let request = Request::builder()
        .uri("/api/v1/auth/me")
        .header(header::COOKIE, format!("accessToken={access}"))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Refresh rotation
// =============================================================================

#[tokio::test]
async fn test_refresh_rotates_and_rejects_reuse() {
    let (app, _, _) = test_app_with_mailer();
    let (_, refresh, _) = signup_alumni(&app, "rotate@alum.example").await;

    // Step past the second-resolution iat so the rotated token differs.
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/refreshAccessToken",
            Some(json!({"refreshToken": refresh})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Access token refreshed successfully");
    let rotated = json["data"]["refreshToken"].as_str().unwrap().to_string();
    assert_ne!(rotated, refresh);

    // The superseded token is dead.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/refreshAccessToken",
            Some(json!({"refreshToken": refresh})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Refresh token is expired or used");

    // The rotated one still works.
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/refreshAccessToken",
            Some(json!({"refreshToken": rotated})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_from_cookie() {
    let (app, _, _) = test_app_with_mailer();
    let (_, refresh, _) = signup_alumni(&app, "refcookie@alum.example").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/refreshAccessToken")
        .header(header::COOKIE, format!("refreshToken={refresh}"))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_without_token() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(json_request("POST", "/api/v1/auth/refreshAccessToken", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Unauthorized request");
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let (app, _, _) = test_app_with_mailer();
    let (access, refresh, _) = signup_alumni(&app, "logout@alum.example").await;

    let response = app
        .clone()
        .oneshot(bearer_request("POST", "/api/v1/auth/logout", &access, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "User logged out successfully.");

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/refreshAccessToken",
            Some(json!({"refreshToken": refresh})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Password flows
// =============================================================================

#[tokio::test]
async fn test_change_password_flow() {
    let (app, _, _) = test_app_with_mailer();
    let (access, _, _) = signup_alumni(&app, "chpass@alum.example").await;

    let response = app
        .clone()
        .oneshot(bearer_request(
            "PUT",
            "/api/v1/auth/changeCurrentPassword",
            &access,
            Some(json!({"oldPassword": "Bad", "newPassword": "AnotherPass123!"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Invalid old password.");

    let response = app
        .clone()
        .oneshot(bearer_request(
            "PUT",
            "/api/v1/auth/changeCurrentPassword",
            &access,
            Some(json!({"oldPassword": "SecurePass123!", "newPassword": "AnotherPass123!"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Password changed successfully");

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            Some(json!({"email": "chpass@alum.example", "password": "AnotherPass123!"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_forgot_and_reset_password() {
    let (app, mailer, _) = test_app_with_mailer();
    signup_alumni(&app, "forgot@alum.example").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/forgotPassword",
            Some(json!({"email": "forgot@alum.example"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Email sent");

    let token = mailer.last_token().await;
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/auth/resetpassword/{token}"),
            Some(json!({"password": "FreshPass123!"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Password reset successful");
    assert!(json["data"]["accessToken"].is_string());

    // Token is single use.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/auth/resetpassword/{token}"),
            Some(json!({"password": "SomethingElse1!"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Invalid token");

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            Some(json!({"email": "forgot@alum.example", "password": "FreshPass123!"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_forgot_password_unknown_email() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/forgotPassword",
            Some(json!({"email": "ghost@alum.example"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["message"], "There is no user with that email");
}

// =============================================================================
// Email verification
// =============================================================================

#[tokio::test]
async fn test_verify_email_and_gated_routes() {
    let (app, mailer, _) = test_app_with_mailer();
    let (access, _, _) = signup_alumni(&app, "verify@alum.example").await;

    // Unverified accounts cannot mutate their profile.
    let response = app
        .clone()
        .oneshot(bearer_request(
            "PUT",
            "/api/v1/auth/updateAlumniAccount",
            &access,
            Some(json!({"bio": "Hello"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Please verify your email to access this route");

    let token = mailer.last_token().await;
    let response = app
        .clone()
        .oneshot(json_request(
            "GET",
            &format!("/api/v1/auth/verify-email/{token}"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Email verification successful");
    assert_eq!(json["data"]["isVerified"], true);

    let response = app
        .oneshot(bearer_request(
            "PUT",
            "/api/v1/auth/updateAlumniAccount",
            &access,
            Some(json!({"bio": "Hello"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["bio"], "Hello");
}

#[tokio::test]
async fn test_verify_email_invalid_token() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(json_request(
            "GET",
            "/api/v1/auth/verify-email/deadbeef",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Invalid verification token");
}

#[tokio::test]
async fn test_resend_verification_then_already_verified() {
    let (app, mailer, _) = test_app_with_mailer();
    let (access, _, _) = signup_alumni(&app, "resend@alum.example").await;

    let response = app
        .clone()
        .oneshot(bearer_request(
            "POST",
            "/api/v1/auth/resend-verification-email",
            &access,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Verification email sent");

    let token = mailer.last_token().await;
    let response = app
        .clone()
        .oneshot(json_request(
            "GET",
            &format!("/api/v1/auth/verify-email/{token}"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(bearer_request(
            "POST",
            "/api/v1/auth/resend-verification-email",
            &access,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Email already verified");
}

// =============================================================================
// Account deletion
// =============================================================================

#[tokio::test]
async fn test_delete_user_self_only() {
    let (app, _, _) = test_app_with_mailer();
    let (access_a, _, id_a) = signup_alumni(&app, "a@alum.example").await;
    let (_, _, id_b) = signup_alumni(&app, "b@alum.example").await;

    let response = app
        .clone()
        .oneshot(bearer_request(
            "DELETE",
            &format!("/api/v1/auth/deleteUser/{id_b}"),
            &access_a,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Not authorized to delete this user.");

    let response = app
        .clone()
        .oneshot(bearer_request(
            "DELETE",
            &format!("/api/v1/auth/deleteUser/{id_a}"),
            &access_a,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The deleted account's token no longer authenticates.
    let response = app
        .oneshot(bearer_request("GET", "/api/v1/auth/me", &access_a, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Admin surface and role guard
// =============================================================================

#[tokio::test]
async fn test_admin_routes_forbidden_for_students() {
    let (app, _, _) = test_app_with_mailer();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/signup/student",
            Some(student_signup_body("stud@alum.example", "S-1")),
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    let access = json["data"]["accessToken"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(bearer_request("GET", "/api/v1/admin/allUsers", &access, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Access denied, not authorized for this role");

    // Without any token, authentication fails before the role guard.
    let response = app
        .oneshot(json_request("GET", "/api/v1/admin/allUsers", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_user_management() {
    let (app, _, store) = test_app_with_mailer();
    signup_alumni(&app, "member@alum.example").await;
    let admin_token = seeded_admin_token(&app, &store).await;

    let response = app
        .clone()
        .oneshot(bearer_request(
            "GET",
            "/api/v1/admin/allUsers",
            &admin_token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(bearer_request(
            "POST",
            "/api/v1/admin/users",
            &admin_token,
            Some(json!({
                "name": "Second Admin",
                "email": "admin2@alum.example",
                "password": "AdminPass123!"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["userType"], "Admin");
    assert_eq!(json["data"]["isVerified"], true);
    let new_admin_id = json["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(bearer_request(
            "GET",
            &format!("/api/v1/admin/user/{new_admin_id}"),
            &admin_token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(bearer_request(
            "DELETE",
            &format!("/api/v1/admin/users/{new_admin_id}"),
            &admin_token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(bearer_request(
            "GET",
            &format!("/api/v1/admin/user/{new_admin_id}"),
            &admin_token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// OpenAPI/Swagger
// =============================================================================

#[tokio::test]
async fn test_openapi_spec_available() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["openapi"].is_string());
    assert!(json["paths"]["/api/v1/auth/login"].is_object());
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
}
