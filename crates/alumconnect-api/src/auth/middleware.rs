/// Authentication middleware for protecting routes
///
/// Extracts the access token from the `accessToken` cookie first, then
/// falls back to the `Authorization: Bearer` header. On success, adds the
/// authenticated user's identity to request extensions.
use super::jwt::verify_access;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;
use uuid::Uuid;

use super::models::Role;

/// Authenticated user identity extracted from the access token and
/// confirmed against the credential store.
///
/// Added to request extensions by `auth_middleware`; handlers extract it
/// with `Extension<CurrentUser>`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_verified: bool,
}

fn extract_token(jar: &CookieJar, request: &Request<Body>) -> Option<String> {
    if let Some(cookie) = jar.get("accessToken") {
        return Some(cookie.value().to_string());
    }

    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

/// Middleware that requires a valid access token.
///
/// The token's subject must still resolve to a stored user; a token for a
/// deleted account is rejected the same way as a forged one.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&jar, &request)
        .ok_or_else(|| AppError::Unauthorized("Unauthorized request".to_string()))?;

    let claims = verify_access(&state.config.auth, &token)
        .map_err(|_| AppError::Unauthorized("Invalid access token".to_string()))?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid access token".to_string()))?;

    let user = state
        .store
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid access token".to_string()))?;

    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role(),
        is_verified: user.is_verified,
    });

    Ok(next.run(request).await)
}

/// Type alias for role middleware future
type RoleMiddlewareFuture =
    std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>;

/// Middleware factory for role-based access control.
///
/// Must run after `auth_middleware`; a missing identity means the auth
/// layer was skipped, which is reported as an authentication failure
/// rather than a permission failure.
///
/// # Example
///
/// ```ignore
/// use axum::{middleware, routing::get, Router};
///
/// let app = Router::new()
///     .route("/admin/allUsers", get(list_users))
///     .route_layer(middleware::from_fn(require_role(&[Role::Admin])))
///     .route_layer(middleware::from_fn_with_state(state, auth_middleware));
/// ```
pub fn require_role(
    allowed: &'static [Role],
) -> impl Fn(Request<Body>, Next) -> RoleMiddlewareFuture + Clone {
    move |request: Request<Body>, next: Next| {
        Box::pin(async move {
            let role = request
                .extensions()
                .get::<CurrentUser>()
                .map(|user| user.role)
                .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

            if !allowed.contains(&role) {
                return Err(AppError::Forbidden(
                    "Access denied, not authorized for this role".to_string(),
                ));
            }

            Ok(next.run(request).await)
        })
    }
}

/// Middleware that requires the authenticated user's email to be verified.
///
/// Guards profile-mutation routes; unverified accounts can log in and read
/// their own data but cannot change it.
pub async fn ensure_verified(request: Request<Body>, next: Next) -> Result<Response, AppError> {
    let verified = request
        .extensions()
        .get::<CurrentUser>()
        .map(|user| user.is_verified)
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    if !verified {
        return Err(AppError::Unauthorized(
            "Please verify your email to access this route".to_string(),
        ));
    }

    Ok(next.run(request).await)
}
