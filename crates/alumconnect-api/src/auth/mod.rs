//! Authentication and authorization module
//!
//! This module provides JWT-based authentication with the following components:
//! - Access/refresh token issuing and verification
//! - Password hashing with Argon2
//! - One-time tokens for email verification and password reset
//! - Middleware for request authentication and role guards
//! - Account lifecycle service
//! - User documents and the credential store seam

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod one_time;
pub mod password;
pub mod service;
pub mod store;

pub use jwt::{issue_access, issue_refresh, verify_access, verify_refresh, AccessClaims};
pub use middleware::{auth_middleware, ensure_verified, require_role, CurrentUser};
pub use models::{AlumniProfile, Role, RoleProfile, StudentProfile, User, UserPublic, UserSummary};
pub use password::{hash_password, verify_password};
pub use service::{
    AlumniUpdate, AuthService, AuthTokens, NewAlumni, NewStudent, StudentUpdate,
};
pub use store::{MemoryUserStore, StoreError, UserStore};
