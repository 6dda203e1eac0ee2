//! User records and role-specific extensions
//!
//! A user document is a base identity plus exactly one role extension,
//! selected at creation by [`Role`] and immutable thereafter. The original
//! data model expressed this with document-store discriminator inheritance;
//! here it is a closed sum type so role-specific branches are checked
//! exhaustively.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// User role, fixed at account creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Alumni,
    Student,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Alumni => "Alumni",
            Role::Student => "Student",
            Role::Admin => "Admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Alumni" => Some(Role::Alumni),
            "Student" => Some(Role::Student),
            "Admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Alumni extension, owned 1:1 by a user of role Alumni
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlumniProfile {
    pub graduation_year: i32,
    pub degree: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_in: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    /// Job postings owned by this alumni account
    #[serde(default)]
    pub job_postings: Vec<Uuid>,
}

/// Student extension, owned 1:1 by a user of role Student
///
/// Invariant: `expected_graduation_year > enrollment_year`, enforced at
/// the validation boundary before a profile is ever constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub enrollment_year: i32,
    pub expected_graduation_year: i32,
    pub major: String,
    /// Globally unique student identifier
    pub student_id: String,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// Role-specific extension data
///
/// Untagged: the role lives on the surrounding record; Admin carries no
/// extension and serializes as null, so it must stay the last variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RoleProfile {
    Alumni(AlumniProfile),
    Student(StudentProfile),
    Admin,
}

impl RoleProfile {
    pub fn role(&self) -> Role {
        match self {
            RoleProfile::Alumni(_) => Role::Alumni,
            RoleProfile::Student(_) => Role::Student,
            RoleProfile::Admin => Role::Admin,
        }
    }
}

/// User account document
///
/// The password hash and every token field are secrets; they never leave
/// the process. API responses go through [`User::to_public`] or
/// [`User::to_summary`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,

    /// Case-normalized email, unique across all users
    pub email: String,

    /// Argon2id hash; the plaintext password is never stored
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub name: String,

    pub bio: String,

    /// Relative storage path of the profile picture, if any
    pub profile_picture: Option<String>,

    pub is_active: bool,

    pub is_verified: bool,

    /// The single outstanding refresh token; overwritten on each
    /// login/refresh, absent after logout
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,

    /// SHA-256 digest of the pending email-verification token
    #[serde(skip_serializing)]
    pub verification_token_hash: Option<String>,

    /// SHA-256 digest of the pending password-reset token.
    /// Invariant: present exactly when `reset_token_expires` is present.
    #[serde(skip_serializing)]
    pub reset_token_hash: Option<String>,

    #[serde(skip_serializing)]
    pub reset_token_expires: Option<DateTime<Utc>>,

    pub last_login: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    pub profile: RoleProfile,
}

impl User {
    /// Create a new user document. `password_hash` must already be hashed.
    pub fn new(email: String, password_hash: String, name: String, profile: RoleProfile) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            name,
            bio: String::new(),
            profile_picture: None,
            is_active: true,
            is_verified: false,
            refresh_token: None,
            verification_token_hash: None,
            reset_token_hash: None,
            reset_token_expires: None,
            last_login: None,
            created_at: now,
            updated_at: now,
            profile,
        }
    }

    pub fn role(&self) -> Role {
        self.profile.role()
    }

    /// Record a pending password reset. Both fields move together.
    pub fn set_reset_token(&mut self, hash: String, expires: DateTime<Utc>) {
        self.reset_token_hash = Some(hash);
        self.reset_token_expires = Some(expires);
    }

    /// Clear any pending password reset. Both fields move together.
    pub fn clear_reset_token(&mut self) {
        self.reset_token_hash = None;
        self.reset_token_expires = None;
    }

    /// Mark the email verified and consume the pending token.
    pub fn mark_verified(&mut self) {
        self.is_verified = true;
        self.verification_token_hash = None;
    }

    /// Full safe projection: everything a client may see about a user.
    pub fn to_public(&self) -> UserPublic {
        UserPublic {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            user_type: self.role(),
            is_verified: self.is_verified,
            is_active: self.is_active,
            bio: self.bio.clone(),
            profile_picture: self.profile_picture.clone(),
            last_login: self.last_login,
            created_at: self.created_at,
            profile: self.profile.clone(),
        }
    }

    /// Minimal projection used in login/reset responses.
    pub fn to_summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            user_type: self.role(),
        }
    }
}

/// Safe public view of a user: excludes the password hash, refresh token,
/// and one-time token fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub user_type: Role,
    pub is_verified: bool,
    pub is_active: bool,
    pub bio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub profile: RoleProfile,
}

/// Minimal user projection for token responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub user_type: Role,
}
