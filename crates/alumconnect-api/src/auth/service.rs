//! Account lifecycle flows
//!
//! Every flow that reads or mutates a user document lives here. Handlers
//! stay thin: they validate input, call one service method, and shape the
//! response envelope and cookies.
//!
//! Token persistence rule: whenever a new refresh token is issued, it is
//! written to the user document before the token pair is returned. A
//! response never carries a refresh token the store does not know about.

use chrono::{Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use alumconnect_core::AuthConfig;

use super::jwt;
use super::models::{AlumniProfile, RoleProfile, StudentProfile, User, UserPublic};
use super::one_time::{self, RESET_TOKEN_TTL_MINS};
use super::password::{hash_password, verify_password};
use super::store::{StoreError, UserStore};
use crate::error::AppError;
use crate::mail::Mailer;
use crate::state::AppState;

/// Freshly issued token pair. The refresh token is already persisted on
/// the user document by the time a caller sees this.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct NewAlumni {
    pub email: String,
    pub password: String,
    pub name: String,
    pub graduation_year: i32,
    pub degree: String,
    pub company: Option<String>,
    pub position: Option<String>,
}

pub struct NewStudent {
    pub email: String,
    pub password: String,
    pub name: String,
    pub enrollment_year: i32,
    pub expected_graduation_year: i32,
    pub major: String,
    pub student_id: String,
}

/// Partial update for an alumni account. Absent fields are left unchanged.
#[derive(Default)]
pub struct AlumniUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub graduation_year: Option<i32>,
    pub degree: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub industry: Option<String>,
    pub linked_in: Option<String>,
    pub skills: Option<Vec<String>>,
}

/// Partial update for a student account. The student id is immutable.
#[derive(Default)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub enrollment_year: Option<i32>,
    pub expected_graduation_year: Option<i32>,
    pub major: Option<String>,
    pub interests: Option<Vec<String>>,
}

pub struct AuthService {
    store: Arc<dyn UserStore>,
    mailer: Arc<dyn Mailer>,
    auth: AuthConfig,
    base_url: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    pub fn new(
        store: Arc<dyn UserStore>,
        mailer: Arc<dyn Mailer>,
        auth: AuthConfig,
        base_url: String,
    ) -> Self {
        Self {
            store,
            mailer,
            auth,
            base_url,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.store.clone(),
            state.mailer.clone(),
            state.config.auth.clone(),
            state.config.server.public_base_url.clone(),
        )
    }

    /// Issue a token pair for `user` and persist the refresh token on the
    /// document before returning.
    async fn issue_and_persist_tokens(&self, user: &mut User) -> Result<AuthTokens, AppError> {
        let access_token =
            jwt::issue_access(&self.auth, user).map_err(|e| AppError::Internal(e.to_string()))?;
        let refresh_token = jwt::issue_refresh(&self.auth, user.id)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        user.refresh_token = Some(refresh_token.clone());
        self.store.save(user).await?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
        })
    }

    /// Attach a fresh verification token to `user` and mail the link.
    ///
    /// A delivery failure always reverts the pending token hash; the user
    /// keeps the account and can ask for a resend, which issues a new token.
    /// `fail_on_error` controls whether the failure is reported: signup
    /// tolerates it, the explicit resend flow surfaces it.
    async fn send_verification_email(
        &self,
        user: &mut User,
        fail_on_error: bool,
    ) -> Result<(), AppError> {
        let token = one_time::issue();
        user.verification_token_hash = Some(token.hash.clone());
        self.store.save(user).await?;

        let link = format!("{}/api/v1/auth/verify-email/{}", self.base_url, token.plaintext);
        let body = format!(
            "Welcome to AlumConnect, {}!\n\nPlease verify your email by visiting:\n{}\n",
            user.name, link
        );

        if let Err(e) = self.mailer.send(&user.email, "Verify your email", &body).await {
            warn!("Verification email to {} failed: {}", user.email, e);
            user.verification_token_hash = None;
            self.store.save(user).await?;
            if fail_on_error {
                return Err(AppError::Internal("Email could not be sent".to_string()));
            }
        }

        Ok(())
    }

    pub async fn signup_alumni(
        &self,
        input: NewAlumni,
    ) -> Result<(UserPublic, AuthTokens), AppError> {
        let email = normalize_email(&input.email);
        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AppError::BadRequest(
                "Alumni already exists with this email".to_string(),
            ));
        }

        let password_hash =
            hash_password(&input.password).map_err(|e| AppError::Internal(e.to_string()))?;
        let profile = RoleProfile::Alumni(AlumniProfile {
            graduation_year: input.graduation_year,
            degree: input.degree,
            company: input.company,
            position: input.position,
            industry: None,
            linked_in: None,
            skills: vec![],
            job_postings: vec![],
        });

        let mut user = self
            .store
            .create(User::new(email, password_hash, input.name, profile))
            .await?;

        self.send_verification_email(&mut user, false).await?;
        let tokens = self.issue_and_persist_tokens(&mut user).await?;

        info!("Alumni account created: {}", user.email);
        Ok((user.to_public(), tokens))
    }

    pub async fn signup_student(
        &self,
        input: NewStudent,
    ) -> Result<(UserPublic, AuthTokens), AppError> {
        let email = normalize_email(&input.email);
        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AppError::BadRequest(
                "Student already exists with this email".to_string(),
            ));
        }
        if self
            .store
            .find_by_student_id(&input.student_id)
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest(
                "Student ID already exists".to_string(),
            ));
        }

        let password_hash =
            hash_password(&input.password).map_err(|e| AppError::Internal(e.to_string()))?;
        let profile = RoleProfile::Student(StudentProfile {
            enrollment_year: input.enrollment_year,
            expected_graduation_year: input.expected_graduation_year,
            major: input.major,
            student_id: input.student_id,
            interests: vec![],
        });

        let mut user = self
            .store
            .create(User::new(email, password_hash, input.name, profile))
            .await?;

        self.send_verification_email(&mut user, false).await?;
        let tokens = self.issue_and_persist_tokens(&mut user).await?;

        info!("Student account created: {}", user.email);
        Ok((user.to_public(), tokens))
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(UserPublic, AuthTokens), AppError> {
        let mut user = self
            .store
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        let matches = verify_password(password, &user.password_hash)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        if !matches {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        user.last_login = Some(Utc::now());
        let tokens = self.issue_and_persist_tokens(&mut user).await?;

        info!("User logged in: {}", user.email);
        Ok((user.to_public(), tokens))
    }

    /// Drop the stored refresh token so the outstanding one can never be
    /// redeemed again. The access token expires on its own.
    pub async fn logout(&self, user_id: Uuid) -> Result<(), AppError> {
        let mut user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(StoreError::NotFound)?;

        user.refresh_token = None;
        self.store.save(&user).await?;

        info!("User logged out: {}", user.email);
        Ok(())
    }

    /// Redeem a refresh token for a fresh pair, rotating the stored token.
    ///
    /// A structurally valid token that does not match the stored one has
    /// already been rotated away or revoked, and is rejected.
    pub async fn refresh(&self, incoming: &str) -> Result<(UserPublic, AuthTokens), AppError> {
        let claims = jwt::verify_refresh(&self.auth, incoming)
            .map_err(|_| AppError::Unauthorized("Invalid refresh token".to_string()))?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid refresh token".to_string()))?;

        let mut user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".to_string()))?;

        if user.refresh_token.as_deref() != Some(incoming) {
            return Err(AppError::Unauthorized(
                "Refresh token is expired or used".to_string(),
            ));
        }

        let tokens = self.issue_and_persist_tokens(&mut user).await?;
        Ok((user.to_public(), tokens))
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let mut user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(StoreError::NotFound)?;

        let matches = verify_password(old_password, &user.password_hash)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        if !matches {
            return Err(AppError::BadRequest("Invalid old password.".to_string()));
        }

        user.password_hash =
            hash_password(new_password).map_err(|e| AppError::Internal(e.to_string()))?;
        self.store.save(&user).await?;

        info!("Password changed for {}", user.email);
        Ok(())
    }

    /// Mail a single-use reset link. The plaintext token lives only in the
    /// email; the store holds its digest and a ten-minute expiry.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let mut user = self
            .store
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| {
                AppError::NotFound("There is no user with that email".to_string())
            })?;

        let token = one_time::issue();
        user.set_reset_token(token.hash, Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINS));
        self.store.save(&user).await?;

        let link = format!(
            "{}/api/v1/auth/resetpassword/{}",
            self.base_url, token.plaintext
        );
        let body = format!(
            "You requested a password reset.\n\nVisit the link below within {} minutes:\n{}\n\nIf you did not request this, ignore this email.\n",
            RESET_TOKEN_TTL_MINS, link
        );

        if let Err(e) = self.mailer.send(&user.email, "Password reset", &body).await {
            warn!("Reset email to {} failed: {}", user.email, e);
            user.clear_reset_token();
            self.store.save(&user).await?;
            return Err(AppError::Internal("Email could not be sent".to_string()));
        }

        Ok(())
    }

    /// Redeem a reset token and set a new password. Consumes the token and
    /// logs the user in with a fresh token pair.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(UserPublic, AuthTokens), AppError> {
        let hash = one_time::hash_for_lookup(token);
        let mut user = self
            .store
            .find_by_reset_hash(&hash, Utc::now())
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid token".to_string()))?;

        user.password_hash =
            hash_password(new_password).map_err(|e| AppError::Internal(e.to_string()))?;
        user.clear_reset_token();
        user.last_login = Some(Utc::now());

        let tokens = self.issue_and_persist_tokens(&mut user).await?;

        info!("Password reset for {}", user.email);
        Ok((user.to_public(), tokens))
    }

    /// Redeem a verification token. Tokens do not expire, only a matching
    /// pending digest redeems.
    pub async fn verify_email(&self, token: &str) -> Result<UserPublic, AppError> {
        let hash = one_time::hash_for_lookup(token);
        let mut user = self
            .store
            .find_by_verification_hash(&hash)
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid verification token".to_string()))?;

        user.mark_verified();
        self.store.save(&user).await?;

        info!("Email verified for {}", user.email);
        Ok(user.to_public())
    }

    pub async fn resend_verification(&self, user_id: Uuid) -> Result<(), AppError> {
        let mut user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(StoreError::NotFound)?;

        if user.is_verified {
            return Err(AppError::BadRequest("Email already verified".to_string()));
        }

        self.send_verification_email(&mut user, true).await
    }

    pub async fn me(&self, user_id: Uuid) -> Result<UserPublic, AppError> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(StoreError::NotFound)?;
        Ok(user.to_public())
    }

    pub async fn update_alumni(
        &self,
        user_id: Uuid,
        update: AlumniUpdate,
    ) -> Result<UserPublic, AppError> {
        let mut user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No alumni found with the id.".to_string()))?;

        let RoleProfile::Alumni(ref mut profile) = user.profile else {
            return Err(AppError::NotFound("No alumni found with the id.".to_string()));
        };

        if let Some(v) = update.graduation_year {
            profile.graduation_year = v;
        }
        if let Some(v) = update.degree {
            profile.degree = v;
        }
        if update.company.is_some() {
            profile.company = update.company;
        }
        if update.position.is_some() {
            profile.position = update.position;
        }
        if update.industry.is_some() {
            profile.industry = update.industry;
        }
        if update.linked_in.is_some() {
            profile.linked_in = update.linked_in;
        }
        if let Some(v) = update.skills {
            profile.skills = v;
        }
        if let Some(v) = update.name {
            user.name = v;
        }
        if let Some(v) = update.bio {
            user.bio = v;
        }

        self.store.save(&user).await?;
        Ok(user.to_public())
    }

    pub async fn update_student(
        &self,
        user_id: Uuid,
        update: StudentUpdate,
    ) -> Result<UserPublic, AppError> {
        let mut user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No student found with the id.".to_string()))?;

        let RoleProfile::Student(ref mut profile) = user.profile else {
            return Err(AppError::NotFound("No student found with the id.".to_string()));
        };

        if let Some(v) = update.enrollment_year {
            profile.enrollment_year = v;
        }
        if let Some(v) = update.expected_graduation_year {
            profile.expected_graduation_year = v;
        }
        if let Some(v) = update.major {
            profile.major = v;
        }
        if let Some(v) = update.interests {
            profile.interests = v;
        }
        if let Some(v) = update.name {
            user.name = v;
        }
        if let Some(v) = update.bio {
            user.bio = v;
        }

        self.store.save(&user).await?;
        Ok(user.to_public())
    }

    /// Record a new profile picture path, returning the replaced one so the
    /// caller can remove the file.
    pub async fn set_profile_picture(
        &self,
        user_id: Uuid,
        path: String,
    ) -> Result<(UserPublic, Option<String>), AppError> {
        let mut user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(StoreError::NotFound)?;

        let old = user.profile_picture.replace(path);
        self.store.save(&user).await?;
        Ok((user.to_public(), old))
    }

    /// Clear the profile picture, returning the stored path for file removal.
    pub async fn clear_profile_picture(&self, user_id: Uuid) -> Result<String, AppError> {
        let mut user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(StoreError::NotFound)?;

        let path = user
            .profile_picture
            .take()
            .ok_or_else(|| AppError::BadRequest("No profile picture to delete".to_string()))?;

        self.store.save(&user).await?;
        Ok(path)
    }

    /// Users may only delete their own account through this flow; admins go
    /// through the admin surface.
    pub async fn delete_account(&self, actor_id: Uuid, target_id: Uuid) -> Result<(), AppError> {
        if actor_id != target_id {
            return Err(AppError::Forbidden(
                "Not authorized to delete this user.".to_string(),
            ));
        }

        self.store.delete(target_id).await?;
        info!("User deleted own account: {}", target_id);
        Ok(())
    }

    pub async fn list_users(&self) -> Result<Vec<UserPublic>, AppError> {
        let users = self.store.list().await?;
        Ok(users.iter().map(User::to_public).collect())
    }

    pub async fn get_user(&self, id: Uuid) -> Result<UserPublic, AppError> {
        let user = self.store.find_by_id(id).await?.ok_or(StoreError::NotFound)?;
        Ok(user.to_public())
    }

    /// Admin accounts are created pre-verified; there is no self-service
    /// admin signup.
    pub async fn create_admin(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> Result<UserPublic, AppError> {
        let email = normalize_email(&email);
        let password_hash =
            hash_password(&password).map_err(|e| AppError::Internal(e.to_string()))?;

        let mut user = User::new(email, password_hash, name, RoleProfile::Admin);
        user.is_verified = true;

        let user = self.store.create(user).await?;
        info!("Admin account created: {}", user.email);
        Ok(user.to_public())
    }

    pub async fn admin_delete_user(&self, id: Uuid) -> Result<(), AppError> {
        self.store.delete(id).await?;
        info!("Admin deleted user: {}", id);
        Ok(())
    }
}
