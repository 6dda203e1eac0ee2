//! Credential store
//!
//! The document database is an external collaborator; this module defines
//! the seam the rest of the auth subsystem talks through, plus an
//! in-memory document-map implementation. The store enforces unique email
//! and (for students) unique student id at write time; everything else is
//! whole-document atomic replacement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Role, RoleProfile, User};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("User not found")]
    NotFound,

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Student ID already exists")]
    DuplicateStudentId,
}

/// Persistence contract for user documents.
///
/// Password hashes arrive pre-hashed; the store never sees plaintext
/// credentials. `save` replaces the whole document and stamps
/// `updated_at`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: User) -> Result<User, StoreError>;

    async fn save(&self, user: &User) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Lookup by case-normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_student_id(&self, student_id: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_verification_hash(&self, hash: &str) -> Result<Option<User>, StoreError>;

    /// Lookup by reset-token hash, requiring the stored expiry to be
    /// strictly after `now`.
    async fn find_by_reset_hash(
        &self,
        hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    async fn list(&self) -> Result<Vec<User>, StoreError>;
}

/// In-memory user store backed by a document map.
#[derive(Default)]
pub struct MemoryUserStore {
    docs: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn student_id_of(user: &User) -> Option<&str> {
    match &user.profile {
        RoleProfile::Student(s) => Some(s.student_id.as_str()),
        _ => None,
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: User) -> Result<User, StoreError> {
        let mut docs = self.docs.write().await;

        if docs.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        if let Some(sid) = student_id_of(&user) {
            if docs.values().any(|u| student_id_of(u) == Some(sid)) {
                return Err(StoreError::DuplicateStudentId);
            }
        }

        docs.insert(user.id, user.clone());
        Ok(user)
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        if !docs.contains_key(&user.id) {
            return Err(StoreError::NotFound);
        }
        let mut doc = user.clone();
        doc.updated_at = Utc::now();
        docs.insert(doc.id, doc);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.docs.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .docs
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_student_id(&self, student_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .docs
            .read()
            .await
            .values()
            .find(|u| student_id_of(u) == Some(student_id))
            .cloned())
    }

    async fn find_by_verification_hash(&self, hash: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .docs
            .read()
            .await
            .values()
            .find(|u| u.verification_token_hash.as_deref() == Some(hash))
            .cloned())
    }

    async fn find_by_reset_hash(
        &self,
        hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, StoreError> {
        Ok(self
            .docs
            .read()
            .await
            .values()
            .find(|u| {
                u.reset_token_hash.as_deref() == Some(hash)
                    && u.reset_token_expires.map(|exp| exp > now).unwrap_or(false)
            })
            .cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        docs.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let docs = self.docs.read().await;
        let mut users: Vec<User> = docs.values().cloned().collect();
        users.sort_by(|a, b| {
            role_rank(a.role())
                .cmp(&role_rank(b.role()))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(users)
    }
}

fn role_rank(role: Role) -> u8 {
    match role {
        Role::Admin => 0,
        Role::Alumni => 1,
        Role::Student => 2,
    }
}
