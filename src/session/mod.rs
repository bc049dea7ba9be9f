//! Persisted session state.
//!
//! A [`SessionStore`] is a string key/value store that survives restarts.
//! [`Session`] wraps one and is handed to every controller at construction;
//! it is the only way the rest of the crate reads or writes identity.
//!
//! Lifecycle: populated by [`Session::begin`] at login, cleared by
//! [`Session::end`] at logout, and touched in between only by profile edits.
mod memory;
mod sqlite;

pub use memory::MemorySessionStore;
pub use sqlite::SqliteSessionStore;

use thiserror::Error;

use crate::api::wire::CategoryWire;
use crate::error::Error;
use crate::ids::UserId;
use crate::model::{Category, LoginGrant, UserIdentity};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Session value for '{key}' is corrupt: {reason}")]
    Corrupt { key: &'static str, reason: String },
}

/// Keys the application stores. Values are strings; composite values are JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    UserId,
    Username,
    UserEmail,
    /// JSON array of the categories returned at login.
    UserCategories,
}

impl SessionKey {
    pub const ALL: [SessionKey; 4] = [
        SessionKey::UserId,
        SessionKey::Username,
        SessionKey::UserEmail,
        SessionKey::UserCategories,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SessionKey::UserId => "userId",
            SessionKey::Username => "username",
            SessionKey::UserEmail => "userEmail",
            SessionKey::UserCategories => "userCategories",
        }
    }
}

/// Atomic per-key storage. No multi-key transactions are needed.
#[allow(async_fn_in_trait)]
pub trait SessionStore {
    async fn get(&self, key: SessionKey) -> Result<Option<String>, SessionError>;
    async fn set(&self, key: SessionKey, value: &str) -> Result<(), SessionError>;
    async fn remove(&self, key: SessionKey) -> Result<(), SessionError>;
}

// ============================================================================
// Session
// ============================================================================

/// Identity context shared by every screen.
#[derive(Debug, Clone)]
pub struct Session<S> {
    store: S,
}

impl<S: SessionStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The signed-in user's id.
    ///
    /// Screens call this before any request that needs the id. A missing or
    /// unreadable id is an [`Error::Identity`], which redirects to login.
    pub async fn user_id(&self) -> Result<UserId, Error> {
        let Some(raw) = self.store.get(SessionKey::UserId).await? else {
            tracing::debug!("No userId in session");
            return Err(Error::Identity);
        };
        raw.parse().map_err(|e| {
            tracing::warn!(value = %raw, error = %e, "Stored userId is not numeric");
            Error::Identity
        })
    }

    /// Id, name and email as last recorded. Name and email default to empty.
    pub async fn identity(&self) -> Result<UserIdentity, Error> {
        let id = self.user_id().await?;
        let name = self.store.get(SessionKey::Username).await?.unwrap_or_default();
        let email = self
            .store
            .get(SessionKey::UserEmail)
            .await?
            .unwrap_or_default();
        Ok(UserIdentity { id, name, email })
    }

    /// Record a successful login.
    ///
    /// `userId` is cleared first and written last, so a failed write never
    /// leaves a signed-in id next to stale or missing profile keys.
    pub async fn begin(&self, grant: &LoginGrant) -> Result<(), SessionError> {
        self.store.remove(SessionKey::UserId).await?;
        self.store
            .set(SessionKey::UserEmail, &grant.user.email)
            .await?;
        self.store.set(SessionKey::Username, &grant.user.name).await?;
        self.cache_categories(&grant.categories).await?;
        self.store
            .set(SessionKey::UserId, &grant.user.id.to_string())
            .await?;
        tracing::info!(user_id = %grant.user.id, "Session started");
        Ok(())
    }

    /// Forget the signed-in user. `userId` goes first so a failure part-way
    /// still leaves the session signed out.
    pub async fn end(&self) -> Result<(), SessionError> {
        for key in SessionKey::ALL {
            self.store.remove(key).await?;
        }
        tracing::info!("Session ended");
        Ok(())
    }

    pub async fn set_name(&self, name: &str) -> Result<(), SessionError> {
        self.store.set(SessionKey::Username, name).await
    }

    pub async fn set_email(&self, email: &str) -> Result<(), SessionError> {
        self.store.set(SessionKey::UserEmail, email).await
    }

    pub async fn cache_categories(&self, categories: &[Category]) -> Result<(), SessionError> {
        let wire: Vec<CategoryWire> = categories.iter().map(CategoryWire::from).collect();
        let json = serde_json::to_string(&wire).map_err(|e| SessionError::Corrupt {
            key: SessionKey::UserCategories.as_str(),
            reason: e.to_string(),
        })?;
        self.store.set(SessionKey::UserCategories, &json).await
    }

    /// Categories stored at login. Empty when nothing was stored.
    pub async fn cached_categories(&self) -> Result<Vec<Category>, SessionError> {
        let Some(json) = self.store.get(SessionKey::UserCategories).await? else {
            return Ok(Vec::new());
        };
        let wire: Vec<CategoryWire> =
            serde_json::from_str(&json).map_err(|e| SessionError::Corrupt {
                key: SessionKey::UserCategories.as_str(),
                reason: e.to_string(),
            })?;
        Ok(wire.into_iter().map(Category::from).collect())
    }
}
