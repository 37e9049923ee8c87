//! Session storage for the bearer token and signed-in user.
//!
//! The transport reads the token from here on every request; [`crate::api::auth`]
//! writes it on sign-in and clears it on sign-out.

use crate::types::UserProfile;
use std::sync::{Arc, PoisonError, RwLock};

/// Destination for session data (token + user profile).
pub trait SessionStore: Send + Sync {
    fn token(&self) -> Option<String>;
    fn set_token(&self, token: &str);
    fn user(&self) -> Option<UserProfile>;
    fn set_user(&self, user: &UserProfile);
    /// Forget both token and user.
    fn clear(&self);
}

#[derive(Debug, Default, Clone)]
struct Session {
    token: Option<String>,
    user: Option<UserProfile>,
}

/// Process-local session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: RwLock<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            inner: RwLock::new(Session {
                token: Some(token.into()),
                user: None,
            }),
        }
    }

    fn read(&self) -> Session {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update(&self, f: impl FnOnce(&mut Session)) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<String> {
        self.read().token
    }

    fn set_token(&self, token: &str) {
        self.update(|s| s.token = Some(token.to_string()));
    }

    fn user(&self) -> Option<UserProfile> {
        self.read().user
    }

    fn set_user(&self, user: &UserProfile) {
        self.update(|s| s.user = Some(user.clone()));
    }

    fn clear(&self) {
        self.update(|s| *s = Session::default());
    }
}

/// Convenience constructor for an empty shared store.
pub fn memory_store() -> Arc<dyn SessionStore> {
    Arc::new(MemorySessionStore::new())
}
