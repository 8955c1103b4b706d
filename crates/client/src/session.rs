//! Session state persisted in the key-value store.
//!
//! The stored pair (`authToken`, `user`) is classified into a [`Session`]
//! in exactly one place, [`Session::classify`]. Demo placeholders written by
//! the showcase mode are recognised there and nowhere else.

use std::sync::Arc;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};

use thrift_core::{Email, User, UserId};

use crate::storage::{KeyValueStore, KeyValueStoreExt, StorageError, keys};

/// Token prefix written for cosmetic demo sessions.
const DEMO_TOKEN_PREFIX: &str = "demo-token";

/// User id written for cosmetic demo sessions.
const DEMO_USER_ID: &str = "demo-user";

const DEMO_EMAIL: &str = "demo@thrifting.com";

/// Who the client is acting for.
#[derive(Debug, Clone)]
pub enum Session {
    /// A real credential and a real user are both stored.
    Authenticated {
        /// Bearer credential.
        token: SecretString,
        /// Stored profile.
        user: User,
    },
    /// Either half of the stored pair is a demo placeholder.
    Demo {
        /// The stored user, if any.
        user: Option<User>,
    },
    /// Nothing usable is stored.
    Anonymous,
}

impl Session {
    /// Classify a stored token/user pair.
    ///
    /// A demo placeholder in either half wins over everything else. Otherwise
    /// both halves must be present for the session to count as authenticated.
    #[must_use]
    pub fn classify(token: Option<String>, user: Option<User>) -> Self {
        let demo_token = token.as_deref().is_some_and(is_demo_token);
        let demo_user = user.as_ref().is_some_and(is_demo_user);

        if demo_token || demo_user {
            return Self::Demo { user };
        }

        match (token, user) {
            (Some(token), Some(user)) if !token.is_empty() => Self::Authenticated {
                token: SecretString::from(token),
                user,
            },
            _ => Self::Anonymous,
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    #[must_use]
    pub const fn is_demo(&self) -> bool {
        matches!(self, Self::Demo { .. })
    }

    /// The user, only when truly authenticated.
    #[must_use]
    pub const fn authenticated_user(&self) -> Option<&User> {
        match self {
            Self::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }
}

fn is_demo_token(token: &str) -> bool {
    token.starts_with(DEMO_TOKEN_PREFIX)
}

fn is_demo_user(user: &User) -> bool {
    user.id.as_str() == DEMO_USER_ID
}

/// Reads and writes the session keys of a [`KeyValueStore`].
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Classify whatever is currently stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub fn load(&self) -> Result<Session, StorageError> {
        let token = self.store.get(keys::AUTH_TOKEN)?;
        let user = self.current_user()?;
        Ok(Session::classify(token, user))
    }

    /// The stored user, whether or not the session is authenticated.
    ///
    /// A corrupted entry is purged and reads as `None`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub fn current_user(&self) -> Result<Option<User>, StorageError> {
        self.store.read_json(keys::USER)
    }

    /// The stored token if it is a real credential.
    ///
    /// Attached to every request whether or not the call requires auth.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub fn bearer_token(&self) -> Result<Option<SecretString>, StorageError> {
        Ok(self
            .store
            .get(keys::AUTH_TOKEN)?
            .filter(|token| !token.is_empty() && !is_demo_token(token))
            .map(SecretString::from))
    }

    /// Persist a full session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if either key cannot be written.
    pub fn save(&self, token: &SecretString, user: &User) -> Result<(), StorageError> {
        self.save_token(token)?;
        self.save_user(user)
    }

    /// Persist only the token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the key cannot be written.
    pub fn save_token(&self, token: &SecretString) -> Result<(), StorageError> {
        self.store.set(keys::AUTH_TOKEN, token.expose_secret())
    }

    /// Persist only the user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the key cannot be written.
    pub fn save_user(&self, user: &User) -> Result<(), StorageError> {
        self.store.write_json(keys::USER, user)
    }

    /// Remove both session keys.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(keys::AUTH_TOKEN)?;
        self.store.remove(keys::USER)
    }

    /// Remove whichever half of the stored pair is a demo placeholder.
    ///
    /// Real values are left alone. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or written.
    pub fn purge_demo(&self) -> Result<bool, StorageError> {
        let mut purged = false;

        if self
            .store
            .get(keys::AUTH_TOKEN)?
            .as_deref()
            .is_some_and(is_demo_token)
        {
            self.store.remove(keys::AUTH_TOKEN)?;
            purged = true;
        }

        if self.current_user()?.as_ref().is_some_and(is_demo_user) {
            self.store.remove(keys::USER)?;
            purged = true;
        }

        Ok(purged)
    }

    /// Store a cosmetic demo session and return its user.
    ///
    /// The result always classifies as [`Session::Demo`].
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub fn create_demo_user(&self) -> Result<User, StorageError> {
        let now = Utc::now();
        let user = User {
            id: UserId::new(DEMO_USER_ID),
            username: "Demo User".to_string(),
            email: Email::parse(DEMO_EMAIL).expect("demo email is valid"),
            created_at: now,
        };

        self.store.write_json(keys::USER, &user)?;
        self.store.set(
            keys::AUTH_TOKEN,
            &format!("{DEMO_TOKEN_PREFIX}-{}", now.timestamp_millis()),
        )?;

        Ok(user)
    }
}
