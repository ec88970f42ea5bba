//! Session store: the single source of truth for "who is logged in".
//!
//! `SessionStore` is an explicit provider handle. It is created once per
//! process, cloned into the API client and into every screen, and only
//! `login`/`logout` mutate it. Reading never touches the network.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;

use jury_auth::{Identity, decode_identity};

use crate::storage::{StorageError, TokenStorage};

/// Snapshot of the session state.
///
/// Invariant: `identity` is exactly what decoding `token` yields; a token
/// that fails to decode leaves `identity` absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub identity: Option<Identity>,
}

impl Session {
    fn from_token(token: Option<String>) -> Self {
        let identity = token.as_deref().and_then(decode_or_warn);
        Self { token, identity }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// A token is held but yields no identity.
    ///
    /// Such a session behaves as logged out everywhere, yet the token stays
    /// persisted until the next `logout` or `login`.
    pub fn has_undecodable_token(&self) -> bool {
        self.token.is_some() && self.identity.is_none()
    }
}

fn decode_or_warn(token: &str) -> Option<Identity> {
    match decode_identity(token) {
        Ok(identity) => {
            if identity.is_expired(Utc::now()) {
                tracing::info!(user_id = %identity.user_id, "session token has expired; the backend will reject it");
            }
            Some(identity)
        }
        Err(err) => {
            tracing::warn!(error = %err, "session token could not be decoded; identity left empty");
            None
        }
    }
}

/// Shared handle to the session state and its durable backing store.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<Session>>,
    storage: Arc<dyn TokenStorage>,
}

impl core::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.snapshot().is_authenticated())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Rehydrate the session from durable storage.
    ///
    /// A stored token that no longer decodes is kept in storage; the session
    /// simply starts without an identity.
    pub fn open(storage: Arc<dyn TokenStorage>) -> Result<Self, StorageError> {
        let token = storage.load()?;
        let session = Session::from_token(token);
        tracing::debug!(
            authenticated = session.is_authenticated(),
            stale_token = session.has_undecodable_token(),
            "session rehydrated"
        );

        Ok(Self {
            state: Arc::new(RwLock::new(session)),
            storage,
        })
    }

    /// Persist `token` verbatim and derive the identity from it.
    ///
    /// Returns the settled identity (`None` when the token does not decode;
    /// the token is still stored in that case). On a storage failure nothing
    /// changes.
    pub fn login(&self, token: &str) -> Result<Option<Identity>, StorageError> {
        self.storage.save(token)?;

        let session = Session::from_token(Some(token.to_string()));
        let identity = session.identity.clone();
        match &identity {
            Some(id) => tracing::info!(user_id = %id.user_id, role = %id.role, "logged in"),
            None => tracing::warn!("login stored a token without a usable identity"),
        }

        *self.write() = session;
        Ok(identity)
    }

    /// Drop the token and identity, in memory and in durable storage.
    ///
    /// The in-memory session is always cleared; a storage failure is
    /// reported afterwards.
    pub fn logout(&self) -> Result<(), StorageError> {
        *self.write() = Session::default();
        tracing::info!("logged out");
        self.storage.clear()
    }

    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.read().identity.clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
