//! Mock login/register.
//!
//! There is no authentication: registering records a display name, logging in
//! checks that the name was registered. The logged-in name is kept under
//! [`keys::CURRENT_USER`] and the registered names under
//! [`keys::REGISTERED_USERS`].

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::models::{DisplayName, DisplayNameError, keys};
use crate::store::{KeyValueStore, StoreError};

/// Errors returned by [`SessionService`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid name: {0}")]
    InvalidName(#[from] DisplayNameError),

    #[error("User already registered: {0}")]
    AlreadyRegistered(DisplayName),

    #[error("Unknown user: {0}")]
    UnknownUser(DisplayName),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Login state persisted in a key-value store.
#[derive(Debug, Clone)]
pub struct SessionService<S> {
    store: S,
}

impl<S: KeyValueStore> SessionService<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The logged-in user, if any. An invalid stored name reads as logged out.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Store` if the store can't be read.
    pub async fn current_user(&self) -> Result<Option<DisplayName>, SessionError> {
        let Some(raw) = self.store.get(keys::CURRENT_USER).await? else {
            return Ok(None);
        };
        match DisplayName::parse(&raw) {
            Ok(name) => Ok(Some(name)),
            Err(e) => {
                warn!(error = %e, "Ignoring invalid stored user name");
                Ok(None)
            }
        }
    }

    async fn registered(&self) -> Result<Vec<DisplayName>, SessionError> {
        let Some(raw) = self.store.get(keys::REGISTERED_USERS).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(names) => Ok(names),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable registered users list");
                Ok(Vec::new())
            }
        }
    }

    /// Register `name` and log in as that user.
    ///
    /// Both values are serialized before anything is written. The
    /// registration is then written before the login, as two separate keys:
    /// if only the second write fails, the name stays registered and a later
    /// [`Self::login`] completes the session.
    ///
    /// # Errors
    ///
    /// - `InvalidName` if the name fails validation
    /// - `AlreadyRegistered` if the name (case-insensitively) is taken
    /// - `Store` if the store can't be read or written
    #[instrument(skip(self))]
    pub async fn register(&self, name: &str) -> Result<DisplayName, SessionError> {
        let name = DisplayName::parse(name)?;
        let mut users = self.registered().await?;
        if users.iter().any(|u| u.same_user(&name)) {
            return Err(SessionError::AlreadyRegistered(name));
        }

        users.push(name.clone());
        let users_raw =
            serde_json::to_string(&users).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let current_raw = name.as_str().to_string();

        self.store.set(keys::REGISTERED_USERS, users_raw).await?;
        self.store.set(keys::CURRENT_USER, current_raw).await?;

        info!(user = %name, "User registered");
        Ok(name)
    }

    /// Log in as a previously registered user.
    ///
    /// # Errors
    ///
    /// - `InvalidName` if the name fails validation
    /// - `UnknownUser` if the name was never registered
    /// - `Store` if the store can't be read or written
    #[instrument(skip(self))]
    pub async fn login(&self, name: &str) -> Result<DisplayName, SessionError> {
        let name = DisplayName::parse(name)?;
        let users = self.registered().await?;
        let Some(user) = users.into_iter().find(|u| u.same_user(&name)) else {
            return Err(SessionError::UnknownUser(name));
        };

        self.store
            .set(keys::CURRENT_USER, user.as_str().to_string())
            .await?;
        info!(user = %user, "User logged in");
        Ok(user)
    }

    /// Log out. Logging out when nobody is logged in is not an error.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Store` if the store can't be written.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.store.remove(keys::CURRENT_USER).await?;
        info!("User logged out");
        Ok(())
    }
}
