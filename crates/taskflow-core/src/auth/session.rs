//! Where the signed-in session lives between runs.

use std::sync::Mutex;

use super::Session;
use crate::error::Result;

/// Storage for the bearer token and its user.
///
/// The REST client clears it when the backend answers `401`.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>>;
    fn save(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Session kept in process memory only.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        Ok(self.slot().clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        *self.slot() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

/// Session stored as JSON in the OS keyring.
#[derive(Debug, Clone)]
pub struct KeyringSessionStore {
    key: String,
}

impl Default for KeyringSessionStore {
    fn default() -> Self {
        Self {
            key: "session".to_string(),
        }
    }
}

impl KeyringSessionStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl SessionStore for KeyringSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        match keyring_store::get(&self.key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string(session)?;
        keyring_store::set(&self.key, &json)
    }

    fn clear(&self) -> Result<()> {
        keyring_store::delete(&self.key)
    }
}

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    use crate::error::{CoreError, Result};

    const SERVICE: &str = "taskflow";

    fn entry(key: &str) -> Result<keyring::Entry> {
        keyring::Entry::new(SERVICE, key).map_err(credentials)
    }

    fn credentials(err: keyring::Error) -> CoreError {
        CoreError::Credentials(err.to_string())
    }

    pub fn get(key: &str) -> Result<Option<String>> {
        match entry(key)?.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(credentials(e)),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<()> {
        entry(key)?.set_password(value).map_err(credentials)
    }

    pub fn delete(key: &str) -> Result<()> {
        match entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(credentials(e)),
        }
    }
}
