//! Sign-in, registration and the stored session.

pub mod session;
pub mod validation;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::AuthBackend;
use crate::error::{Result, GENERIC_ERROR_MESSAGE};
use crate::notify::Notifier;

pub use session::{KeyringSessionStore, MemorySessionStore, SessionStore};

pub type UserId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Response of `/auth/login` and `/auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), crate::error::ValidationError> {
        validation::validate_email(&self.email)?;
        validation::validate_password(&self.password)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), crate::error::ValidationError> {
        validation::validate_name(&self.name)?;
        validation::validate_email(&self.email)?;
        validation::validate_password(&self.password)
    }
}

/// Login/register/logout with notifications, over any [`AuthBackend`].
pub struct AuthService<B> {
    backend: B,
    sessions: Arc<dyn SessionStore>,
    notifier: Notifier,
    loading: bool,
    error: Option<String>,
}

impl<B: AuthBackend> AuthService<B> {
    pub fn new(backend: B, sessions: Arc<dyn SessionStore>, notifier: Notifier) -> Self {
        Self {
            backend,
            sessions,
            notifier,
            loading: false,
            error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the last failed attempt.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn current(&self) -> Result<Option<Session>> {
        self.sessions.load()
    }

    pub async fn login(&mut self, req: LoginRequest) -> Result<Session> {
        if let Err(err) = req.validate() {
            self.notifier.error(err.to_string());
            return Err(err.into());
        }
        self.loading = true;
        let result = self.backend.login(&req).await;
        self.loading = false;
        self.finish(result, "Login successful!")
    }

    pub async fn register(&mut self, req: RegisterRequest) -> Result<Session> {
        if let Err(err) = req.validate() {
            self.notifier.error(err.to_string());
            return Err(err.into());
        }
        self.loading = true;
        let result = self.backend.register(&req).await;
        self.loading = false;
        self.finish(result, "Account created successfully!")
    }

    fn finish(&mut self, result: Result<Session>, success: &str) -> Result<Session> {
        match result {
            Ok(session) => {
                self.sessions.save(&session)?;
                self.error = None;
                tracing::info!(user_id = session.user.id, "signed in");
                self.notifier.success(success);
                Ok(session)
            }
            Err(err) => {
                let message = err.user_message(GENERIC_ERROR_MESSAGE);
                self.error = Some(message.clone());
                self.notifier.error(message);
                Err(err)
            }
        }
    }

    pub fn logout(&mut self) -> Result<()> {
        self.sessions.clear()?;
        self.notifier.success("Logged out successfully");
        Ok(())
    }
}
