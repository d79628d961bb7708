//! Core error types for taskflow-core.
//!
//! This module defines the error hierarchy shared by the REST client, the
//! services and the calendar handshake, using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Message shown when neither the backend nor the error itself has anything
/// better to say.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Core error type for taskflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Non-success response from the backend
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The backend rejected the stored credentials; they have been cleared
    #[error("Session expired, please sign in again")]
    SessionExpired,

    /// An authenticated call was attempted without a stored session
    #[error("Not signed in")]
    NotAuthenticated,

    /// Transport-level failures
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// OAuth callback handshake errors
    #[error("{0}")]
    Callback(#[from] CallbackError),

    /// OS credential store errors
    #[error("Credential store error: {0}")]
    Credentials(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

impl CoreError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        CoreError::Api {
            status,
            message: message.into(),
        }
    }

    /// Text suitable for a transient notification.
    ///
    /// Backend, validation and callback errors carry their own message;
    /// everything else collapses to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            CoreError::Api { message, .. } if !message.is_empty() => message.clone(),
            CoreError::Validation(err) => err.to_string(),
            CoreError::Callback(err) => err.to_string(),
            CoreError::SessionExpired | CoreError::NotAuthenticated => self.to_string(),
            _ => fallback.to_string(),
        }
    }

    /// Session expiry is handled globally, not reported as a local failure.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, CoreError::SessionExpired)
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors, raised before any network call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A form field failed its rule
    #[error("{message}")]
    InvalidValue { field: String, message: String },

    /// A filter or CLI argument named an unknown choice
    #[error("Unknown {kind} '{value}' (expected one of: {expected})")]
    UnknownChoice {
        kind: String,
        value: String,
        expected: String,
    },
}

impl ValidationError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Name of the offending field or choice kind.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::InvalidValue { field, .. } => field,
            ValidationError::UnknownChoice { kind, .. } => kind,
        }
    }
}

/// Failures of the Google Calendar redirect handshake.
///
/// Each variant is distinguishable so the callback view can explain what
/// went wrong without inspecting message text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallbackError {
    /// The identity provider redirected back with `error=...`
    #[error("Google authorization failed: {error} (state: {})", .state.as_deref().unwrap_or("none"))]
    ProviderDenied {
        error: String,
        state: Option<String>,
    },

    /// The redirect carried no authorization code
    #[error(
        "No authorization code received; the redirect URI configured with Google probably \
         does not match. Received parameters: {received}"
    )]
    MissingCode { received: String },

    /// No signed-in user to attach the calendar to
    #[error("You must be signed in to connect Google Calendar")]
    MissingUser,

    /// The backend refused the code exchange
    #[error("Failed to connect Google Calendar: {reason}")]
    Exchange { reason: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
