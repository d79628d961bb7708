//! Google Calendar connection state for the signed-in user.
//!
//! [`SyncStatus`] is the only source of truth. It is fetched when a user is
//! set and refetched after every operation that changes it on the backend.
//! Failures are reported once through the [`Notifier`] and leave the last
//! known status untouched. Nothing is retried.

use tracing::{info, warn};

use super::status::{ConnectionState, SyncAck, SyncStatus};
use crate::api::CalendarBackend;
use crate::auth::UserId;
use crate::confirm::Confirmation;
use crate::error::{CallbackError, CoreError, Result, GENERIC_ERROR_MESSAGE};
use crate::notify::Notifier;

pub struct CalendarSync<B> {
    backend: B,
    notifier: Notifier,
    user_id: Option<UserId>,
    status: SyncStatus,
    loading: bool,
    awaiting_callback: bool,
    error: Option<String>,
}

impl<B: CalendarBackend> CalendarSync<B> {
    /// Starts disconnected; call [`refresh_status`](Self::refresh_status)
    /// or [`set_user`](Self::set_user) to load the real status.
    pub fn new(backend: B, notifier: Notifier, user_id: Option<UserId>) -> Self {
        Self {
            backend,
            notifier,
            user_id,
            status: SyncStatus::disconnected(),
            loading: false,
            awaiting_callback: false,
            error: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn connection_state(&self) -> ConnectionState {
        ConnectionState::derive(&self.status, self.awaiting_callback)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The consent screen was opened and no callback has arrived yet.
    pub fn is_awaiting_callback(&self) -> bool {
        self.awaiting_callback
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Switch to another user (or none) and reload the status.
    pub async fn set_user(&mut self, user_id: Option<UserId>) {
        if self.user_id != user_id {
            self.user_id = user_id;
            self.status = SyncStatus::disconnected();
            self.awaiting_callback = false;
            self.error = None;
        }
        self.refresh_status().await;
    }

    /// Reload the status. Failures are logged and otherwise ignored.
    pub async fn refresh_status(&mut self) {
        let Some(user_id) = self.user_id else {
            self.status = SyncStatus::disconnected();
            return;
        };
        match self.backend.sync_status(user_id).await {
            Ok(status) => {
                if status != self.status {
                    info!(
                        user_id,
                        connected = status.google_connected,
                        sync = status.calendar_sync,
                        "calendar status changed"
                    );
                }
                self.status = status;
            }
            Err(err) => warn!(user_id, error = %err, "failed to load calendar sync status"),
        }
    }

    /// Ask the backend for the consent-screen URL. The caller opens it.
    pub async fn init_google_auth(&mut self) -> Option<String> {
        let Some(user_id) = self.user_id else {
            self.record_failure(&CallbackError::MissingUser.into(), GENERIC_ERROR_MESSAGE);
            return None;
        };

        self.loading = true;
        self.awaiting_callback = true;
        let result = self.backend.auth_url(user_id).await;
        self.loading = false;

        match result {
            Ok(url) => {
                info!(user_id, "google authorization started");
                self.error = None;
                Some(url)
            }
            Err(err) => {
                self.awaiting_callback = false;
                self.record_failure(&err, "Failed to initialize Google authentication");
                None
            }
        }
    }

    /// Exchange the authorization code from the redirect.
    ///
    /// An empty code or a missing user fails before anything is sent. On
    /// success the status is refreshed exactly once.
    pub async fn handle_google_callback(
        &mut self,
        code: &str,
        user_id: Option<UserId>,
    ) -> Result<SyncAck, CallbackError> {
        if code.is_empty() {
            let err = CallbackError::MissingCode {
                received: "none".to_string(),
            };
            self.fail_callback(&err);
            return Err(err);
        }
        let Some(user_id) = user_id else {
            self.fail_callback(&CallbackError::MissingUser);
            return Err(CallbackError::MissingUser);
        };
        if self.user_id.is_none() {
            self.user_id = Some(user_id);
        }

        self.loading = true;
        let result = self.backend.exchange_code(code, user_id).await;
        self.loading = false;
        self.awaiting_callback = false;

        match result {
            Ok(ack) => {
                info!(user_id, "google calendar connected");
                self.error = None;
                self.refresh_status().await;
                self.notifier.success(message_or(&ack.message, "Google Calendar connected successfully"));
                Ok(ack)
            }
            Err(err) => {
                let reason = err.user_message(GENERIC_ERROR_MESSAGE);
                self.record_failure(&err, GENERIC_ERROR_MESSAGE);
                Err(CallbackError::Exchange { reason })
            }
        }
    }

    /// Turn syncing on or off. Only meaningful while connected; the panel
    /// hides the toggle otherwise.
    pub async fn toggle_calendar_sync(&mut self, enable: bool) -> Result<SyncAck> {
        let user_id = self.require_user()?;
        if !self.status.google_connected {
            warn!(user_id, enable, "sync toggled while google calendar is not connected");
        }

        self.loading = true;
        let result = self.backend.set_sync(user_id, enable).await;
        self.loading = false;

        match result {
            Ok(ack) => {
                self.error = None;
                self.refresh_status().await;
                let fallback = if enable {
                    "Calendar sync enabled"
                } else {
                    "Calendar sync disabled"
                };
                self.notifier.success(message_or(&ack.message, fallback));
                Ok(ack)
            }
            Err(err) => {
                self.record_failure(&err, "Failed to update calendar sync");
                Err(err)
            }
        }
    }

    /// Remove the stored Google tokens. Sync is switched off with them.
    pub async fn disconnect_google(&mut self, _confirmed: Confirmation) -> Result<()> {
        let user_id = self.require_user()?;

        self.loading = true;
        let result = self.backend.disconnect(user_id).await;
        self.loading = false;

        match result {
            Ok(message) => {
                info!(user_id, "google calendar disconnected");
                self.error = None;
                self.refresh_status().await;
                self.notifier
                    .success(message_or(&message, "Google Calendar disconnected successfully"));
                Ok(())
            }
            Err(err) => {
                self.record_failure(&err, "Failed to disconnect Google Calendar");
                Err(err)
            }
        }
    }

    /// A redirect that ends the browser round trip without a usable code.
    pub(crate) fn fail_callback(&mut self, err: &CallbackError) {
        self.awaiting_callback = false;
        self.record_failure(&err.clone().into(), GENERIC_ERROR_MESSAGE);
    }

    pub(crate) fn record_failure(&mut self, err: &CoreError, fallback: &str) {
        self.error = Some(err.user_message(fallback));
        self.notifier.report(err, fallback);
    }

    fn require_user(&mut self) -> Result<UserId> {
        match self.user_id {
            Some(id) => Ok(id),
            None => {
                let err = CoreError::from(CallbackError::MissingUser);
                self.record_failure(&err, GENERIC_ERROR_MESSAGE);
                Err(err)
            }
        }
    }
}

fn message_or<'a>(message: &'a str, fallback: &'a str) -> &'a str {
    if message.is_empty() {
        fallback
    } else {
        message
    }
}
