//! Explicit application context.
//!
//! Built once at startup and handed to whatever needs it. Services created
//! from it share one session store and one notification queue.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::auth::{AuthService, SessionStore, User};
use crate::calendar::{CallbackHandshake, CalendarSync};
use crate::error::Result;
use crate::notify::Notifier;
use crate::storage::Config;
use crate::task::TaskService;

#[derive(Clone)]
pub struct AppContext {
    config: Config,
    api: ApiClient,
    sessions: Arc<dyn SessionStore>,
    notifier: Notifier,
}

impl AppContext {
    pub fn new(config: Config, sessions: Arc<dyn SessionStore>) -> Result<Self> {
        config.validate()?;
        let api = ApiClient::from_config(&config, sessions.clone())?;
        let notifier = Notifier::new(config.notification_duration());
        Ok(Self {
            config,
            api,
            sessions,
            notifier,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn current_user(&self) -> Result<Option<User>> {
        Ok(self.sessions.load()?.map(|s| s.user))
    }

    pub fn auth(&self) -> AuthService<ApiClient> {
        AuthService::new(self.api.clone(), self.sessions.clone(), self.notifier.clone())
    }

    pub fn tasks(&self) -> TaskService<ApiClient> {
        TaskService::new(self.api.clone(), self.notifier.clone())
    }

    /// Calendar state for the signed-in user, with its status loaded.
    pub async fn calendar(&self) -> Result<CalendarSync<ApiClient>> {
        let user_id = self.current_user()?.map(|u| u.id);
        let mut sync = CalendarSync::new(self.api.clone(), self.notifier.clone(), user_id);
        sync.refresh_status().await;
        Ok(sync)
    }

    pub fn callback_handshake(&self) -> CallbackHandshake {
        CallbackHandshake::new(self.config.redirect_delay())
    }

    /// Drop the stored credentials and anything still queued for display.
    pub fn sign_out(self) -> Result<()> {
        self.sessions.clear()?;
        self.notifier.clear();
        Ok(())
    }
}
