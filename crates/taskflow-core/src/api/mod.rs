//! HTTP client for the Taskflow REST backend.
//!
//! Every path is relative to `api.base_url`. Authenticated calls carry the
//! stored bearer token; a `401` on one of them clears the session store and
//! surfaces as [`CoreError::SessionExpired`].

pub mod traits;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{LoginRequest, RegisterRequest, Session, SessionStore, UserId};
use crate::calendar::{SyncAck, SyncStatus};
use crate::error::{ConfigError, CoreError, Result};
use crate::storage::Config;
use crate::task::{CreateTaskRequest, Task, TaskId, UpdateTaskRequest};

pub use traits::{AuthBackend, CalendarBackend, TaskBackend};

/// Error body shape shared by every backend handler.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthUrlResponse {
    auth_url: String,
}

#[derive(Debug, Default, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: String,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    sessions: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, sessions: Arc<dyn SessionStore>) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|e| ConfigError::InvalidValue {
            key: "api.base_url".to_string(),
            message: e.to_string(),
        })?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            sessions,
        })
    }

    pub fn from_config(config: &Config, sessions: Arc<dyn SessionStore>) -> Result<Self> {
        Self::new(
            &config.api.base_url,
            Duration::from_secs(config.api.timeout_secs),
            sessions,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    fn request(&self, method: Method, path: &str, authenticated: bool) -> Result<RequestBuilder> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "api request");
        let mut req = self.http.request(method, url);
        if authenticated {
            let session = self.sessions.load()?.ok_or(CoreError::NotAuthenticated)?;
            req = req.bearer_auth(session.token);
        }
        Ok(req)
    }

    async fn dispatch(&self, req: RequestBuilder, authenticated: bool) -> Result<Response> {
        let resp = req.send().await?;
        let status = resp.status();
        debug!(status = status.as_u16(), "api response");
        if status.is_success() {
            return Ok(resp);
        }

        if status == StatusCode::UNAUTHORIZED && authenticated {
            self.sessions.clear()?;
            warn!("backend rejected the stored token; session cleared");
            return Err(CoreError::SessionExpired);
        }

        let text = resp.text().await.unwrap_or_default();
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
        Err(CoreError::Api {
            status: status.as_u16(),
            message: body.error.or(body.message).unwrap_or_default(),
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder, authenticated: bool) -> Result<T> {
        let resp = self.dispatch(req, authenticated).await?;
        Ok(resp.json().await?)
    }
}

impl AuthBackend for ApiClient {
    async fn login(&self, req: &LoginRequest) -> Result<Session> {
        let builder = self.request(Method::POST, "/auth/login", false)?.json(req);
        self.fetch(builder, false).await
    }

    async fn register(&self, req: &RegisterRequest) -> Result<Session> {
        let builder = self.request(Method::POST, "/auth/register", false)?.json(req);
        self.fetch(builder, false).await
    }
}

impl TaskBackend for ApiClient {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        let builder = self.request(Method::GET, "/tasks", true)?;
        self.fetch(builder, true).await
    }

    async fn get_task(&self, id: TaskId) -> Result<Task> {
        let builder = self.request(Method::GET, &format!("/tasks/{id}"), true)?;
        self.fetch(builder, true).await
    }

    async fn create_task(&self, req: &CreateTaskRequest) -> Result<Task> {
        let builder = self.request(Method::POST, "/tasks", true)?.json(req);
        self.fetch(builder, true).await
    }

    async fn update_task(&self, id: TaskId, req: &UpdateTaskRequest) -> Result<Task> {
        let builder = self.request(Method::PUT, &format!("/tasks/{id}"), true)?.json(req);
        self.fetch(builder, true).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        let builder = self.request(Method::DELETE, &format!("/tasks/{id}"), true)?;
        self.dispatch(builder, true).await?;
        Ok(())
    }
}

impl CalendarBackend for ApiClient {
    async fn auth_url(&self, user_id: UserId) -> Result<String> {
        let builder = self
            .request(Method::POST, "/calendar/auth", true)?
            .json(&json!({ "user_id": user_id }));
        let resp: AuthUrlResponse = self.fetch(builder, true).await?;
        Ok(resp.auth_url)
    }

    async fn exchange_code(&self, code: &str, user_id: UserId) -> Result<SyncAck> {
        let builder = self
            .request(Method::POST, "/calendar/callback", true)?
            .json(&json!({ "code": code, "user_id": user_id }));
        self.fetch(builder, true).await
    }

    async fn set_sync(&self, user_id: UserId, enable: bool) -> Result<SyncAck> {
        let builder = self
            .request(Method::POST, "/calendar/sync", true)?
            .json(&json!({ "user_id": user_id, "enable": enable }));
        self.fetch(builder, true).await
    }

    async fn sync_status(&self, user_id: UserId) -> Result<SyncStatus> {
        let builder = self.request(Method::GET, &format!("/calendar/status/{user_id}"), true)?;
        self.fetch(builder, true).await
    }

    async fn disconnect(&self, user_id: UserId) -> Result<String> {
        let builder = self.request(Method::POST, &format!("/calendar/disconnect/{user_id}"), true)?;
        let resp: MessageResponse = self.fetch(builder, true).await?;
        Ok(resp.message)
    }
}
