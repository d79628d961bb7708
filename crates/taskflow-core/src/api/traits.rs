//! Backend seams the services are written against.
//!
//! [`super::ApiClient`] implements all three over HTTP; tests substitute
//! in-memory fakes.

use std::future::Future;

use crate::auth::{LoginRequest, RegisterRequest, Session, UserId};
use crate::calendar::{SyncAck, SyncStatus};
use crate::error::Result;
use crate::task::{CreateTaskRequest, Task, TaskId, UpdateTaskRequest};

pub trait AuthBackend: Send + Sync {
    fn login(&self, req: &LoginRequest) -> impl Future<Output = Result<Session>> + Send;

    fn register(&self, req: &RegisterRequest) -> impl Future<Output = Result<Session>> + Send;
}

/// Task CRUD for the signed-in user.
pub trait TaskBackend: Send + Sync {
    fn list_tasks(&self) -> impl Future<Output = Result<Vec<Task>>> + Send;

    fn get_task(&self, id: TaskId) -> impl Future<Output = Result<Task>> + Send;

    fn create_task(&self, req: &CreateTaskRequest) -> impl Future<Output = Result<Task>> + Send;

    fn update_task(
        &self,
        id: TaskId,
        req: &UpdateTaskRequest,
    ) -> impl Future<Output = Result<Task>> + Send;

    fn delete_task(&self, id: TaskId) -> impl Future<Output = Result<()>> + Send;
}

/// Google Calendar connection endpoints, all keyed by user id.
pub trait CalendarBackend: Send + Sync {
    /// URL of the provider's consent screen.
    fn auth_url(&self, user_id: UserId) -> impl Future<Output = Result<String>> + Send;

    /// Trade the authorization code for stored provider tokens.
    fn exchange_code(
        &self,
        code: &str,
        user_id: UserId,
    ) -> impl Future<Output = Result<SyncAck>> + Send;

    fn set_sync(&self, user_id: UserId, enable: bool) -> impl Future<Output = Result<SyncAck>> + Send;

    fn sync_status(&self, user_id: UserId) -> impl Future<Output = Result<SyncStatus>> + Send;

    /// Returns the backend's confirmation message.
    fn disconnect(&self, user_id: UserId) -> impl Future<Output = Result<String>> + Send;
}
