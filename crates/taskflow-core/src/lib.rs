//! # Taskflow Core Library
//!
//! Client-side logic for the Taskflow task manager. The `taskflow` CLI is a
//! thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Tasks**: the task model, a pure filter/derivation engine, kanban
//!   board bucketing and an optimistic client cache
//! - **Calendar**: Google Calendar connection status, the sync state machine
//!   and the OAuth redirect handshake
//! - **API**: REST client for the backend, behind backend traits
//! - **Storage**: TOML configuration and the data directory
//!
//! ## Key Components
//!
//! - [`AppContext`]: configuration, HTTP client, session store and notifier
//! - [`FilterOptions`]: board filter state and predicate
//! - [`CalendarSync`]: calendar connection state machine
//! - [`CallbackHandshake`]: one-shot processing of the OAuth redirect

pub mod api;
pub mod auth;
pub mod calendar;
pub mod confirm;
pub mod context;
pub mod dashboard;
pub mod error;
pub mod notify;
pub mod storage;
pub mod task;

pub use api::{ApiClient, AuthBackend, CalendarBackend, TaskBackend};
pub use auth::{AuthService, KeyringSessionStore, MemorySessionStore, Session, SessionStore, User};
pub use calendar::{
    CalendarPanel, CalendarSync, CallbackHandshake, CallbackParams, CallbackPhase, ConnectionState,
    SyncStatus,
};
pub use confirm::{ConfirmDialog, Confirmation};
pub use context::AppContext;
pub use dashboard::DashboardSummary;
pub use error::{CallbackError, ConfigError, CoreError, ValidationError};
pub use notify::{Notification, NotificationKind, Notifier};
pub use storage::Config;
pub use task::{
    Board, CreateTaskRequest, DueDateBucket, FilterOptions, Task, TaskPriority, TaskService,
    TaskStatus, UpdateTaskRequest,
};
