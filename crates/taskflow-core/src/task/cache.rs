//! Client-side task cache with optimistic mutations.
//!
//! Every mutation is applied locally first, then sent to the backend. The
//! server's row replaces the optimistic one on success; on failure the
//! snapshot taken beforehand is put back, so no partial change survives.

use chrono::NaiveDate;
use tracing::{debug, info};

use super::{CreateTaskRequest, StatusMove, Task, TaskId, TaskStatus, UpdateTaskRequest};
use crate::api::TaskBackend;
use crate::auth::validation::{validate_due_date, validate_task_title};
use crate::confirm::Confirmation;
use crate::error::{CoreError, Result};
use crate::notify::Notifier;

/// Ordered task list as last seen by the client.
#[derive(Debug, Clone)]
pub struct TaskCache {
    tasks: Vec<Task>,
    next_provisional: TaskId,
}

impl Default for TaskCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskCache {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_provisional: TaskId::MAX,
        }
    }

    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Temporary ids count down from the top of the id space so they never
    /// collide with backend ids.
    pub fn provisional_id(&mut self) -> TaskId {
        let id = self.next_provisional;
        self.next_provisional -= 1;
        id
    }

    /// Append, like a newly created row.
    pub fn insert(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Swap the row `id` for `task` in place. Returns false if `id` is absent.
    pub fn replace(&mut self, id: TaskId, task: Task) -> bool {
        match self.get_mut(id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let index = self.position(id)?;
        Some(self.tasks.remove(index))
    }

    /// Put a removed row back where it was.
    pub fn restore(&mut self, index: usize, task: Task) {
        let index = index.min(self.tasks.len());
        self.tasks.insert(index, task);
    }
}

/// Task operations for the board, over any [`TaskBackend`].
pub struct TaskService<B> {
    backend: B,
    cache: TaskCache,
    notifier: Notifier,
    loading: bool,
    deleting: Option<TaskId>,
}

impl<B: TaskBackend> TaskService<B> {
    pub fn new(backend: B, notifier: Notifier) -> Self {
        Self {
            backend,
            cache: TaskCache::new(),
            notifier,
            loading: false,
            deleting: None,
        }
    }

    pub fn cache(&self) -> &TaskCache {
        &self.cache
    }

    pub fn tasks(&self) -> &[Task] {
        self.cache.tasks()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Id of the task whose delete is in flight.
    pub fn deleting(&self) -> Option<TaskId> {
        self.deleting
    }

    /// Refresh from the backend. On failure the cache is left as it was.
    pub async fn load(&mut self) -> Result<&[Task]> {
        self.loading = true;
        let result = self.backend.list_tasks().await;
        self.loading = false;
        match result {
            Ok(tasks) => {
                info!(count = tasks.len(), "tasks loaded");
                self.cache.replace_all(tasks);
                Ok(self.cache.tasks())
            }
            Err(err) => {
                self.notifier.report(&err, "Failed to load tasks");
                Err(err)
            }
        }
    }

    pub async fn create(&mut self, req: CreateTaskRequest, today: NaiveDate) -> Result<Task> {
        let checked = validate_task_title(&req.title).and_then(|()| validate_due_date(req.due_date, today));
        if let Err(err) = checked {
            self.notifier.error(err.to_string());
            return Err(err.into());
        }

        let provisional = self.cache.provisional_id();
        self.cache.insert(req.to_provisional(provisional));

        match self.backend.create_task(&req).await {
            Ok(task) => {
                debug!(provisional, id = task.id, "provisional task confirmed");
                self.cache.replace(provisional, task.clone());
                self.notifier.success("Task created successfully");
                Ok(task)
            }
            Err(err) => {
                self.cache.remove(provisional);
                self.notifier.report(&err, "Failed to create task");
                Err(err)
            }
        }
    }

    pub async fn update(&mut self, id: TaskId, req: UpdateTaskRequest) -> Result<Task> {
        if let Some(title) = req.title.as_deref().filter(|t| !t.is_empty()) {
            if let Err(err) = validate_task_title(title) {
                self.notifier.error(err.to_string());
                return Err(err.into());
            }
        }

        let snapshot = self.cached(id)?.clone();
        if req.is_empty() {
            return Ok(snapshot);
        }
        if let Some(row) = self.cache.get_mut(id) {
            row.apply_update(&req);
        }

        match self.backend.update_task(id, &req).await {
            Ok(task) => {
                self.cache.replace(id, task.clone());
                self.notifier.success("Task updated successfully");
                Ok(task)
            }
            Err(err) => {
                self.cache.replace(id, snapshot);
                self.notifier.report(&err, "Failed to update task");
                Err(err)
            }
        }
    }

    /// Drop a card on a column. Returns `None` when the status is unchanged
    /// and nothing was sent.
    pub async fn move_task(&mut self, id: TaskId, to: TaskStatus) -> Result<Option<Task>> {
        match StatusMove::plan(self.cached(id)?, to) {
            StatusMove::Unchanged => Ok(None),
            StatusMove::Transition { from, to, .. } => {
                info!(id, %from, %to, "moving task");
                self.update(id, UpdateTaskRequest::status(to)).await.map(Some)
            }
        }
    }

    /// Delete after the user accepted the confirmation dialog.
    pub async fn delete(&mut self, id: TaskId, _confirmed: Confirmation) -> Result<()> {
        let index = self.cache.position(id).ok_or_else(|| not_loaded(id))?;
        let removed = self.cache.remove(id).ok_or_else(|| not_loaded(id))?;

        self.deleting = Some(id);
        let result = self.backend.delete_task(id).await;
        self.deleting = None;

        match result {
            Ok(()) => {
                self.notifier.success("Task deleted successfully");
                Ok(())
            }
            Err(err) => {
                self.cache.restore(index, removed);
                self.notifier.report(&err, "Failed to delete task");
                Err(err)
            }
        }
    }

    fn cached(&self, id: TaskId) -> Result<&Task> {
        self.cache.get(id).ok_or_else(|| not_loaded(id))
    }
}

fn not_loaded(id: TaskId) -> CoreError {
    CoreError::Custom(format!("Task {id} is not loaded"))
}
