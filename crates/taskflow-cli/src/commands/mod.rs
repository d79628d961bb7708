//! Subcommand implementations and the helpers they share.

pub mod auth;
pub mod board;
pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod task;

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::Args;
use taskflow_core::{
    AppContext, ConfirmDialog, Confirmation, Config, FilterOptions, KeyringSessionStore,
    NotificationKind, Notifier, Task,
};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Board filters shared by `task list`, `board` and `dashboard`.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Case-insensitive text to look for in title or description
    #[arg(long, default_value = "")]
    pub search: String,
    /// pending, in_progress or completed
    #[arg(long, default_value = "")]
    pub status: String,
    /// low, medium or high
    #[arg(long, default_value = "")]
    pub priority: String,
    /// today, tomorrow, week, overdue or future
    #[arg(long, default_value = "")]
    pub due: String,
}

impl FilterArgs {
    pub fn options(&self) -> Result<FilterOptions, taskflow_core::ValidationError> {
        FilterOptions::from_inputs(&self.search, &self.status, &self.priority, &self.due)
    }
}

/// Context backed by the config file and the OS keyring.
pub fn context() -> Result<AppContext, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    Ok(AppContext::new(config, Arc::new(KeyringSessionStore::default()))?)
}

/// Local calendar day, the reference for every due-date bucket.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Tasks from a JSON file (the `GET /tasks` body) or from the backend.
pub async fn load_tasks(input: Option<&Path>) -> Result<Vec<Task>, Box<dyn std::error::Error>> {
    if let Some(path) = input {
        let content = std::fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&content)?);
    }
    let ctx = context()?;
    let mut service = ctx.tasks();
    let result = service.load().await.map(<[Task]>::to_vec);
    flush(ctx.notifier());
    Ok(result?)
}

/// Print and clear queued notifications.
pub fn flush(notifier: &Notifier) {
    for n in notifier.drain() {
        let tag = match n.kind {
            NotificationKind::Success => "ok",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
        };
        eprintln!("[{tag}] {}", n.message);
    }
}

/// Show the dialog and wait for y/N, unless `assume_yes`.
pub fn confirm(dialog: ConfirmDialog, assume_yes: bool) -> io::Result<Option<Confirmation>> {
    if assume_yes {
        return Ok(Some(dialog.accept()));
    }
    eprintln!("{}", dialog.title);
    eprint!("{} [{} / {}] (y/N) ", dialog.message, dialog.confirm_text, dialog.cancel_text);
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    if matches!(answer.trim(), "y" | "Y" | "yes") {
        Ok(Some(dialog.accept()))
    } else {
        Ok(None)
    }
}

pub fn due_label(task: &Task) -> String {
    task.due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}
