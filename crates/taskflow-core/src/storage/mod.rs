mod config;

pub use config::{ApiConfig, CalendarConfig, Config, NotificationsConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Directory holding `config.toml`, created on first use.
///
/// `~/.config/taskflow`, or `~/.config/taskflow-dev` when `TASKFLOW_ENV=dev`.
/// Tasks and the session are not stored here: tasks live on the backend and
/// the session token goes to the OS keyring.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let env = std::env::var("TASKFLOW_ENV").ok();
    let dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join(dir_name(env.as_deref()));

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

fn dir_name(env: Option<&str>) -> &'static str {
    match env {
        Some("dev") => "taskflow-dev",
        _ => "taskflow",
    }
}
