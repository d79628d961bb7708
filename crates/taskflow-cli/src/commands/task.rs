//! Task management commands for CLI.

use clap::Subcommand;
use std::path::PathBuf;
use taskflow_core::task::{filter, parse_due_date, TaskId};
use taskflow_core::{ConfirmDialog, CreateTaskRequest, Task, TaskPriority, TaskStatus, UpdateTaskRequest};

use super::{confirm, context, due_label, flush, load_tasks, today, CmdResult, FilterArgs};

#[derive(Subcommand)]
pub enum TaskAction {
    /// List tasks, optionally filtered
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// Print the filtered tasks as JSON
        #[arg(long)]
        json: bool,
        /// Read tasks from a JSON file instead of the backend
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Get task details
    Get {
        /// Task ID
        id: TaskId,
    },
    /// Create a new task
    Create {
        /// Task title
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// low, medium or high (default: medium)
        #[arg(long)]
        priority: Option<TaskPriority>,
        /// pending, in_progress or completed (default: pending)
        #[arg(long)]
        status: Option<TaskStatus>,
        /// Due date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_due_date)]
        due: Option<chrono::NaiveDate>,
    },
    /// Update a task
    Update {
        /// Task ID
        id: TaskId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<TaskPriority>,
        #[arg(long)]
        status: Option<TaskStatus>,
        /// New due date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_due_date, conflicts_with = "clear_due")]
        due: Option<chrono::NaiveDate>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
    },
    /// Move a task to another board column
    Move {
        /// Task ID
        id: TaskId,
        /// Target status
        status: TaskStatus,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: TaskId,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

pub async fn run(action: TaskAction) -> CmdResult {
    match action {
        TaskAction::List { filters, json, input } => {
            let options = filters.options()?;
            let tasks = load_tasks(input.as_deref()).await?;
            let result = filter::apply(&tasks, &options, today());
            if json {
                println!("{}", serde_json::to_string_pretty(&result.tasks)?);
            } else {
                for t in &result.tasks {
                    print_row(t);
                }
                println!(
                    "Showing {} of {} tasks ({} to do, {} in progress, {} done)",
                    result.stats.filtered,
                    result.stats.total,
                    result.stats.pending,
                    result.stats.in_progress,
                    result.stats.completed
                );
            }
        }
        TaskAction::Get { id } => {
            use taskflow_core::TaskBackend;
            let ctx = context()?;
            let task = ctx.api().get_task(id).await?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Create {
            title,
            description,
            priority,
            status,
            due,
        } => {
            let ctx = context()?;
            let mut service = ctx.tasks();
            let req = CreateTaskRequest {
                title,
                description,
                status,
                priority,
                due_date: due,
            };
            let result = service.create(req, today()).await;
            flush(ctx.notifier());
            let task = result?;
            println!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Update {
            id,
            title,
            description,
            priority,
            status,
            due,
            clear_due,
        } => {
            let req = UpdateTaskRequest {
                title,
                description,
                status,
                priority,
                due_date: if clear_due { Some(None) } else { due.map(Some) },
            };
            if req.is_empty() {
                return Err("nothing to update".into());
            }
            let ctx = context()?;
            let mut service = ctx.tasks();
            let result = match service.load().await {
                Ok(_) => service.update(id, req).await,
                Err(e) => Err(e),
            };
            flush(ctx.notifier());
            let task = result?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Move { id, status } => {
            let ctx = context()?;
            let mut service = ctx.tasks();
            let result = match service.load().await {
                Ok(_) => service.move_task(id, status).await,
                Err(e) => Err(e),
            };
            flush(ctx.notifier());
            match result? {
                Some(task) => println!("Task {} moved to {}", task.id, task.status.label()),
                None => println!("Task {id} is already in {}", status.label()),
            }
        }
        TaskAction::Delete { id, yes } => {
            let ctx = context()?;
            let mut service = ctx.tasks();
            let loaded = service.load().await;
            flush(ctx.notifier());
            loaded?;

            let target = service
                .cache()
                .get(id)
                .ok_or_else(|| format!("task not found: {id}"))?;
            let Some(confirmed) = confirm(ConfirmDialog::delete_task(target), yes)? else {
                println!("Kept task {id}");
                return Ok(());
            };
            let result = service.delete(id, confirmed).await;
            flush(ctx.notifier());
            result?;
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}

fn print_row(t: &Task) {
    println!(
        "{:>5}  {:<12} {:<7} {:<10}  {}",
        t.id,
        t.status.as_str(),
        t.priority.as_str(),
        due_label(t),
        t.title
    );
}

