//! Kanban board rendering.

use clap::Args;
use std::path::PathBuf;
use taskflow_core::task::filter;
use taskflow_core::Board;

use super::{due_label, load_tasks, today, CmdResult, FilterArgs};

#[derive(Args)]
pub struct BoardArgs {
    #[command(flatten)]
    pub filters: FilterArgs,
    /// Read tasks from a JSON file instead of the backend
    #[arg(long)]
    pub input: Option<PathBuf>,
}

pub async fn run(args: BoardArgs) -> CmdResult {
    let options = args.filters.options()?;
    let tasks = load_tasks(args.input.as_deref()).await?;
    let result = filter::apply(&tasks, &options, today());
    let board = Board::from_tasks(result.tasks.iter().copied());

    for column in board.columns() {
        println!("== {} ({}) ==", column.title(), column.len());
        for t in &column.tasks {
            println!("  #{} [{}] {} (due {})", t.id, t.priority, t.title, due_label(t));
        }
    }
    if !options.is_empty() {
        println!("Showing {} of {} tasks", result.stats.filtered, result.stats.total);
    }
    Ok(())
}
