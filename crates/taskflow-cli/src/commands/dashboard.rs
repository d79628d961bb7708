//! Dashboard summary.

use clap::Args;
use std::path::PathBuf;
use taskflow_core::dashboard::{upcoming, DashboardSummary};

use super::{due_label, load_tasks, today, CmdResult};

#[derive(Args)]
pub struct DashboardArgs {
    /// How many upcoming tasks to show
    #[arg(long, default_value = "5")]
    pub upcoming: usize,
    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
    /// Read tasks from a JSON file instead of the backend
    #[arg(long)]
    pub input: Option<PathBuf>,
}

pub async fn run(args: DashboardArgs) -> CmdResult {
    let tasks = load_tasks(args.input.as_deref()).await?;
    let today = today();
    let summary = DashboardSummary::compute(&tasks, today);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Tasks:        {}", summary.total);
    println!(
        "  To Do {} | In Progress {} | Done {}",
        summary.pending, summary.in_progress, summary.completed
    );
    println!(
        "  Priority: high {} | medium {} | low {}",
        summary.high_priority, summary.medium_priority, summary.low_priority
    );
    println!("Overdue:      {}", summary.overdue);
    println!("Due today:    {}", summary.due_today);
    println!("Completion:   {}%", summary.completion_percent());

    let next = upcoming(&tasks, today, args.upcoming);
    if !next.is_empty() {
        println!("Upcoming:");
        for t in next {
            println!("  {}  {}", due_label(t), t.title);
        }
    }
    Ok(())
}
