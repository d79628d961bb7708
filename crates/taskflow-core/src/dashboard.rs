//! Summary numbers for the dashboard.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskPriority, TaskStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub low_priority: usize,
    pub medium_priority: usize,
    pub high_priority: usize,
    /// Due before today and not completed.
    pub overdue: usize,
    pub due_today: usize,
    /// `completed / total`, 0.0 for an empty list.
    pub completion_rate: f64,
}

impl DashboardSummary {
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        let mut summary = Self {
            total: tasks.len(),
            ..Self::default()
        };

        for task in tasks {
            match task.status {
                TaskStatus::Pending => summary.pending += 1,
                TaskStatus::InProgress => summary.in_progress += 1,
                TaskStatus::Completed => summary.completed += 1,
            }
            match task.priority {
                TaskPriority::Low => summary.low_priority += 1,
                TaskPriority::Medium => summary.medium_priority += 1,
                TaskPriority::High => summary.high_priority += 1,
            }
            if task.is_overdue(today) {
                summary.overdue += 1;
            }
            if task.due_date == Some(today) {
                summary.due_today += 1;
            }
        }

        if summary.total > 0 {
            summary.completion_rate = summary.completed as f64 / summary.total as f64;
        }
        summary
    }

    pub fn completion_percent(&self) -> u32 {
        (self.completion_rate * 100.0).round() as u32
    }
}

/// Open tasks due today or later, soonest first, at most `limit`.
pub fn upcoming(tasks: &[Task], today: NaiveDate, limit: usize) -> Vec<&Task> {
    let mut open: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.status != TaskStatus::Completed)
        .filter(|t| t.due_date.is_some_and(|d| d >= today))
        .collect();
    // Stable, so equal dates keep list order.
    open.sort_by_key(|t| t.due_date);
    open.truncate(limit);
    open
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::CreateTaskRequest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: u64, status: TaskStatus, priority: TaskPriority, due: Option<NaiveDate>) -> Task {
        let mut t = CreateTaskRequest::new(format!("task {id}")).to_provisional(id);
        t.status = status;
        t.priority = priority;
        t.due_date = due;
        t
    }

    #[test]
    fn empty_list_has_zero_rate() {
        let summary = DashboardSummary::compute(&[], date(2024, 3, 13));
        assert_eq!(summary.total, 0);
        assert_eq!(summary.completion_rate, 0.0);
    }

    #[test]
    fn counts_by_status_priority_and_due() {
        let today = date(2024, 3, 13);
        let tasks = vec![
            task(1, TaskStatus::Pending, TaskPriority::High, Some(date(2024, 3, 12))),
            task(2, TaskStatus::Completed, TaskPriority::Low, Some(date(2024, 3, 1))),
            task(3, TaskStatus::InProgress, TaskPriority::Medium, Some(today)),
            task(4, TaskStatus::Completed, TaskPriority::High, None),
        ];
        let s = DashboardSummary::compute(&tasks, today);
        assert_eq!((s.pending, s.in_progress, s.completed), (1, 1, 2));
        assert_eq!((s.low_priority, s.medium_priority, s.high_priority), (1, 1, 2));
        assert_eq!(s.overdue, 1);
        assert_eq!(s.due_today, 1);
        assert_eq!(s.completion_percent(), 50);
    }

    #[test]
    fn upcoming_skips_done_and_past() {
        let today = date(2024, 3, 13);
        let tasks = vec![
            task(1, TaskStatus::Pending, TaskPriority::Low, Some(date(2024, 3, 20))),
            task(2, TaskStatus::Pending, TaskPriority::Low, Some(date(2024, 3, 12))),
            task(3, TaskStatus::Completed, TaskPriority::Low, Some(date(2024, 3, 14))),
            task(4, TaskStatus::InProgress, TaskPriority::Low, Some(today)),
            task(5, TaskStatus::Pending, TaskPriority::Low, None),
        ];
        let ids: Vec<_> = upcoming(&tasks, today, 5).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![4, 1]);
        assert_eq!(upcoming(&tasks, today, 1).len(), 1);
    }
}
