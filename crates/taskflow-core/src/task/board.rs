//! Kanban board: tasks bucketed into one column per status.

use super::{Task, TaskId, TaskStatus};

/// One board column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column<'a> {
    pub status: TaskStatus,
    pub tasks: Vec<&'a Task>,
}

impl Column<'_> {
    pub fn title(&self) -> &'static str {
        self.status.label()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Pending, in-progress and completed columns, in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct Board<'a> {
    columns: [Column<'a>; 3],
}

impl<'a> Board<'a> {
    /// Bucket tasks by status, keeping their relative order in each column.
    pub fn from_tasks<I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut columns = TaskStatus::ALL.map(|status| Column {
            status,
            tasks: Vec::new(),
        });
        for task in tasks {
            let idx = TaskStatus::ALL
                .iter()
                .position(|s| *s == task.status)
                .unwrap_or(0);
            columns[idx].tasks.push(task);
        }
        Self { columns }
    }

    pub fn columns(&self) -> &[Column<'a>] {
        &self.columns
    }

    pub fn column(&self, status: TaskStatus) -> &Column<'a> {
        let idx = TaskStatus::ALL.iter().position(|s| *s == status).unwrap_or(0);
        &self.columns[idx]
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(Column::is_empty)
    }
}

/// Outcome of dropping a card onto a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMove {
    /// Dropped back onto its own column; nothing to send.
    Unchanged,
    Transition {
        id: TaskId,
        from: TaskStatus,
        to: TaskStatus,
    },
}

impl StatusMove {
    pub fn plan(task: &Task, to: TaskStatus) -> Self {
        if task.status.can_transition_to(&to) {
            StatusMove::Transition {
                id: task.id,
                from: task.status,
                to,
            }
        } else {
            StatusMove::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::CreateTaskRequest;

    fn task(id: u64, status: TaskStatus) -> Task {
        let mut t = CreateTaskRequest::new(format!("task {id}")).to_provisional(id);
        t.status = status;
        t
    }

    #[test]
    fn buckets_preserve_order() {
        let tasks = vec![
            task(1, TaskStatus::Completed),
            task(2, TaskStatus::Pending),
            task(3, TaskStatus::InProgress),
            task(4, TaskStatus::Pending),
        ];
        let board = Board::from_tasks(&tasks);
        let ids: Vec<Vec<u64>> = board
            .columns()
            .iter()
            .map(|c| c.tasks.iter().map(|t| t.id).collect())
            .collect();
        assert_eq!(ids, vec![vec![2, 4], vec![3], vec![1]]);
        assert_eq!(board.len(), 4);
    }

    #[test]
    fn column_titles() {
        let board = Board::from_tasks(Vec::<&Task>::new());
        let titles: Vec<&str> = board.columns().iter().map(Column::title).collect();
        assert_eq!(titles, vec!["To Do", "In Progress", "Done"]);
        assert!(board.is_empty());
    }

    #[test]
    fn dropping_on_same_column_is_unchanged() {
        let t = task(7, TaskStatus::InProgress);
        assert_eq!(StatusMove::plan(&t, TaskStatus::InProgress), StatusMove::Unchanged);
        assert_eq!(
            StatusMove::plan(&t, TaskStatus::Completed),
            StatusMove::Transition {
                id: 7,
                from: TaskStatus::InProgress,
                to: TaskStatus::Completed,
            }
        );
    }
}
