//! Task filtering and summary counts for the board view.
//!
//! Everything here is pure: the caller supplies "today" so results are
//! deterministic and testable. All active clauses are AND-ed.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Task, TaskPriority, TaskStatus};
use crate::error::ValidationError;

/// Relative due-date bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueDateBucket {
    Today,
    Tomorrow,
    /// From today through the end of the current week (weeks start on Sunday).
    Week,
    Overdue,
    Future,
}

impl DueDateBucket {
    pub const ALL: [DueDateBucket; 5] = [
        DueDateBucket::Today,
        DueDateBucket::Tomorrow,
        DueDateBucket::Week,
        DueDateBucket::Overdue,
        DueDateBucket::Future,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DueDateBucket::Today => "today",
            DueDateBucket::Tomorrow => "tomorrow",
            DueDateBucket::Week => "week",
            DueDateBucket::Overdue => "overdue",
            DueDateBucket::Future => "future",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DueDateBucket::Today => "Due Today",
            DueDateBucket::Tomorrow => "Due Tomorrow",
            DueDateBucket::Week => "Due This Week",
            DueDateBucket::Overdue => "Overdue",
            DueDateBucket::Future => "Future",
        }
    }

    /// Whether a task due on `due` falls in this bucket.
    pub fn contains(&self, due: NaiveDate, today: NaiveDate) -> bool {
        match self {
            DueDateBucket::Today => due == today,
            DueDateBucket::Tomorrow => Some(due) == today.checked_add_days(Days::new(1)),
            DueDateBucket::Week => due >= today && due <= end_of_week(today),
            DueDateBucket::Overdue => due < today,
            DueDateBucket::Future => due > today,
        }
    }
}

impl fmt::Display for DueDateBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DueDateBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DueDateBucket::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| format!("Unknown due date filter: {}", s))
    }
}

/// Last day of the week containing `today`.
///
/// Weekdays are numbered from Sunday = 0 and the end is `today + (7 - weekday)`,
/// so on a Sunday the window runs through the following Sunday.
pub fn end_of_week(today: NaiveDate) -> NaiveDate {
    let weekday = today.weekday().num_days_from_sunday();
    today
        .checked_add_days(Days::new(u64::from(7 - weekday)))
        .unwrap_or(NaiveDate::MAX)
}

/// Board filter state. The default value filters nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Case-insensitive substring of title or description.
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub due: Option<DueDateBucket>,
}

impl FilterOptions {
    /// Build from raw form inputs where `""` means "any".
    pub fn from_inputs(
        search: &str,
        status: &str,
        priority: &str,
        due: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            search: search.to_string(),
            status: parse_choice(status, "status", &TaskStatus::ALL.map(|s| s.as_str()))?,
            priority: parse_choice(priority, "priority", &TaskPriority::ALL.map(|p| p.as_str()))?,
            due: parse_choice(due, "due date filter", &DueDateBucket::ALL.map(|b| b.as_str()))?,
        })
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_due(mut self, due: DueDateBucket) -> Self {
        self.due = Some(due);
        self
    }

    /// No clause is active.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.status.is_none() && self.priority.is_none() && self.due.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The filter predicate.
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            let in_title = task.title.to_lowercase().contains(&needle);
            let in_description = task
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_title && !in_description {
                return false;
            }
        }

        if self.status.is_some_and(|s| s != task.status) {
            return false;
        }

        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }

        match (self.due, task.due_date) {
            (None, _) => true,
            // Only the overdue bucket needs a due date to match.
            (Some(DueDateBucket::Overdue), None) => false,
            (Some(_), None) => true,
            (Some(bucket), Some(due)) => bucket.contains(due, today),
        }
    }
}

fn parse_choice<T: FromStr>(
    value: &str,
    kind: &str,
    expected: &[&str],
) -> Result<Option<T>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<T>()
        .map(Some)
        .map_err(|_| ValidationError::UnknownChoice {
            kind: kind.to_string(),
            value: value.to_string(),
            expected: expected.join(", "),
        })
}

/// Summary shown above the board ("Showing 3 of 10 tasks").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    /// Size of the unfiltered input.
    pub total: usize,
    pub filtered: usize,
    /// Per-status counts over the filtered set.
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl TaskStats {
    pub fn compute(total: usize, filtered: &[&Task]) -> Self {
        let count = |status: TaskStatus| filtered.iter().filter(|t| t.status == status).count();
        Self {
            total,
            filtered: filtered.len(),
            pending: count(TaskStatus::Pending),
            in_progress: count(TaskStatus::InProgress),
            completed: count(TaskStatus::Completed),
        }
    }
}

/// Filtered view over a task slice plus its stats.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResult<'a> {
    pub tasks: Vec<&'a Task>,
    pub stats: TaskStats,
}

/// Keep the tasks matching `filters`, in their original order.
pub fn filter_tasks<'a>(tasks: &'a [Task], filters: &FilterOptions, today: NaiveDate) -> Vec<&'a Task> {
    tasks.iter().filter(|t| filters.matches(t, today)).collect()
}

/// Filter and summarize in one pass over the input.
pub fn apply<'a>(tasks: &'a [Task], filters: &FilterOptions, today: NaiveDate) -> FilterResult<'a> {
    let kept = filter_tasks(tasks, filters, today);
    let stats = TaskStats::compute(tasks.len(), &kept);
    FilterResult { tasks: kept, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::CreateTaskRequest;
    use chrono::Weekday;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // Wednesday
    fn today() -> NaiveDate {
        date(2024, 3, 13)
    }

    fn task(id: u64, title: &str, status: TaskStatus, priority: TaskPriority, due: Option<NaiveDate>) -> Task {
        let mut t = CreateTaskRequest::new(title).to_provisional(id);
        t.status = status;
        t.priority = priority;
        t.due_date = due;
        t
    }

    fn titles(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn overdue_excludes_tasks_without_due_date() {
        let yesterday = today().pred_opt().unwrap();
        let tasks = vec![
            task(1, "Buy milk", TaskStatus::Pending, TaskPriority::Low, Some(yesterday)),
            task(2, "Pay rent", TaskStatus::Pending, TaskPriority::High, None),
        ];
        let filters = FilterOptions::default().with_due(DueDateBucket::Overdue);
        let kept = filter_tasks(&tasks, &filters, today());
        assert_eq!(titles(&kept), vec!["Buy milk"]);
    }

    #[test]
    fn undated_tasks_pass_non_overdue_buckets() {
        let tasks = vec![task(2, "Pay rent", TaskStatus::Pending, TaskPriority::High, None)];
        for bucket in [
            DueDateBucket::Today,
            DueDateBucket::Tomorrow,
            DueDateBucket::Week,
            DueDateBucket::Future,
        ] {
            let kept = filter_tasks(&tasks, &FilterOptions::default().with_due(bucket), today());
            assert_eq!(titles(&kept), vec!["Pay rent"], "bucket {bucket:?}");
        }
    }

    #[test]
    fn search_matches_title_or_description_case_insensitively() {
        let mut with_desc = task(1, "Groceries", TaskStatus::Pending, TaskPriority::Low, None);
        with_desc.description = Some("Remember the MILK".to_string());
        let tasks = vec![
            with_desc,
            task(2, "milk run", TaskStatus::Pending, TaskPriority::Low, None),
            task(3, "Laundry", TaskStatus::Pending, TaskPriority::Low, None),
        ];
        let filters = FilterOptions::default().with_search("Milk");
        let kept = filter_tasks(&tasks, &filters, today());
        assert_eq!(titles(&kept), vec!["Groceries", "milk run"]);
    }

    #[test]
    fn status_and_priority_are_exact() {
        let tasks = vec![
            task(1, "a", TaskStatus::Pending, TaskPriority::High, None),
            task(2, "b", TaskStatus::InProgress, TaskPriority::High, None),
            task(3, "c", TaskStatus::Pending, TaskPriority::Low, None),
        ];
        let filters = FilterOptions::default()
            .with_status(TaskStatus::Pending)
            .with_priority(TaskPriority::High);
        assert_eq!(titles(&filter_tasks(&tasks, &filters, today())), vec!["a"]);
    }

    #[test]
    fn today_and_tomorrow_buckets() {
        let tomorrow = today().succ_opt().unwrap();
        let tasks = vec![
            task(1, "now", TaskStatus::Pending, TaskPriority::Low, Some(today())),
            task(2, "next", TaskStatus::Pending, TaskPriority::Low, Some(tomorrow)),
        ];
        let f = |b| filter_tasks(&tasks, &FilterOptions::default().with_due(b), today());
        assert_eq!(titles(&f(DueDateBucket::Today)), vec!["now"]);
        assert_eq!(titles(&f(DueDateBucket::Tomorrow)), vec!["next"]);
        assert_eq!(titles(&f(DueDateBucket::Future)), vec!["next"]);
        assert!(f(DueDateBucket::Overdue).is_empty());
    }

    #[test]
    fn end_of_week_counts_from_sunday() {
        // Wednesday is weekday 3, so the window ends four days later.
        assert_eq!(today().weekday(), Weekday::Wed);
        assert_eq!(end_of_week(today()), date(2024, 3, 17));
        // Sunday spans a full week ahead.
        assert_eq!(end_of_week(date(2024, 3, 17)), date(2024, 3, 24));
        // Saturday ends tomorrow.
        assert_eq!(end_of_week(date(2024, 3, 16)), date(2024, 3, 17));
    }

    #[test]
    fn week_bucket_is_inclusive() {
        let tasks = vec![
            task(1, "yesterday", TaskStatus::Pending, TaskPriority::Low, Some(date(2024, 3, 12))),
            task(2, "today", TaskStatus::Pending, TaskPriority::Low, Some(today())),
            task(3, "sunday", TaskStatus::Pending, TaskPriority::Low, Some(date(2024, 3, 17))),
            task(4, "monday", TaskStatus::Pending, TaskPriority::Low, Some(date(2024, 3, 18))),
        ];
        let filters = FilterOptions::default().with_due(DueDateBucket::Week);
        assert_eq!(
            titles(&filter_tasks(&tasks, &filters, today())),
            vec!["today", "sunday"]
        );
    }

    #[test]
    fn stats_count_filtered_statuses_against_full_total() {
        let tasks = vec![
            task(1, "a", TaskStatus::Pending, TaskPriority::High, None),
            task(2, "b", TaskStatus::Completed, TaskPriority::High, None),
            task(3, "c", TaskStatus::InProgress, TaskPriority::Low, None),
        ];
        let result = apply(&tasks, &FilterOptions::default().with_priority(TaskPriority::High), today());
        assert_eq!(
            result.stats,
            TaskStats {
                total: 3,
                filtered: 2,
                pending: 1,
                in_progress: 0,
                completed: 1,
            }
        );
    }

    #[test]
    fn from_inputs_treats_empty_as_any() {
        let filters = FilterOptions::from_inputs("", "", "", "").unwrap();
        assert!(filters.is_empty());
        let filters = FilterOptions::from_inputs("x", "in_progress", "low", "week").unwrap();
        assert_eq!(filters.status, Some(TaskStatus::InProgress));
        assert_eq!(filters.due, Some(DueDateBucket::Week));
    }

    #[test]
    fn from_inputs_rejects_unknown_choices() {
        let err = FilterOptions::from_inputs("", "", "urgent", "").unwrap_err();
        assert_eq!(err.field(), "priority");
        assert!(err.to_string().contains("low, medium, high"));
    }

    #[test]
    fn clear_resets_every_clause() {
        let mut filters = FilterOptions::default()
            .with_search("x")
            .with_due(DueDateBucket::Future);
        filters.clear();
        assert!(filters.is_empty());
    }

    fn arb_task() -> impl Strategy<Value = Task> {
        (
            0u64..1000,
            "[a-zA-Z ]{0,12}",
            proptest::option::of("[a-zA-Z ]{0,12}"),
            prop::sample::select(TaskStatus::ALL.to_vec()),
            prop::sample::select(TaskPriority::ALL.to_vec()),
            proptest::option::of(-20i64..20),
        )
            .prop_map(|(id, title, description, status, priority, offset)| {
                let mut t = task(id, &title, status, priority, None);
                t.description = description;
                t.due_date = offset.map(|o| today() + chrono::Duration::days(o));
                t
            })
    }

    fn arb_filters() -> impl Strategy<Value = FilterOptions> {
        (
            prop_oneof![Just(String::new()), "[a-z]{1,3}"],
            proptest::option::of(prop::sample::select(TaskStatus::ALL.to_vec())),
            proptest::option::of(prop::sample::select(TaskPriority::ALL.to_vec())),
            proptest::option::of(prop::sample::select(DueDateBucket::ALL.to_vec())),
        )
            .prop_map(|(search, status, priority, due)| FilterOptions {
                search,
                status,
                priority,
                due,
            })
    }

    proptest! {
        #[test]
        fn filtered_is_an_ordered_subset(tasks in prop::collection::vec(arb_task(), 0..30), filters in arb_filters()) {
            let result = apply(&tasks, &filters, today());
            prop_assert!(result.stats.filtered <= result.stats.total);
            prop_assert_eq!(result.stats.total, tasks.len());

            // Every kept task matches; every dropped task fails.
            let mut kept = result.tasks.iter().peekable();
            for t in &tasks {
                let is_kept = kept.peek().is_some_and(|k| std::ptr::eq(**k, t));
                prop_assert_eq!(is_kept, filters.matches(t, today()));
                if is_kept {
                    kept.next();
                }
            }
            prop_assert!(kept.next().is_none());
        }

        #[test]
        fn filtering_is_idempotent(tasks in prop::collection::vec(arb_task(), 0..30), filters in arb_filters()) {
            let once: Vec<Task> = filter_tasks(&tasks, &filters, today()).into_iter().cloned().collect();
            let twice: Vec<Task> = filter_tasks(&once, &filters, today()).into_iter().cloned().collect();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn empty_filters_keep_everything(tasks in prop::collection::vec(arb_task(), 0..30)) {
            let kept = filter_tasks(&tasks, &FilterOptions::default(), today());
            prop_assert_eq!(kept.len(), tasks.len());
            for (k, t) in kept.iter().zip(&tasks) {
                prop_assert!(std::ptr::eq(*k, t));
            }
        }

        #[test]
        fn overdue_today_future_partition_dated_tasks(offset in -400i64..400) {
            let due = today() + chrono::Duration::days(offset);
            let hits: Vec<DueDateBucket> = [DueDateBucket::Overdue, DueDateBucket::Today, DueDateBucket::Future]
                .into_iter()
                .filter(|b| b.contains(due, today()))
                .collect();
            prop_assert_eq!(hits.len(), 1);
            if DueDateBucket::Tomorrow.contains(due, today()) {
                prop_assert!(DueDateBucket::Future.contains(due, today()));
            }
        }
    }
}
