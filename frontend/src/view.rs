// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Pure view-model layer: filtering, sorting and aggregation over the
//! cached entity snapshot. No I/O and no shared state; everything here is
//! recomputed on every render.

use chrono::NaiveDate;
use common::{Priority, Task, User};

/// Completion-status predicate for the tasks page filter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Completed,
    Pending,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::Completed => "completed",
            StatusFilter::Pending => "pending",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "completed" => Some(StatusFilter::Completed),
            "pending" => Some(StatusFilter::Pending),
            _ => None,
        }
    }
}

/// Page-local filter selection. Transient by design: it travels in the
/// query string and resets on navigation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskFilter {
    pub user_id: Option<i64>,
    pub status: Option<StatusFilter>,
    pub priority: Option<Priority>,
}

impl TaskFilter {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.status.is_none() && self.priority.is_none()
    }
}

/// Applies the filter predicates conjunctively, preserving input order.
/// With no predicates set the input comes back unchanged.
pub fn filter_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| filter.user_id.is_none_or(|id| task.user_id == id))
        .filter(|task| {
            filter
                .status
                .is_none_or(|status| task.completed == (status == StatusFilter::Completed))
        })
        .filter(|task| filter.priority.is_none_or(|priority| task.priority == priority))
        .collect()
}

/// Sorts by due date: tasks without one after all tasks with one, dated
/// tasks ascending. Stable for equal timestamps.
pub fn sort_by_due_date(tasks: &mut [&Task]) {
    tasks.sort_by_key(|task| (task.due_date.is_none(), task.due_date));
}

/// The `limit` most recently created tasks, newest first.
pub fn recent_tasks(tasks: &[Task], limit: usize) -> Vec<&Task> {
    let mut recent: Vec<&Task> = tasks.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(limit);
    recent
}

/// Tasks whose due date falls on the given calendar day. Undated tasks
/// never match.
pub fn tasks_due_on(tasks: &[Task], day: NaiveDate) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| task.due_date.is_some_and(|due| due.date() == day))
        .collect()
}

/// Display name for a user: the full name unless it is empty, then the
/// username.
pub fn display_name(user: &User) -> &str {
    if user.full_name.is_empty() {
        &user.username
    } else {
        &user.full_name
    }
}

/// Rounded whole percent; 0 for an empty base.
pub fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        (part as f64 / total as f64 * 100.0).round() as u32
    }
}

/// Per-user aggregate for the analytics summary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub user_id: i64,
    pub name: String,
    pub task_count: usize,
    pub completed_count: usize,
    /// Whole percent, 0 when the user has no tasks.
    pub completion_rate: u32,
}

/// One summary per user, sorted descending by task count (stable, so
/// equally loaded users keep their input order).
pub fn user_summaries(users: &[User], tasks: &[Task]) -> Vec<UserSummary> {
    let mut summaries: Vec<UserSummary> = users
        .iter()
        .map(|user| {
            let task_count = tasks.iter().filter(|t| t.user_id == user.id).count();
            let completed_count = tasks
                .iter()
                .filter(|t| t.user_id == user.id && t.completed)
                .count();
            UserSummary {
                user_id: user.id,
                name: display_name(user).to_string(),
                task_count,
                completed_count,
                completion_rate: percentage(completed_count, task_count),
            }
        })
        .collect();
    summaries.sort_by(|a, b| b.task_count.cmp(&a.task_count));
    summaries
}

/// Overview statistics for the dashboard, analytics and settings pages.
#[derive(Debug, PartialEq)]
pub struct OverviewStats {
    pub total_users: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    /// Whole percent, 0 when there are no tasks.
    pub completion_rate: u32,
    /// Rounded to one decimal place, 0 when there are no users.
    pub avg_tasks_per_user: f64,
}

pub fn overview_stats(users: &[User], tasks: &[Task]) -> OverviewStats {
    let completed_tasks = tasks.iter().filter(|t| t.completed).count();
    let avg_tasks_per_user = if users.is_empty() {
        0.0
    } else {
        (tasks.len() as f64 / users.len() as f64 * 10.0).round() / 10.0
    };
    OverviewStats {
        total_users: users.len(),
        total_tasks: tasks.len(),
        completed_tasks,
        pending_tasks: tasks.len() - completed_tasks,
        completion_rate: percentage(completed_tasks, tasks.len()),
        avg_tasks_per_user,
    }
}

/// Task counts per priority level for the analytics bar chart.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PriorityBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityBreakdown {
    /// Largest bucket, used to scale the chart bars.
    pub fn max_count(&self) -> usize {
        self.high.max(self.medium).max(self.low)
    }
}

pub fn priority_breakdown(tasks: &[Task]) -> PriorityBreakdown {
    let mut breakdown = PriorityBreakdown::default();
    for task in tasks {
        match task.priority {
            Priority::High => breakdown.high += 1,
            Priority::Medium => breakdown.medium += 1,
            Priority::Low => breakdown.low += 1,
        }
    }
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn task(id: i64, user_id: i64, priority: Priority, completed: bool) -> Task {
        Task {
            id,
            user_id,
            title: format!("Task {id}"),
            description: None,
            priority,
            completed,
            due_date: None,
            created_at: ts(id as u32),
        }
    }

    fn user(id: i64, full_name: &str) -> User {
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            full_name: full_name.to_string(),
            created_at: ts(1),
        }
    }

    #[test]
    fn empty_filter_returns_input_unchanged() {
        let tasks = vec![
            task(1, 1, Priority::High, false),
            task(2, 2, Priority::Low, true),
            task(3, 1, Priority::Medium, false),
        ];

        let filtered = filter_tasks(&tasks, &TaskFilter::default());

        let ids: Vec<i64> = filtered.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn status_filters_partition_the_input() {
        let tasks = vec![
            task(1, 1, Priority::High, true),
            task(2, 1, Priority::Low, false),
            task(3, 2, Priority::Medium, true),
            task(4, 2, Priority::Medium, false),
        ];

        let completed = filter_tasks(
            &tasks,
            &TaskFilter {
                status: Some(StatusFilter::Completed),
                ..Default::default()
            },
        );
        let pending = filter_tasks(
            &tasks,
            &TaskFilter {
                status: Some(StatusFilter::Pending),
                ..Default::default()
            },
        );

        assert!(completed.iter().all(|t| t.completed));
        assert!(pending.iter().all(|t| !t.completed));

        // Together the two halves rebuild the input, each task exactly once.
        let mut ids: Vec<i64> = completed.iter().chain(pending.iter()).map(|t| t.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn filters_are_conjunctive_and_commutative() {
        let tasks = vec![
            task(1, 1, Priority::High, false),
            task(2, 1, Priority::High, true),
            task(3, 2, Priority::High, false),
            task(4, 1, Priority::Low, false),
        ];

        let filter = TaskFilter {
            user_id: Some(1),
            status: Some(StatusFilter::Pending),
            priority: Some(Priority::High),
        };
        let filtered = filter_tasks(&tasks, &filter);
        let ids: Vec<i64> = filtered.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1]);

        // Applying the same predicates one at a time, in a different
        // order, yields the same result.
        let by_priority = filter_tasks(
            &tasks,
            &TaskFilter {
                priority: Some(Priority::High),
                ..Default::default()
            },
        );
        let staged: Vec<i64> = by_priority
            .into_iter()
            .filter(|t| !t.completed)
            .filter(|t| t.user_id == 1)
            .map(|t| t.id)
            .collect();
        assert_eq!(staged, ids);
    }

    #[test]
    fn due_date_sort_puts_undated_tasks_last() {
        let mut a = task(1, 1, Priority::Medium, false);
        a.due_date = None;
        let mut b = task(2, 1, Priority::Medium, false);
        b.due_date = Some(ts(31)); // 2024-01-31 stands in for the later date
        let mut c = task(3, 1, Priority::Medium, false);
        c.due_date = Some(ts(10));

        let tasks = vec![a, b, c];
        let mut refs: Vec<&Task> = tasks.iter().collect();
        sort_by_due_date(&mut refs);

        let ids: Vec<i64> = refs.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn due_date_sort_is_stable_for_equal_timestamps() {
        let mut a = task(1, 1, Priority::Medium, false);
        a.due_date = Some(ts(10));
        let mut b = task(2, 1, Priority::Medium, false);
        b.due_date = Some(ts(10));

        let tasks = vec![a, b];
        let mut refs: Vec<&Task> = tasks.iter().collect();
        sort_by_due_date(&mut refs);

        let ids: Vec<i64> = refs.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn recent_tasks_are_newest_first_and_truncated() {
        let tasks: Vec<Task> = (1..=7)
            .map(|id| task(id, 1, Priority::Medium, false))
            .collect();

        let recent = recent_tasks(&tasks, 5);

        let ids: Vec<i64> = recent.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn tasks_due_on_matches_the_calendar_day_only() {
        let mut due_today = task(1, 1, Priority::High, false);
        due_today.due_date = Some(ts(15));
        let mut due_later = task(2, 1, Priority::High, false);
        due_later.due_date = Some(ts(16));
        let undated = task(3, 1, Priority::High, false);

        let tasks = vec![due_today, due_later, undated];
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        let due = tasks_due_on(&tasks, today);
        let ids: Vec<i64> = due.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn completion_rate_rounds_and_handles_empty_input() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);

        let stats = overview_stats(&[], &[]);
        assert_eq!(stats.completion_rate, 0);
        assert_eq!(stats.avg_tasks_per_user, 0.0);
    }

    #[test]
    fn average_tasks_per_user_keeps_one_decimal() {
        let users: Vec<User> = (1..=4).map(|id| user(id, "")).collect();
        let tasks: Vec<Task> = (1..=10)
            .map(|id| task(id, (id % 4) + 1, Priority::Low, false))
            .collect();

        let stats = overview_stats(&users, &tasks);
        assert_eq!(stats.total_tasks, 10);
        assert_eq!(stats.avg_tasks_per_user, 2.5);
    }

    #[test]
    fn user_summaries_sort_by_task_count_descending() {
        let users = vec![user(1, "Ada Lovelace"), user(2, ""), user(3, "Grace Hopper")];
        let tasks = vec![
            task(1, 2, Priority::High, true),
            task(2, 2, Priority::Low, false),
            task(3, 2, Priority::Low, true),
            task(4, 3, Priority::Medium, false),
        ];

        let summaries = user_summaries(&users, &tasks);

        assert_eq!(summaries[0].user_id, 2);
        // Falls back to the username when the full name is empty.
        assert_eq!(summaries[0].name, "user2");
        assert_eq!(summaries[0].task_count, 3);
        assert_eq!(summaries[0].completed_count, 2);
        assert_eq!(summaries[0].completion_rate, 67);

        assert_eq!(summaries[1].user_id, 3);
        assert_eq!(summaries[1].name, "Grace Hopper");

        // No tasks at all: rate is 0, not a division error.
        assert_eq!(summaries[2].user_id, 1);
        assert_eq!(summaries[2].completion_rate, 0);
    }

    #[test]
    fn priority_breakdown_counts_every_level() {
        let tasks = vec![
            task(1, 1, Priority::High, false),
            task(2, 1, Priority::High, true),
            task(3, 1, Priority::Medium, false),
            task(4, 1, Priority::Low, false),
        ];

        let breakdown = priority_breakdown(&tasks);
        assert_eq!(
            breakdown,
            PriorityBreakdown {
                high: 2,
                medium: 1,
                low: 1
            }
        );
        assert_eq!(breakdown.max_count(), 2);
    }
}
