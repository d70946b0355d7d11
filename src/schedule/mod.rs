//! Due-date classification and calendar helpers for scheduled tasks.
//!
//! Classification is a pure function of the task and an explicit
//! `today`; callers pass the current date on every use so a bucket can
//! never go stale across a day boundary.
//!
//! Two bucket sets exist on purpose: the task list folds everything
//! past tomorrow into `Upcoming`, while the dashboard widget splits the
//! current week out of the tail. They drive different UI groupings and
//! are kept separate.

use crate::models::{TaskSchedule, TaskState};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Bucket shown on the task list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ListStatus {
    Completed,
    Overdue,
    Today,
    Tomorrow,
    Upcoming,
}

impl fmt::Display for ListStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListStatus::Completed => write!(f, "completed"),
            ListStatus::Overdue => write!(f, "overdue"),
            ListStatus::Today => write!(f, "today"),
            ListStatus::Tomorrow => write!(f, "tomorrow"),
            ListStatus::Upcoming => write!(f, "upcoming"),
        }
    }
}

/// Bucket shown on the dashboard's upcoming-tasks widget. The widget
/// only receives pending tasks, so there is no completed arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DashboardStatus {
    Overdue,
    Today,
    Tomorrow,
    ThisWeek,
    Later,
}

impl fmt::Display for DashboardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardStatus::Overdue => write!(f, "overdue"),
            DashboardStatus::Today => write!(f, "today"),
            DashboardStatus::Tomorrow => write!(f, "tomorrow"),
            DashboardStatus::ThisWeek => write!(f, "thisWeek"),
            DashboardStatus::Later => write!(f, "later"),
        }
    }
}

/// Header tallies for the task list page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub overdue: usize,
    pub pending: usize,
    pub completed: usize,
}

/// Sunday through Saturday of the week containing `day`.
pub fn week_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = day - Duration::days(day.weekday().num_days_from_sunday() as i64);
    (start, start + Duration::days(6))
}

/// Classify a task for the task list page.
pub fn classify_for_list(task: &TaskSchedule, today: NaiveDate) -> ListStatus {
    if task.status == TaskState::Completed {
        return ListStatus::Completed;
    }
    let due = task.due_date;
    if due < today {
        ListStatus::Overdue
    } else if due == today {
        ListStatus::Today
    } else if due == today + Duration::days(1) {
        ListStatus::Tomorrow
    } else {
        ListStatus::Upcoming
    }
}

/// Classify a due date for the dashboard widget.
pub fn classify_for_dashboard(due: NaiveDate, today: NaiveDate) -> DashboardStatus {
    if due < today {
        return DashboardStatus::Overdue;
    }
    if due == today {
        return DashboardStatus::Today;
    }
    if due == today + Duration::days(1) {
        return DashboardStatus::Tomorrow;
    }
    let (_, week_end) = week_bounds(today);
    if due <= week_end {
        DashboardStatus::ThisWeek
    } else {
        DashboardStatus::Later
    }
}

/// Overdue / pending / completed tallies. A task counts as overdue when
/// it is pending and strictly past due.
pub fn task_counts(tasks: &[TaskSchedule], today: NaiveDate) -> TaskCounts {
    let mut counts = TaskCounts::default();
    for task in tasks {
        match task.status {
            TaskState::Completed => counts.completed += 1,
            TaskState::Pending => {
                counts.pending += 1;
                if task.due_date < today {
                    counts.overdue += 1;
                }
            }
        }
    }
    counts
}

/// Tasks due on exactly the given day.
pub fn tasks_due_on<'a>(tasks: &'a [TaskSchedule], day: NaiveDate) -> Vec<&'a TaskSchedule> {
    tasks.iter().filter(|t| t.due_date == day).collect()
}

/// Every day shown on the calendar for a month: from the Sunday on or
/// before the 1st through the Saturday on or after the last day.
pub fn calendar_days(year: i32, month: u32) -> Vec<NaiveDate> {
    let first = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d,
        None => return Vec::new(),
    };
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = match next_month {
        Some(d) => d - Duration::days(1),
        None => return Vec::new(),
    };

    let (grid_start, _) = week_bounds(first);
    let (_, grid_end) = week_bounds(last);

    let mut days = Vec::new();
    let mut day = grid_start;
    while day <= grid_end {
        days.push(day);
        day += Duration::days(1);
    }
    days
}

/// Due date of the follow-up occurrence for a repeating task, or `None`
/// when the task does not repeat.
pub fn next_due_date(task: &TaskSchedule) -> Option<NaiveDate> {
    match task.repeat_interval_days {
        Some(days) if days > 0 => Some(task.due_date + Duration::days(days as i64)),
        _ => None,
    }
}

/// Mark a task completed, stamping the completion date.
pub fn mark_completed(task: &mut TaskSchedule, today: NaiveDate) {
    task.status = TaskState::Completed;
    task.completed_date = Some(today);
}
