// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Page controllers. Every GET runs the same cycle: joined concurrent
//! fetch of users and tasks, snapshot install, view-model computation,
//! full render. Every POST validates first (validation failures never
//! reach the network), issues one API call, then redirects back so the
//! following GET performs the full refetch. All failures surface as a
//! transient toast; no error is fatal to a page.

use std::sync::Arc;

use axum::extract::{Form, Path, Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect, Response};
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use serde::Deserialize;
use tracing::{info, warn};

use common::{
    CreateTaskPayload, CreateUserPayload, Priority, UpdateTaskPayload, UpdateUserPayload, User,
};

use crate::api::{ApiClient, RequestError};
use crate::cache::{EntityCache, Snapshot};
use crate::notifications::{NotificationFilter, NotificationStore};
use crate::prefs::{self, Theme};
use crate::render::{self, Notice, NoticeKind};
use crate::view::{self, StatusFilter, TaskFilter};

lazy_static! {
    // Same address shape the browser client checked before submitting.
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<ApiClient>,
    pub cache: Arc<EntityCache>,
    pub notifications: Arc<NotificationStore>,
}

impl AppState {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api: Arc::new(api),
            cache: Arc::new(EntityCache::new()),
            notifications: Arc::new(NotificationStore::seeded(Utc::now().naive_utc())),
        }
    }

    /// Full fetch-and-install cycle. Users and tasks are fetched
    /// concurrently and joined: if either fails the whole refresh fails
    /// and nothing is installed, so a page never renders half a
    /// snapshot. The install is generation-guarded against a newer
    /// refresh finishing first.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, RequestError> {
        let ticket = self.cache.begin_refresh();
        let (users, tasks) = tokio::try_join!(self.api.list_users(), self.api.list_tasks(None))?;
        self.cache.install(ticket, users, tasks);
        Ok(self.cache.snapshot())
    }
}

// --- Notice plumbing ---
// Transient notifications travel across the mutation redirect in the
// query string and render as a toast on the next page.

#[derive(Deserialize)]
pub struct NoticeParams {
    notice: Option<String>,
    kind: Option<String>,
}

impl NoticeParams {
    fn into_notice(self) -> Option<Notice> {
        let message = self.notice?;
        let kind = self
            .kind
            .as_deref()
            .and_then(NoticeKind::parse)
            .unwrap_or(NoticeKind::Info);
        Some(Notice { kind, message })
    }
}

fn notice_location(path: &str, notice: &Notice) -> String {
    let encoded = utf8_percent_encode(&notice.message, NON_ALPHANUMERIC);
    let separator = if path.contains('?') { '&' } else { '?' };
    format!(
        "{path}{separator}notice={encoded}&kind={}",
        notice.kind.as_str()
    )
}

fn redirect_with_notice(path: &str, notice: Notice) -> Redirect {
    Redirect::to(&notice_location(path, &notice))
}

/// Form-submitted return paths are constrained to internal absolute
/// paths; anything else falls back.
fn safe_back(back: Option<&str>, fallback: &str) -> String {
    match back {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => fallback.to_string(),
    }
}

fn current_theme() -> Theme {
    prefs::current().theme
}

/// Degraded render for a failed joined fetch: the page keeps its chrome,
/// shows its failed-load empty state and an error toast, and stays
/// interactive (HTTP 200).
fn load_failure(title: &str, active: &str, toast_message: &str, empty_message: &str) -> Html<String> {
    let notice = Notice::error(toast_message);
    let body = format!(
        "<h1>{}</h1><div class=\"card\">{}</div>",
        render::escape(title),
        render::empty_state(empty_message)
    );
    Html(render::page(
        title,
        active,
        current_theme().as_str(),
        Some(&notice),
        &body,
    ))
}

// --- Dashboard ---

pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<NoticeParams>,
) -> Html<String> {
    let snapshot = match state.refresh().await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!("Failed to load dashboard data: {err}");
            return load_failure(
                "Dashboard",
                "dashboard",
                "Error loading statistics",
                "Failed to load dashboard data",
            );
        }
    };

    let stats = view::overview_stats(&snapshot.users, &snapshot.tasks);
    let recent = view::recent_tasks(&snapshot.tasks, 5);
    let recent_html = if recent.is_empty() {
        render::empty_state("No tasks yet. Create your first task!")
    } else {
        render::recent_task_list(&recent)
    };

    let body = format!(
        "<h1>Dashboard</h1>\
         <div class=\"stat-grid\">{}{}{}{}</div>\
         <div class=\"card\"><h2>Recent Tasks</h2>{recent_html}</div>\
         <div class=\"page-actions\">\
         <a class=\"btn\" href=\"/users\">Manage Users</a>\
         <a class=\"btn\" href=\"/tasks\">Manage Tasks</a>\
         <a class=\"btn\" href=\"/analytics\">View Analytics</a>\
         </div>",
        render::stat_card(&stats.total_users.to_string(), "Total Users"),
        render::stat_card(&stats.total_tasks.to_string(), "Total Tasks"),
        render::stat_card(&stats.completed_tasks.to_string(), "Completed Tasks"),
        render::stat_card(&stats.pending_tasks.to_string(), "Pending Tasks"),
    );

    Html(render::page(
        "Dashboard",
        "dashboard",
        current_theme().as_str(),
        params.into_notice().as_ref(),
        &body,
    ))
}

// --- Users ---

pub async fn users_page(
    State(state): State<AppState>,
    Query(params): Query<NoticeParams>,
) -> Html<String> {
    let snapshot = match state.refresh().await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!("Failed to load users: {err}");
            return load_failure("Users", "users", "Error loading users", "Failed to load users");
        }
    };

    let grid = if snapshot.users.is_empty() {
        render::empty_state("No users yet. Create one to get started!")
    } else {
        format!(
            "<div class=\"card-grid\">{}</div>",
            render::user_cards(&snapshot.users)
        )
    };

    let body = format!(
        "<h1>Users</h1>\
         <div class=\"card form-card\"><h2>Add User</h2>\
         <form method=\"post\" action=\"/users/create\">\
         <div class=\"form-row\">\
         <div><label for=\"username\">Username</label>\
         <input id=\"username\" type=\"text\" name=\"username\"></div>\
         <div><label for=\"email\">Email</label>\
         <input id=\"email\" type=\"text\" name=\"email\"></div>\
         <div><label for=\"fullName\">Full Name</label>\
         <input id=\"fullName\" type=\"text\" name=\"full_name\"></div>\
         <div><button class=\"btn btn-primary\" type=\"submit\">Add User</button></div>\
         </div></form></div>\
         {grid}"
    );

    Html(render::page(
        "Users",
        "users",
        current_theme().as_str(),
        params.into_notice().as_ref(),
        &body,
    ))
}

#[derive(Deserialize)]
pub struct CreateUserForm {
    username: Option<String>,
    email: Option<String>,
    full_name: Option<String>,
}

pub async fn create_user(
    State(state): State<AppState>,
    Form(form): Form<CreateUserForm>,
) -> Redirect {
    let username = form.username.as_deref().unwrap_or("").trim();
    let email = form.email.as_deref().unwrap_or("").trim();
    let full_name = form.full_name.as_deref().unwrap_or("").trim();

    // Validation short-circuits before any network call.
    if username.is_empty() || email.is_empty() || full_name.is_empty() {
        return redirect_with_notice("/users", Notice::error("Please fill in all fields"));
    }
    if !EMAIL_RE.is_match(email) {
        return redirect_with_notice(
            "/users",
            Notice::error("Please enter a valid email address"),
        );
    }

    let payload = CreateUserPayload {
        username: username.to_string(),
        email: email.to_string(),
        full_name: full_name.to_string(),
    };
    match state.api.create_user(&payload).await {
        Ok(user) => {
            info!("User created successfully with ID: {}", user.id);
            redirect_with_notice("/users", Notice::success("User created successfully!"))
        }
        Err(err) => {
            warn!("Failed to create user: {err}");
            redirect_with_notice("/users", Notice::error(err.message()))
        }
    }
}

#[derive(Deserialize)]
pub struct UpdateUserForm {
    full_name: Option<String>,
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Form(form): Form<UpdateUserForm>,
) -> Redirect {
    let full_name = form.full_name.as_deref().unwrap_or("").trim();
    if full_name.is_empty() {
        return redirect_with_notice("/users", Notice::error("Full name cannot be empty"));
    }

    let payload = UpdateUserPayload {
        full_name: Some(full_name.to_string()),
        ..Default::default()
    };
    match state.api.update_user(user_id, &payload).await {
        Ok(_) => redirect_with_notice("/users", Notice::success("User updated successfully")),
        Err(err) => {
            warn!("Failed to update user {user_id}: {err}");
            redirect_with_notice("/users", Notice::error(err.message()))
        }
    }
}

pub async fn delete_user(State(state): State<AppState>, Path(user_id): Path<i64>) -> Redirect {
    match state.api.delete_user(user_id).await {
        Ok(()) => {
            info!("User with ID {user_id} deleted successfully.");
            redirect_with_notice("/users", Notice::success("User deleted successfully"))
        }
        Err(err) => {
            warn!("Failed to delete user {user_id}: {err}");
            redirect_with_notice("/users", Notice::error("Error deleting user"))
        }
    }
}

// --- Tasks ---

#[derive(Deserialize)]
pub struct TaskPageParams {
    user: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    notice: Option<String>,
    kind: Option<String>,
}

fn status_options(selected: Option<StatusFilter>) -> String {
    [StatusFilter::Completed, StatusFilter::Pending]
        .iter()
        .map(|status| {
            let marker = if selected == Some(*status) { " selected" } else { "" };
            let label = match status {
                StatusFilter::Completed => "Completed",
                StatusFilter::Pending => "Pending",
            };
            format!(
                "<option value=\"{}\"{}>{}</option>",
                status.as_str(),
                marker,
                label
            )
        })
        .collect()
}

pub async fn tasks_page(
    State(state): State<AppState>,
    Query(params): Query<TaskPageParams>,
) -> Html<String> {
    let notice = NoticeParams {
        notice: params.notice,
        kind: params.kind,
    }
    .into_notice();

    let snapshot = match state.refresh().await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!("Failed to load tasks: {err}");
            return load_failure("Tasks", "tasks", "Error loading data", "Failed to load tasks");
        }
    };

    let filter = TaskFilter {
        user_id: params
            .user
            .as_deref()
            .filter(|value| !value.is_empty())
            .and_then(|value| value.parse().ok()),
        status: params.status.as_deref().and_then(StatusFilter::parse),
        priority: params.priority.as_deref().and_then(Priority::parse),
    };

    let mut filtered = view::filter_tasks(&snapshot.tasks, &filter);
    view::sort_by_due_date(&mut filtered);

    let list = if filtered.is_empty() {
        render::empty_state("No tasks match your filters.")
    } else {
        format!(
            "<div class=\"card-grid\">{}</div>",
            render::task_cards(&filtered, &snapshot.users)
        )
    };

    let body = format!(
        "<h1>Tasks</h1>\
         <div class=\"card form-card\"><h2>Create Task</h2>\
         <form method=\"post\" action=\"/tasks/create\">\
         <div class=\"form-row\">\
         <div><label for=\"taskUser\">User</label>\
         <select id=\"taskUser\" name=\"user_id\">\
         <option value=\"\">Select a user</option>{create_users}</select></div>\
         <div><label for=\"taskTitle\">Title</label>\
         <input id=\"taskTitle\" type=\"text\" name=\"title\"></div>\
         <div><label for=\"taskPriority\">Priority</label>\
         <select id=\"taskPriority\" name=\"priority\">{create_priorities}</select></div>\
         <div><label for=\"taskDueDate\">Due Date</label>\
         <input id=\"taskDueDate\" type=\"datetime-local\" name=\"due_date\"></div>\
         </div>\
         <label for=\"taskDescription\">Description</label>\
         <textarea id=\"taskDescription\" name=\"description\"></textarea>\
         <div class=\"page-actions\">\
         <button class=\"btn btn-primary\" type=\"submit\">Create Task</button></div>\
         </form></div>\
         <div class=\"card form-card\"><h2>Filters</h2>\
         <form method=\"get\" action=\"/tasks\">\
         <div class=\"form-row\">\
         <div><label for=\"userSelect\">User</label>\
         <select id=\"userSelect\" name=\"user\">\
         <option value=\"\">All Users</option>{filter_users}</select></div>\
         <div><label for=\"statusSelect\">Status</label>\
         <select id=\"statusSelect\" name=\"status\">\
         <option value=\"\">All Status</option>{filter_status}</select></div>\
         <div><label for=\"prioritySelect\">Priority</label>\
         <select id=\"prioritySelect\" name=\"priority\">\
         <option value=\"\">All Priorities</option>{filter_priorities}</select></div>\
         <div><button class=\"btn\" type=\"submit\">Apply</button></div>\
         </div></form></div>\
         {list}",
        create_users = render::user_options(&snapshot.users, None),
        create_priorities = render::priority_options(Some(Priority::Medium)),
        filter_users = render::user_options(&snapshot.users, filter.user_id),
        filter_status = status_options(filter.status),
        filter_priorities = render::priority_options(filter.priority),
    );

    Html(render::page(
        "Tasks",
        "tasks",
        current_theme().as_str(),
        notice.as_ref(),
        &body,
    ))
}

/// Parses the value of a `datetime-local` input. Empty means no due
/// date; an unparsable value is a validation error.
fn parse_datetime_local(value: Option<&str>) -> Result<Option<NaiveDateTime>, String> {
    let value = value.unwrap_or("").trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map(Some)
        .map_err(|_| format!("Invalid due date: {value}"))
}

#[derive(Deserialize)]
pub struct CreateTaskForm {
    user_id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    due_date: Option<String>,
}

pub async fn create_task(
    State(state): State<AppState>,
    Form(form): Form<CreateTaskForm>,
) -> Redirect {
    let title = form.title.as_deref().unwrap_or("").trim();
    let user_id: Option<i64> = form
        .user_id
        .as_deref()
        .unwrap_or("")
        .trim()
        .parse()
        .ok();

    // Validation short-circuits before any network call.
    let Some(user_id) = user_id else {
        return redirect_with_notice(
            "/tasks",
            Notice::error("Please fill in title and select a user"),
        );
    };
    if title.is_empty() {
        return redirect_with_notice(
            "/tasks",
            Notice::error("Please fill in title and select a user"),
        );
    }
    let due_date = match parse_datetime_local(form.due_date.as_deref()) {
        Ok(due_date) => due_date,
        Err(message) => return redirect_with_notice("/tasks", Notice::error(message)),
    };

    let description = form
        .description
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);
    let priority = form
        .priority
        .as_deref()
        .and_then(Priority::parse)
        .unwrap_or(Priority::Medium);

    let payload = CreateTaskPayload {
        user_id,
        title: title.to_string(),
        description,
        priority,
        due_date,
    };
    match state.api.create_task(&payload).await {
        Ok(task) => {
            info!("Task created successfully with ID: {}", task.id);
            redirect_with_notice("/tasks", Notice::success("Task created successfully!"))
        }
        Err(err) => {
            warn!("Failed to create task: {err}");
            redirect_with_notice(
                "/tasks",
                Notice::error(format!("Failed to create task: {}", err.message())),
            )
        }
    }
}

#[derive(Deserialize)]
pub struct ToggleTaskForm {
    back: Option<String>,
}

pub async fn toggle_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
    Form(form): Form<ToggleTaskForm>,
) -> Redirect {
    let back = safe_back(form.back.as_deref(), "/tasks");

    // Fetch the current state and invert it, so a stale page cannot
    // force a direction.
    let task = match state.api.get_task(task_id).await {
        Ok(task) => task,
        Err(err) => {
            warn!("Failed to fetch task {task_id} for toggle: {err}");
            return redirect_with_notice(
                &back,
                Notice::error(format!("Failed to update task: {}", err.message())),
            );
        }
    };

    let payload = UpdateTaskPayload {
        completed: Some(!task.completed),
        ..Default::default()
    };
    match state.api.update_task(task_id, &payload).await {
        Ok(_) => redirect_with_notice(&back, Notice::success("Task updated successfully")),
        Err(err) => {
            warn!("Failed to toggle task {task_id}: {err}");
            redirect_with_notice(
                &back,
                Notice::error(format!("Failed to update task: {}", err.message())),
            )
        }
    }
}

#[derive(Deserialize)]
pub struct UpdateTaskForm {
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
    Form(form): Form<UpdateTaskForm>,
) -> Redirect {
    let title = form.title.as_deref().unwrap_or("").trim();
    if title.is_empty() {
        return redirect_with_notice("/tasks", Notice::error("Title cannot be empty"));
    }

    let payload = UpdateTaskPayload {
        title: Some(title.to_string()),
        description: Some(
            form.description
                .as_deref()
                .unwrap_or("")
                .trim()
                .to_string(),
        ),
        priority: form.priority.as_deref().and_then(Priority::parse),
        completed: None,
    };
    match state.api.update_task(task_id, &payload).await {
        Ok(_) => redirect_with_notice("/tasks", Notice::success("Task updated successfully!")),
        Err(err) => {
            warn!("Failed to update task {task_id}: {err}");
            redirect_with_notice(
                "/tasks",
                Notice::error(format!("Failed to update task: {}", err.message())),
            )
        }
    }
}

pub async fn delete_task(State(state): State<AppState>, Path(task_id): Path<i64>) -> Redirect {
    match state.api.delete_task(task_id).await {
        Ok(()) => {
            info!("Task with ID {task_id} deleted successfully.");
            redirect_with_notice("/tasks", Notice::success("Task deleted successfully"))
        }
        Err(err) => {
            warn!("Failed to delete task {task_id}: {err}");
            redirect_with_notice(
                "/tasks",
                Notice::error(format!("Failed to delete task: {}", err.message())),
            )
        }
    }
}

// --- Calendar ---

#[derive(Deserialize)]
pub struct CalendarParams {
    month: Option<String>,
    notice: Option<String>,
    kind: Option<String>,
}

/// Parses a `?month=YYYY-MM` value; anything invalid falls back to the
/// current month.
fn parse_month(value: Option<&str>, today: NaiveDate) -> NaiveDate {
    value
        .and_then(|v| NaiveDate::parse_from_str(&format!("{v}-01"), "%Y-%m-%d").ok())
        .unwrap_or_else(|| today.with_day(1).unwrap_or(today))
}

pub async fn calendar_page(
    State(state): State<AppState>,
    Query(params): Query<CalendarParams>,
) -> Html<String> {
    let notice = NoticeParams {
        notice: params.notice,
        kind: params.kind,
    }
    .into_notice();

    // The grid itself needs no entity data; a failed fetch only empties
    // the task panels.
    let snapshot = match state.refresh().await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!("Failed to load calendar tasks: {err}");
            Arc::new(Snapshot::default())
        }
    };

    let today = Utc::now().date_naive();
    let first_of_month = parse_month(params.month.as_deref(), today);
    let prev = first_of_month
        .checked_sub_months(Months::new(1))
        .unwrap_or(first_of_month);
    let next = first_of_month
        .checked_add_months(Months::new(1))
        .unwrap_or(first_of_month);

    let mut upcoming = snapshot.tasks.iter().collect::<Vec<_>>();
    view::sort_by_due_date(&mut upcoming);
    upcoming.truncate(5);
    let upcoming_html = if upcoming.is_empty() {
        render::empty_state("No upcoming tasks")
    } else {
        render::simple_task_items(&upcoming)
    };

    // Working definition pending product confirmation: a task belongs to
    // the today panel when its due date falls on the current day.
    let due_today = view::tasks_due_on(&snapshot.tasks, today);
    let today_html = if due_today.is_empty() {
        render::empty_state("No tasks for today")
    } else {
        render::simple_task_items(&due_today)
    };

    let body = format!(
        "<h1>Calendar</h1>\
         <div class=\"card\">\
         <div class=\"calendar-header\">\
         <a class=\"btn btn-small\" href=\"/calendar?month={prev}\">&lt;</a>\
         <h2>{month_title}</h2>\
         <a class=\"btn btn-small\" href=\"/calendar?month={next}\">&gt;</a>\
         </div>{grid}</div>\
         <div class=\"card\"><h2>Upcoming Tasks</h2>{upcoming_html}</div>\
         <div class=\"card\"><h2>Today's Tasks</h2>{today_html}</div>",
        prev = prev.format("%Y-%m"),
        next = next.format("%Y-%m"),
        month_title = first_of_month.format("%B %Y"),
        grid = render::calendar_grid(first_of_month, today),
    );

    Html(render::page(
        "Calendar",
        "calendar",
        current_theme().as_str(),
        notice.as_ref(),
        &body,
    ))
}

// --- Analytics ---

pub async fn analytics_page(
    State(state): State<AppState>,
    Query(params): Query<NoticeParams>,
) -> Html<String> {
    let snapshot = match state.refresh().await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!("Failed to load analytics: {err}");
            return load_failure(
                "Analytics",
                "analytics",
                "Error loading analytics",
                "Failed to load analytics data",
            );
        }
    };

    let stats = view::overview_stats(&snapshot.users, &snapshot.tasks);
    let breakdown = view::priority_breakdown(&snapshot.tasks);
    let summaries = view::user_summaries(&snapshot.users, &snapshot.tasks);

    let summary_html = if summaries.is_empty() {
        render::empty_state("No users yet")
    } else {
        render::summary_table(&summaries)
    };

    let body = format!(
        "<h1>Analytics</h1>\
         <div class=\"stat-grid\">{}{}{}{}</div>\
         <div class=\"card\"><h2>Priority Distribution</h2>{}</div>\
         <div class=\"card\"><h2>Task Status</h2>{}</div>\
         <div class=\"card\"><h2>User Summary</h2>{}</div>",
        render::stat_card(&stats.total_tasks.to_string(), "Total Tasks"),
        render::stat_card(&stats.completed_tasks.to_string(), "Completed"),
        render::stat_card(&format!("{}%", stats.completion_rate), "Completion Rate"),
        render::stat_card(&stats.avg_tasks_per_user.to_string(), "Avg per User"),
        render::priority_chart(&breakdown),
        render::status_chart(stats.completed_tasks, stats.pending_tasks),
        summary_html,
    );

    Html(render::page(
        "Analytics",
        "analytics",
        current_theme().as_str(),
        params.into_notice().as_ref(),
        &body,
    ))
}

// --- Notifications ---

#[derive(Deserialize)]
pub struct NotificationParams {
    filter: Option<String>,
    notice: Option<String>,
    kind: Option<String>,
}

pub async fn notifications_page(
    State(state): State<AppState>,
    Query(params): Query<NotificationParams>,
) -> Html<String> {
    let notice = NoticeParams {
        notice: params.notice,
        kind: params.kind,
    }
    .into_notice();

    let filter = params
        .filter
        .as_deref()
        .map(NotificationFilter::parse)
        .unwrap_or(NotificationFilter::All);
    let entries = state.notifications.list(filter);
    let unread = state.notifications.unread_count();

    let tabs: String = [
        ("all", "All"),
        ("unread", "Unread"),
        ("task", "Tasks"),
        ("user", "Users"),
        ("system", "System"),
    ]
    .iter()
    .map(|(key, label)| {
        let class = if *key == filter.as_str() { " class=\"active\"" } else { "" };
        format!("<a href=\"/notifications?filter={key}\"{class}>{label}</a>")
    })
    .collect();

    let list = if entries.is_empty() {
        render::empty_state("No notifications")
    } else {
        render::notification_items(&entries)
    };

    let body = format!(
        "<h1>Notifications</h1>\
         <p class=\"stat-label\">{unread} unread</p>\
         <div class=\"page-actions\">\
         <form method=\"post\" action=\"/notifications/read-all\">\
         <button class=\"btn btn-small\" type=\"submit\">Mark all as read</button></form>\
         <form method=\"post\" action=\"/notifications/clear\">\
         <button class=\"btn btn-small\" type=\"submit\">Clear all</button></form>\
         </div>\
         <div class=\"filter-tabs\">{tabs}</div>\
         <div class=\"card\">{list}</div>"
    );

    Html(render::page(
        "Notifications",
        "notifications",
        current_theme().as_str(),
        notice.as_ref(),
        &body,
    ))
}

pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Redirect {
    if state.notifications.mark_read(id) {
        redirect_with_notice(
            "/notifications",
            Notice::success("Notification marked as read"),
        )
    } else {
        redirect_with_notice("/notifications", Notice::error("Notification not found"))
    }
}

pub async fn delete_notification(State(state): State<AppState>, Path(id): Path<u32>) -> Redirect {
    if state.notifications.delete(id) {
        redirect_with_notice("/notifications", Notice::success("Notification deleted"))
    } else {
        redirect_with_notice("/notifications", Notice::error("Notification not found"))
    }
}

pub async fn mark_all_notifications_read(State(state): State<AppState>) -> Redirect {
    state.notifications.mark_all_read();
    redirect_with_notice(
        "/notifications",
        Notice::success("All notifications marked as read"),
    )
}

pub async fn clear_notifications(State(state): State<AppState>) -> Redirect {
    state.notifications.clear();
    redirect_with_notice("/notifications", Notice::success("All notifications cleared"))
}

// --- Profile ---

#[derive(Deserialize)]
pub struct ProfileParams {
    user: Option<i64>,
    notice: Option<String>,
    kind: Option<String>,
}

fn password_error(new_password: &str, confirm_password: &str) -> Option<&'static str> {
    if new_password != confirm_password {
        return Some("Passwords do not match");
    }
    if new_password.len() < 6 {
        return Some("Password must be at least 6 characters");
    }
    None
}

fn profile_body(user: &User, users: &[User], tasks: &[common::Task], today: NaiveDate) -> String {
    let user_tasks: Vec<&common::Task> =
        tasks.iter().filter(|t| t.user_id == user.id).collect();
    let completed = user_tasks.iter().filter(|t| t.completed).count();
    let pending = user_tasks.len() - completed;
    let rate = view::percentage(completed, user_tasks.len());
    let achievement_points = completed * 10;
    let days_active = (today - user.created_at.date()).num_days().max(0) + 1;

    format!(
        "<h1>Profile</h1>\
         <div class=\"card form-card\">\
         <form method=\"get\" action=\"/profile\">\
         <div class=\"form-row\">\
         <div><label for=\"profileUser\">Viewing profile of</label>\
         <select id=\"profileUser\" name=\"user\">{options}</select></div>\
         <div><button class=\"btn btn-small\" type=\"submit\">Switch</button></div>\
         </div></form></div>\
         <div class=\"stat-grid\">{s1}{s2}{s3}{s4}{s5}{s6}</div>\
         <div class=\"card form-card\"><h2>Profile Information</h2>\
         <form method=\"post\" action=\"/profile/update\">\
         <input type=\"hidden\" name=\"user_id\" value=\"{id}\">\
         <label for=\"profileUsername\">Username</label>\
         <input id=\"profileUsername\" type=\"text\" value=\"{username}\" readonly>\
         <label for=\"profileFullName\">Full Name</label>\
         <input id=\"profileFullName\" type=\"text\" name=\"full_name\" value=\"{full_name}\">\
         <label for=\"profileEmail\">Email</label>\
         <input id=\"profileEmail\" type=\"text\" name=\"email\" value=\"{email}\">\
         <div class=\"page-actions\">\
         <button class=\"btn btn-primary\" type=\"submit\">Save Profile</button></div>\
         </form></div>\
         <div class=\"card form-card\"><h2>Change Password</h2>\
         <form method=\"post\" action=\"/profile/password\">\
         <input type=\"hidden\" name=\"user_id\" value=\"{id}\">\
         <label for=\"currentPassword\">Current Password</label>\
         <input id=\"currentPassword\" type=\"password\" name=\"current_password\">\
         <label for=\"newPassword\">New Password</label>\
         <input id=\"newPassword\" type=\"password\" name=\"new_password\">\
         <label for=\"confirmPassword\">Confirm Password</label>\
         <input id=\"confirmPassword\" type=\"password\" name=\"confirm_password\">\
         <div class=\"page-actions\">\
         <button class=\"btn btn-primary\" type=\"submit\">Change Password</button></div>\
         </form></div>",
        options = render::user_options(users, Some(user.id)),
        id = user.id,
        username = render::escape(&user.username),
        full_name = render::escape(&user.full_name),
        email = render::escape(&user.email),
        s1 = render::stat_card(&completed.to_string(), "Completed Tasks"),
        s2 = render::stat_card(&pending.to_string(), "Pending Tasks"),
        s3 = render::stat_card(&user_tasks.len().to_string(), "Total Tasks"),
        s4 = render::stat_card(&format!("{rate}%"), "Completion Rate"),
        s5 = render::stat_card(&achievement_points.to_string(), "Achievement Points"),
        s6 = render::stat_card(&days_active.to_string(), "Days Active"),
    )
}

pub async fn profile_page(
    State(state): State<AppState>,
    Query(params): Query<ProfileParams>,
) -> Html<String> {
    let notice = NoticeParams {
        notice: params.notice,
        kind: params.kind,
    }
    .into_notice();

    let snapshot = match state.refresh().await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!("Failed to load profile: {err}");
            return load_failure(
                "Profile",
                "profile",
                "Error loading profile",
                "Failed to load profile data",
            );
        }
    };

    let user = match params.user {
        Some(id) => snapshot.users.iter().find(|u| u.id == id),
        None => snapshot.users.first(),
    };

    let body = match user {
        Some(user) => profile_body(
            user,
            &snapshot.users,
            &snapshot.tasks,
            Utc::now().date_naive(),
        ),
        None => format!(
            "<h1>Profile</h1><div class=\"card\">{}</div>",
            render::empty_state("No users yet. Create one to get started!")
        ),
    };

    Html(render::page(
        "Profile",
        "profile",
        current_theme().as_str(),
        notice.as_ref(),
        &body,
    ))
}

#[derive(Deserialize)]
pub struct ProfileForm {
    user_id: Option<String>,
    full_name: Option<String>,
    email: Option<String>,
}

pub async fn update_profile(
    State(state): State<AppState>,
    Form(form): Form<ProfileForm>,
) -> Redirect {
    let Some(user_id) = form.user_id.as_deref().and_then(|v| v.parse::<i64>().ok()) else {
        return redirect_with_notice("/profile", Notice::error("No user selected"));
    };
    let back = format!("/profile?user={user_id}");

    let full_name = form.full_name.as_deref().unwrap_or("").trim();
    let email = form.email.as_deref().unwrap_or("").trim();
    if full_name.is_empty() || email.is_empty() {
        return redirect_with_notice(&back, Notice::error("Please fill in all fields"));
    }
    if !EMAIL_RE.is_match(email) {
        return redirect_with_notice(&back, Notice::error("Please enter a valid email address"));
    }

    let payload = UpdateUserPayload {
        full_name: Some(full_name.to_string()),
        email: Some(email.to_string()),
        ..Default::default()
    };
    match state.api.update_user(user_id, &payload).await {
        Ok(_) => redirect_with_notice(&back, Notice::success("Profile updated successfully")),
        Err(err) => {
            warn!("Failed to update profile for user {user_id}: {err}");
            redirect_with_notice(&back, Notice::error(err.message()))
        }
    }
}

#[derive(Deserialize)]
pub struct PasswordForm {
    user_id: Option<String>,
    #[allow(dead_code)]
    current_password: Option<String>,
    new_password: Option<String>,
    confirm_password: Option<String>,
}

/// Validation only: the upstream exposes no password endpoint, so a
/// passing form is acknowledged without a network call.
pub async fn change_password(Form(form): Form<PasswordForm>) -> Redirect {
    let back = match form.user_id.as_deref().and_then(|v| v.parse::<i64>().ok()) {
        Some(user_id) => format!("/profile?user={user_id}"),
        None => "/profile".to_string(),
    };

    let new_password = form.new_password.as_deref().unwrap_or("");
    let confirm_password = form.confirm_password.as_deref().unwrap_or("");
    if let Some(message) = password_error(new_password, confirm_password) {
        return redirect_with_notice(&back, Notice::error(message));
    }

    redirect_with_notice(&back, Notice::success("Password changed successfully"))
}

// --- Reports ---

const REPORT_TYPES: &[&str] = &["tasks", "users", "performance"];
const REPORT_RANGES: &[&str] = &["week", "month", "quarter"];
const REPORT_FORMATS: &[&str] = &["pdf", "csv", "json"];

pub async fn reports_page(Query(params): Query<NoticeParams>) -> Html<String> {
    let body = "<h1>Reports</h1>\
         <div class=\"card form-card\"><h2>Generate Report</h2>\
         <form method=\"post\" action=\"/reports/generate\">\
         <div class=\"form-row\">\
         <div><label for=\"reportType\">Report Type</label>\
         <select id=\"reportType\" name=\"report_type\">\
         <option value=\"tasks\">Tasks</option>\
         <option value=\"users\">Users</option>\
         <option value=\"performance\">Performance</option>\
         </select></div>\
         <div><label for=\"dateRange\">Date Range</label>\
         <select id=\"dateRange\" name=\"date_range\">\
         <option value=\"week\">This Week</option>\
         <option value=\"month\">This Month</option>\
         <option value=\"quarter\">This Quarter</option>\
         </select></div>\
         <div><label for=\"exportFormat\">Export Format</label>\
         <select id=\"exportFormat\" name=\"export_format\">\
         <option value=\"pdf\">PDF</option>\
         <option value=\"csv\">CSV</option>\
         <option value=\"json\">JSON</option>\
         </select></div>\
         <div><button class=\"btn btn-primary\" type=\"submit\">Generate</button></div>\
         </div></form></div>"
        .to_string();

    Html(render::page(
        "Reports",
        "reports",
        current_theme().as_str(),
        params.into_notice().as_ref(),
        &body,
    ))
}

#[derive(Deserialize)]
pub struct ReportForm {
    report_type: Option<String>,
    date_range: Option<String>,
    export_format: Option<String>,
}

pub async fn generate_report(Form(form): Form<ReportForm>) -> Redirect {
    let report_type = form.report_type.as_deref().unwrap_or("");
    let date_range = form.date_range.as_deref().unwrap_or("");
    let export_format = form.export_format.as_deref().unwrap_or("");

    if !REPORT_TYPES.contains(&report_type)
        || !REPORT_RANGES.contains(&date_range)
        || !REPORT_FORMATS.contains(&export_format)
    {
        return redirect_with_notice("/reports", Notice::error("Unknown report selection"));
    }

    info!("Generated {report_type} report for {date_range} as {export_format}");
    redirect_with_notice(
        "/reports",
        Notice::success(format!(
            "{report_type} report generated successfully as {export_format}"
        )),
    )
}

// --- Settings ---

pub async fn settings_page(
    State(state): State<AppState>,
    Query(params): Query<NoticeParams>,
) -> Html<String> {
    let preferences = prefs::current();

    // The original settings page logged a failed stats fetch without a
    // toast; the controls stay usable either way.
    let database_html = match state.refresh().await {
        Ok(snapshot) => {
            let users = snapshot.users.len();
            let tasks = snapshot.tasks.len();
            let estimated_kb = (users * 200 + tasks * 300) as f64 / 1024.0;
            format!(
                "<p><strong>Total Records:</strong> {}</p>\
                 <p><strong>Users:</strong> {users}</p>\
                 <p><strong>Tasks:</strong> {tasks}</p>\
                 <p><strong>Est. Database Size:</strong> {estimated_kb:.2} KB</p>",
                users + tasks
            )
        }
        Err(err) => {
            warn!("Failed to load database stats: {err}");
            render::empty_state("Failed to load database stats")
        }
    };

    let (dark_marker, light_marker) = match preferences.theme {
        Theme::Dark => (" selected", ""),
        Theme::Light => ("", " selected"),
    };
    let notifications_marker = if preferences.notifications_enabled {
        " checked"
    } else {
        ""
    };

    let body = format!(
        "<h1>Settings</h1>\
         <div class=\"card form-card\"><h2>Appearance</h2>\
         <form method=\"post\" action=\"/settings/update\">\
         <input type=\"hidden\" name=\"section\" value=\"theme\">\
         <div class=\"form-row\">\
         <div><label for=\"themeSelect\">Theme</label>\
         <select id=\"themeSelect\" name=\"theme\">\
         <option value=\"dark\"{dark_marker}>Dark</option>\
         <option value=\"light\"{light_marker}>Light</option>\
         </select></div>\
         <div><button class=\"btn btn-small\" type=\"submit\">Save</button></div>\
         </div></form></div>\
         <div class=\"card form-card\"><h2>Notifications</h2>\
         <form method=\"post\" action=\"/settings/update\">\
         <input type=\"hidden\" name=\"section\" value=\"notifications\">\
         <div class=\"form-row\">\
         <div><label for=\"notifications\">Enable notifications</label>\
         <input id=\"notifications\" type=\"checkbox\" name=\"notifications\"{notifications_marker}></div>\
         <div><button class=\"btn btn-small\" type=\"submit\">Save</button></div>\
         </div></form></div>\
         <div class=\"card form-card\"><h2>Display</h2>\
         <form method=\"post\" action=\"/settings/update\">\
         <input type=\"hidden\" name=\"section\" value=\"display\">\
         <div class=\"form-row\">\
         <div><label for=\"itemsPerPage\">Items per page</label>\
         <input id=\"itemsPerPage\" type=\"number\" name=\"items_per_page\" value=\"{items_per_page}\"></div>\
         <div><button class=\"btn btn-small\" type=\"submit\">Save</button></div>\
         </div></form></div>\
         <div class=\"card\"><h2>Database</h2>{database_html}</div>\
         <div class=\"card\"><h2>Data</h2>\
         <div class=\"page-actions\">\
         <a class=\"btn\" href=\"/settings/export\">Export Data</a>\
         <form method=\"post\" action=\"/settings/clear-cache\">\
         <button class=\"btn\" type=\"submit\">Clear Cached Data</button></form>\
         <form method=\"post\" action=\"/settings/reset\">\
         <button class=\"btn\" type=\"submit\">Reset to Defaults</button></form>\
         </div></div>",
        items_per_page = preferences.items_per_page,
    );

    Html(render::page(
        "Settings",
        "settings",
        preferences.theme.as_str(),
        params.into_notice().as_ref(),
        &body,
    ))
}

#[derive(Deserialize)]
pub struct SettingsForm {
    section: Option<String>,
    theme: Option<String>,
    notifications: Option<String>,
    items_per_page: Option<String>,
}

pub async fn update_settings(Form(form): Form<SettingsForm>) -> Redirect {
    match form.section.as_deref() {
        Some("theme") => {
            let Some(theme) = form.theme.as_deref().and_then(Theme::parse) else {
                return redirect_with_notice("/settings", Notice::error("Unknown theme"));
            };
            prefs::update(|preferences| preferences.theme = theme);
            redirect_with_notice("/settings", Notice::success("Theme updated"))
        }
        Some("notifications") => {
            let enabled = form.notifications.is_some();
            prefs::update(|preferences| preferences.notifications_enabled = enabled);
            redirect_with_notice(
                "/settings",
                Notice::success("Notification settings updated"),
            )
        }
        Some("display") => {
            let items = prefs::clamp_items_per_page(form.items_per_page.as_deref().unwrap_or(""));
            prefs::update(|preferences| preferences.items_per_page = items);
            redirect_with_notice("/settings", Notice::success("Display settings updated"))
        }
        _ => redirect_with_notice("/settings", Notice::error("Unknown settings section")),
    }
}

pub async fn export_data(State(state): State<AppState>) -> Response {
    match state.refresh().await {
        Ok(snapshot) => {
            let export = serde_json::json!({
                "export_date": Utc::now().naive_utc(),
                "users": &snapshot.users,
                "tasks": &snapshot.tasks,
            });
            let body = serde_json::to_string_pretty(&export).unwrap_or_default();
            (
                [
                    (header::CONTENT_TYPE, "application/json"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"task-app-export.json\"",
                    ),
                ],
                body,
            )
                .into_response()
        }
        Err(err) => {
            warn!("Failed to export data: {err}");
            redirect_with_notice("/settings", Notice::error("Error exporting data")).into_response()
        }
    }
}

pub async fn clear_cache(State(state): State<AppState>) -> Redirect {
    state.cache.clear();
    prefs::reset();
    redirect_with_notice("/settings", Notice::success("Cache cleared successfully"))
}

pub async fn reset_settings() -> Redirect {
    prefs::reset();
    redirect_with_notice("/settings", Notice::success("Settings reset to defaults"))
}
