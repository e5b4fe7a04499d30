// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Stateless rendering utilities shared by every page controller: HTML
//! escaping, date formatting, the page layout and the markup fragments.
//! Everything returns plain strings; fragment replacement is total, there
//! is no diffing.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use common::{Priority, Task, User};

use crate::notifications::Notification;
use crate::view::{self, PriorityBreakdown, UserSummary};

/// Escapes user-supplied text for interpolation into markup.
///
/// Every user-controlled field (title, description, username, email, full
/// name) must pass through here before it reaches a fragment; these
/// strings can contain active markup.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Full timestamp for meta rows; `"N/A"` when absent.
pub fn format_date(value: Option<NaiveDateTime>) -> String {
    match value {
        Some(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        None => "N/A".to_string(),
    }
}

/// Short month-and-day form for badges.
pub fn format_day(value: NaiveDateTime) -> String {
    value.format("%b %-d").to_string()
}

/// Severity of a transient notice, mirrored in the toast CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
            NoticeKind::Info => "info",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "success" => Some(NoticeKind::Success),
            "error" => Some(NoticeKind::Error),
            "info" => Some(NoticeKind::Info),
            _ => None,
        }
    }
}

/// A transient notification surfaced as a toast on the next rendered
/// page. Carried across the mutation redirect in the query string.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }
}

const NAV_ITEMS: &[(&str, &str, &str)] = &[
    ("/", "Dashboard", "dashboard"),
    ("/users", "Users", "users"),
    ("/tasks", "Tasks", "tasks"),
    ("/calendar", "Calendar", "calendar"),
    ("/analytics", "Analytics", "analytics"),
    ("/notifications", "Notifications", "notifications"),
    ("/reports", "Reports", "reports"),
    ("/profile", "Profile", "profile"),
    ("/settings", "Settings", "settings"),
];

/// Wraps a page body in the shared document layout: stylesheet, nav bar
/// with the active page marked, and the toast when a notice is present.
pub fn page(title: &str, active: &str, theme: &str, notice: Option<&Notice>, body: &str) -> String {
    let nav_links: String = NAV_ITEMS
        .iter()
        .map(|(href, label, key)| {
            let class = if *key == active { " class=\"active\"" } else { "" };
            format!("<a href=\"{href}\"{class}>{label}</a>")
        })
        .collect();

    let body_class = if theme == "light" { " class=\"light-mode\"" } else { "" };

    let toast = match notice {
        Some(notice) => format!(
            "<div class=\"toast show {}\">{}</div>",
            notice.kind.as_str(),
            escape(&notice.message)
        ),
        None => String::new(),
    };

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} - Task Manager</title>\n\
         <style>{STYLESHEET}</style>\n\
         </head>\n\
         <body{body_class}>\n\
         <nav class=\"navbar\"><div class=\"nav-container\">\n\
         <span class=\"nav-brand\">Task Manager</span>\n\
         <div class=\"nav-links\">{nav_links}</div>\n\
         </div></nav>\n\
         <main class=\"container\">\n\
         {toast}\n\
         {body}\n\
         </main>\n\
         </body>\n\
         </html>\n",
        title = escape(title),
    )
}

/// Centered placeholder for an empty or failed-to-load list.
pub fn empty_state(message: &str) -> String {
    format!("<p class=\"empty-state\">{}</p>", escape(message))
}

/// One numeric card for the stat grids.
pub fn stat_card(value: &str, label: &str) -> String {
    format!(
        "<div class=\"stat-card\"><div class=\"stat-value\">{}</div>\
         <div class=\"stat-label\">{}</div></div>",
        escape(value),
        escape(label)
    )
}

/// `<option>` list for a user `<select>`, display name falling back to
/// the username.
pub fn user_options(users: &[User], selected: Option<i64>) -> String {
    users
        .iter()
        .map(|user| {
            let marker = if selected == Some(user.id) { " selected" } else { "" };
            format!(
                "<option value=\"{}\"{}>{}</option>",
                user.id,
                marker,
                escape(view::display_name(user))
            )
        })
        .collect()
}

/// `<option>` list for a priority `<select>`.
pub fn priority_options(selected: Option<Priority>) -> String {
    [Priority::High, Priority::Medium, Priority::Low]
        .iter()
        .map(|priority| {
            let marker = if selected == Some(*priority) { " selected" } else { "" };
            format!(
                "<option value=\"{0}\"{1}>{0}</option>",
                priority.as_str(),
                marker
            )
        })
        .collect()
}

fn owner_name(users: &[User], user_id: i64) -> String {
    users
        .iter()
        .find(|user| user.id == user_id)
        .map(|user| escape(view::display_name(user)))
        .unwrap_or_else(|| "Unknown User".to_string())
}

/// Task cards for the tasks page, one card per task with its delete,
/// toggle and edit controls.
pub fn task_cards(tasks: &[&Task], users: &[User]) -> String {
    tasks
        .iter()
        .map(|task| {
            let completed_class = if task.completed { " completed" } else { "" };
            let description = match &task.description {
                Some(text) if !text.is_empty() => escape(text),
                _ => "No description".to_string(),
            };
            let due_badge = match task.due_date {
                Some(due) => format!(
                    "<span class=\"badge\">Due: {}</span>",
                    format_day(due)
                ),
                None => String::new(),
            };
            let (status_class, status_label) = if task.completed {
                ("completed", "Completed")
            } else {
                ("pending", "Pending")
            };
            let toggle_label = if task.completed { "Mark Pending" } else { "Mark Complete" };
            let edit_description = task.description.as_deref().map(escape).unwrap_or_default();

            format!(
                "<div class=\"task-card{completed_class}\">\
                 <div class=\"task-header\"><div>\
                 <h4>{title}</h4>\
                 <p class=\"task-user\">by {owner}</p>\
                 </div>\
                 <form method=\"post\" action=\"/tasks/{id}/delete\">\
                 <button class=\"btn-icon\" type=\"submit\">&times;</button></form>\
                 </div>\
                 <p class=\"task-description\">{description}</p>\
                 <div class=\"task-footer\">\
                 <div class=\"task-badges\">\
                 <span class=\"badge priority-{priority}\">{priority}</span>\
                 <span class=\"badge status-{status_class}\">{status_label}</span>\
                 {due_badge}\
                 </div>\
                 <form method=\"post\" action=\"/tasks/{id}/toggle\">\
                 <input type=\"hidden\" name=\"back\" value=\"/tasks\">\
                 <button class=\"btn btn-small\" type=\"submit\">{toggle_label}</button>\
                 </form>\
                 </div>\
                 <details class=\"task-edit\"><summary>Edit</summary>\
                 <form method=\"post\" action=\"/tasks/{id}/update\" class=\"edit-form\">\
                 <input type=\"text\" name=\"title\" value=\"{title}\">\
                 <textarea name=\"description\">{edit_description}</textarea>\
                 <select name=\"priority\">{priority_options}</select>\
                 <button class=\"btn btn-small\" type=\"submit\">Save</button>\
                 </form></details>\
                 </div>",
                id = task.id,
                title = escape(&task.title),
                owner = owner_name(users, task.user_id),
                priority = task.priority.as_str(),
                priority_options = priority_options(Some(task.priority)),
            )
        })
        .collect()
}

/// Compact task rows for the dashboard recent list, each with its
/// complete/undo toggle.
pub fn recent_task_list(tasks: &[&Task]) -> String {
    tasks
        .iter()
        .map(|task| {
            let description = match &task.description {
                Some(text) if !text.is_empty() => escape(text),
                _ => "No description".to_string(),
            };
            let (status_class, status_label) = if task.completed {
                ("completed", "Completed")
            } else {
                ("pending", "Pending")
            };
            let toggle_label = if task.completed { "Undo" } else { "Complete" };

            format!(
                "<div class=\"task-item\">\
                 <div class=\"task-info\">\
                 <h4>{title}</h4>\
                 <p>{description}</p>\
                 <div class=\"task-meta\">\
                 <span class=\"priority priority-{priority}\">{priority}</span>\
                 <span class=\"status {status_class}\">{status_label}</span>\
                 </div>\
                 </div>\
                 <form method=\"post\" action=\"/tasks/{id}/toggle\">\
                 <input type=\"hidden\" name=\"back\" value=\"/\">\
                 <button class=\"btn-small\" type=\"submit\">{toggle_label}</button>\
                 </form>\
                 </div>",
                id = task.id,
                title = escape(&task.title),
                priority = task.priority.as_str(),
            )
        })
        .collect()
}

/// Minimal task rows for the calendar side panels (no controls).
pub fn simple_task_items(tasks: &[&Task]) -> String {
    tasks
        .iter()
        .map(|task| {
            let description = match &task.description {
                Some(text) if !text.is_empty() => escape(text),
                _ => "No description".to_string(),
            };
            format!(
                "<div class=\"task-item\">\
                 <div class=\"task-info\">\
                 <h4>{}</h4>\
                 <p>{}</p>\
                 </div>\
                 <span class=\"meta-tag priority-{2}\">{2}</span>\
                 </div>",
                escape(&task.title),
                description,
                task.priority.as_str(),
            )
        })
        .collect()
}

/// User cards for the users page grid, each with delete and an inline
/// full-name edit.
pub fn user_cards(users: &[User]) -> String {
    users
        .iter()
        .map(|user| {
            format!(
                "<div class=\"user-card\">\
                 <div class=\"user-header\">\
                 <h3>{name}</h3>\
                 <form method=\"post\" action=\"/users/{id}/delete\">\
                 <button class=\"btn-icon\" type=\"submit\">&times;</button></form>\
                 </div>\
                 <div class=\"user-details\">\
                 <p><strong>Username:</strong> {username}</p>\
                 <p><strong>Email:</strong> {email}</p>\
                 <p><strong>Created:</strong> {created}</p>\
                 <details><summary>Edit</summary>\
                 <form method=\"post\" action=\"/users/{id}/update\" class=\"edit-form\">\
                 <input type=\"text\" name=\"full_name\" value=\"{full_name}\">\
                 <button class=\"btn btn-primary\" type=\"submit\">Save</button>\
                 </form></details>\
                 </div>\
                 </div>",
                id = user.id,
                name = escape(view::display_name(user)),
                username = escape(&user.username),
                email = escape(&user.email),
                full_name = escape(&user.full_name),
                created = format_date(Some(user.created_at)),
            )
        })
        .collect()
}

/// The analytics per-user summary table, rate cells classed by the
/// 75/50 percent thresholds.
pub fn summary_table(summaries: &[UserSummary]) -> String {
    let rows: String = summaries
        .iter()
        .map(|summary| {
            let rate_class = if summary.completion_rate >= 75 {
                "rate-high"
            } else if summary.completion_rate >= 50 {
                "rate-mid"
            } else {
                "rate-low"
            };
            format!(
                "<tr><td>{}</td><td>{}</td>\
                 <td><span class=\"pill completed-pill\">{}</span></td>\
                 <td><span class=\"pill {}\">{}%</span></td></tr>",
                escape(&summary.name),
                summary.task_count,
                summary.completed_count,
                rate_class,
                summary.completion_rate,
            )
        })
        .collect();

    format!(
        "<table class=\"summary-table\">\
         <thead><tr><th>User</th><th>Total Tasks</th><th>Completed</th><th>Rate</th></tr></thead>\
         <tbody>{rows}</tbody></table>"
    )
}

/// The analytics priority bar chart; bar heights are proportional to the
/// largest bucket and never collapse to zero.
pub fn priority_chart(breakdown: &PriorityBreakdown) -> String {
    let max = breakdown.max_count().max(1);
    let bar = |count: usize, class: &str, label: &str| {
        let height = count * 100 / max;
        format!(
            "<div class=\"chart-col\">\
             <div class=\"chart-bar {class}\" style=\"height: {height}%\"></div>\
             <div class=\"chart-caption\"><div class=\"chart-count {class}-text\">{count}</div>\
             <div class=\"chart-label\">{label}</div></div>\
             </div>"
        )
    };
    format!(
        "<div class=\"priority-chart\">{}{}{}</div>",
        bar(breakdown.high, "bar-high", "High"),
        bar(breakdown.medium, "bar-medium", "Medium"),
        bar(breakdown.low, "bar-low", "Low"),
    )
}

/// The completed/pending horizontal breakdown bars.
pub fn status_chart(completed: usize, pending: usize) -> String {
    let total = (completed + pending).max(1);
    let completed_percent = completed * 100 / total;
    let pending_percent = pending * 100 / total;
    format!(
        "<div class=\"status-chart\">\
         <div class=\"status-row\">\
         <div class=\"status-legend\"><span>Completed: {completed}</span><span>{completed_percent}%</span></div>\
         <div class=\"status-track\"><div class=\"status-fill fill-completed\" style=\"width: {completed_percent}%\"></div></div>\
         </div>\
         <div class=\"status-row\">\
         <div class=\"status-legend\"><span>Pending: {pending}</span><span>{pending_percent}%</span></div>\
         <div class=\"status-track\"><div class=\"status-fill fill-pending\" style=\"width: {pending_percent}%\"></div></div>\
         </div>\
         </div>"
    )
}

fn days_in_month(first_of_month: NaiveDate) -> u32 {
    let (year, month) = if first_of_month.month() == 12 {
        (first_of_month.year() + 1, 1)
    } else {
        (first_of_month.year(), first_of_month.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(30)
}

/// The month grid: weekday headers plus a fixed 42-cell layout with
/// leading and trailing other-month days, today highlighted.
pub fn calendar_grid(first_of_month: NaiveDate, today: NaiveDate) -> String {
    let mut cells = String::new();

    for weekday in ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"] {
        cells.push_str(&format!("<div class=\"calendar-weekday\">{weekday}</div>"));
    }

    let leading = first_of_month.weekday().num_days_from_sunday();
    let days = days_in_month(first_of_month);
    let prev_month_last = first_of_month
        .pred_opt()
        .map(|last| last.day())
        .unwrap_or(31);

    for offset in (0..leading).rev() {
        let day = prev_month_last - offset;
        cells.push_str(&format!(
            "<div class=\"calendar-day other-month\"><div class=\"day-number\">{day}</div></div>"
        ));
    }

    for day in 1..=days {
        let is_today = first_of_month.year() == today.year()
            && first_of_month.month() == today.month()
            && day == today.day();
        let today_class = if is_today { " today" } else { "" };
        cells.push_str(&format!(
            "<div class=\"calendar-day{today_class}\"><div class=\"day-number\">{day}</div></div>"
        ));
    }

    let trailing = 42 - (leading + days);
    for day in 1..=trailing {
        cells.push_str(&format!(
            "<div class=\"calendar-day other-month\"><div class=\"day-number\">{day}</div></div>"
        ));
    }

    format!("<div class=\"calendar-grid\">{cells}</div>")
}

/// Notification feed rows with their per-item mark-read and delete
/// controls.
pub fn notification_items(items: &[Notification]) -> String {
    items
        .iter()
        .map(|item| {
            let unread_class = if item.read { "" } else { " unread" };
            let mark_read = if item.read {
                String::new()
            } else {
                format!(
                    "<form method=\"post\" action=\"/notifications/{}/read\">\
                     <button class=\"btn-small\" type=\"submit\">Mark read</button></form>",
                    item.id
                )
            };
            format!(
                "<div class=\"notification-item{unread_class}\">\
                 <div class=\"notification-icon {kind}\"></div>\
                 <div class=\"notification-content\">\
                 <p>{message}</p>\
                 <span class=\"notification-time\">{time}</span>\
                 </div>\
                 <div class=\"notification-actions\">{mark_read}\
                 <form method=\"post\" action=\"/notifications/{id}/delete\">\
                 <button class=\"btn-icon\" type=\"submit\">&times;</button></form>\
                 </div>\
                 </div>",
                id = item.id,
                kind = item.kind.as_str(),
                message = escape(&item.message),
                time = format_date(Some(item.created_at)),
            )
        })
        .collect()
}

const STYLESHEET: &str = "\
:root { --primary: #667eea; }\n\
* { box-sizing: border-box; }\n\
body { margin: 0; font-family: 'Segoe UI', Arial, sans-serif; background: #1a1a1a; color: #eee; }\n\
body.light-mode { background: #f5f6fa; color: #333; }\n\
.navbar { background: #23243a; }\n\
body.light-mode .navbar { background: #fff; box-shadow: 0 2px 8px rgba(0,0,0,0.05); }\n\
.nav-container { max-width: 1100px; margin: 0 auto; display: flex; align-items: center; justify-content: space-between; padding: 14px 20px; }\n\
.nav-brand { font-weight: bold; color: var(--primary); }\n\
.nav-links a { color: inherit; text-decoration: none; margin-left: 14px; font-size: 0.95em; opacity: 0.8; }\n\
.nav-links a.active { color: var(--primary); opacity: 1; font-weight: 600; }\n\
.container { max-width: 1100px; margin: 0 auto; padding: 20px; }\n\
h1, h2, h3 { margin: 0.5em 0; }\n\
.card { background: #23243a; border-radius: 8px; padding: 20px; margin-bottom: 20px; }\n\
body.light-mode .card { background: #fff; box-shadow: 0 2px 8px rgba(0,0,0,0.05); }\n\
.toast { position: fixed; top: 20px; right: 20px; padding: 15px 25px; color: white; border-radius: 5px; z-index: 1000; }\n\
.toast.success { background: #4caf50; }\n\
.toast.error { background: #f44336; }\n\
.toast.info { background: #2196f3; }\n\
.stat-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(200px, 1fr)); gap: 20px; margin: 20px 0; }\n\
.stat-card { background: #23243a; border-radius: 8px; padding: 24px; text-align: center; }\n\
body.light-mode .stat-card { background: #fff; box-shadow: 0 2px 8px rgba(0,0,0,0.05); }\n\
.stat-value { font-size: 2.5em; font-weight: bold; color: var(--primary); margin-bottom: 10px; }\n\
.stat-label { color: #999; font-size: 0.9em; }\n\
.empty-state { text-align: center; padding: 40px; color: #666; }\n\
form { margin: 0; }\n\
.form-card label { display: block; margin: 10px 0 4px; font-size: 0.9em; color: #999; }\n\
input, select, textarea { width: 100%; padding: 8px 10px; border: 1px solid #444; border-radius: 6px; background: inherit; color: inherit; font: inherit; }\n\
body.light-mode input, body.light-mode select, body.light-mode textarea { border-color: #ddd; }\n\
.form-row { display: flex; gap: 12px; align-items: flex-end; flex-wrap: wrap; }\n\
.form-row > div { flex: 1; min-width: 140px; }\n\
.btn { background: var(--primary); color: white; border: none; border-radius: 6px; padding: 10px 18px; cursor: pointer; }\n\
.btn-primary { background: var(--primary); }\n\
.btn-small, .btn.btn-small { padding: 6px 12px; font-size: 0.85em; background: var(--primary); color: white; border: none; border-radius: 6px; cursor: pointer; }\n\
.btn-icon { background: none; border: none; font-size: 20px; cursor: pointer; color: #f44336; }\n\
.card-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); gap: 20px; margin-top: 20px; }\n\
.task-card { background: #23243a; border-left: 4px solid var(--primary); border-radius: 8px; padding: 20px; }\n\
body.light-mode .task-card { background: #fff; box-shadow: 0 2px 8px rgba(0,0,0,0.05); }\n\
.task-card.completed { opacity: 0.7; border-left-color: #4caf50; }\n\
.task-header { display: flex; justify-content: space-between; align-items: flex-start; gap: 10px; }\n\
.task-header h4 { margin: 0; word-break: break-word; }\n\
.task-user { font-size: 0.85em; color: #999; margin: 5px 0 0 0; }\n\
.task-description { color: #999; font-size: 0.95em; margin: 10px 0; line-height: 1.4; }\n\
.task-footer { display: flex; justify-content: space-between; align-items: center; gap: 10px; flex-wrap: wrap; }\n\
.task-badges { display: flex; gap: 5px; flex-wrap: wrap; }\n\
.badge, .pill { display: inline-block; padding: 4px 12px; border-radius: 20px; font-size: 0.8em; font-weight: 500; background: #e0e0e0; color: #333; }\n\
.badge.priority-high { background: #ffebee; color: #c62828; }\n\
.badge.priority-medium { background: #fff3e0; color: #e65100; }\n\
.badge.priority-low { background: #e8f5e9; color: #2e7d32; }\n\
.badge.status-completed, .pill.completed-pill, .pill.rate-high { background: #e8f5e9; color: #2e7d32; }\n\
.badge.status-pending { background: #e3f2fd; color: #1565c0; }\n\
.pill.rate-mid { background: #fff3e0; color: #e65100; }\n\
.pill.rate-low { background: #ffebee; color: #c62828; }\n\
.task-edit summary, .user-details summary { cursor: pointer; color: #999; font-size: 0.85em; margin-top: 10px; }\n\
.edit-form { display: flex; flex-direction: column; gap: 8px; margin-top: 8px; }\n\
.task-item { display: flex; justify-content: space-between; align-items: center; gap: 12px; padding: 14px 0; border-bottom: 1px solid #333; }\n\
body.light-mode .task-item { border-bottom-color: #eee; }\n\
.task-info h4 { margin: 0 0 4px; }\n\
.task-info p { margin: 0; color: #999; font-size: 0.9em; }\n\
.task-meta { display: flex; gap: 6px; margin-top: 6px; }\n\
.priority, .status, .meta-tag { display: inline-block; padding: 2px 10px; border-radius: 12px; font-size: 0.75em; background: #e0e0e0; color: #333; }\n\
.priority-high, .meta-tag.priority-high { background: #ffebee; color: #c62828; }\n\
.priority-medium, .meta-tag.priority-medium { background: #fff3e0; color: #e65100; }\n\
.priority-low, .meta-tag.priority-low { background: #e8f5e9; color: #2e7d32; }\n\
.status.completed { background: #e8f5e9; color: #2e7d32; }\n\
.status.pending { background: #e3f2fd; color: #1565c0; }\n\
.user-card { background: #23243a; border: 1px solid #333; border-radius: 8px; padding: 20px; }\n\
body.light-mode .user-card { background: #fff; border-color: #ddd; }\n\
.user-header { display: flex; justify-content: space-between; align-items: center; border-bottom: 1px solid #333; padding-bottom: 10px; margin-bottom: 10px; }\n\
body.light-mode .user-header { border-bottom-color: #eee; }\n\
.user-header h3 { margin: 0; }\n\
.user-details p { margin: 8px 0; font-size: 0.9em; color: #999; }\n\
.summary-table { width: 100%; border-collapse: collapse; }\n\
.summary-table th { padding: 12px; text-align: left; border-bottom: 2px solid #444; }\n\
.summary-table td { padding: 12px; border-bottom: 1px solid #333; }\n\
body.light-mode .summary-table th { border-bottom-color: #ddd; }\n\
body.light-mode .summary-table td { border-bottom-color: #eee; }\n\
.priority-chart { display: flex; align-items: flex-end; justify-content: space-around; height: 200px; gap: 20px; padding: 20px 20px 0; }\n\
.chart-col { display: flex; flex-direction: column; align-items: center; justify-content: flex-end; flex: 1; height: 100%; }\n\
.chart-bar { width: 40px; border-radius: 4px 4px 0 0; min-height: 10px; }\n\
.chart-bar.bar-high { background: #f44336; }\n\
.chart-bar.bar-medium { background: #ff9800; }\n\
.chart-bar.bar-low { background: #4caf50; }\n\
.chart-caption { margin-top: 10px; text-align: center; font-size: 0.9em; }\n\
.chart-count { font-weight: bold; }\n\
.bar-high-text { color: #f44336; }\n\
.bar-medium-text { color: #ff9800; }\n\
.bar-low-text { color: #4caf50; }\n\
.chart-label { color: #999; font-size: 0.85em; }\n\
.status-chart { padding: 20px; }\n\
.status-row { margin-bottom: 24px; }\n\
.status-legend { display: flex; justify-content: space-between; margin-bottom: 8px; font-size: 0.9em; }\n\
.status-track { height: 25px; background: #e0e0e0; border-radius: 12px; overflow: hidden; }\n\
.status-fill { height: 100%; border-radius: 12px; }\n\
.fill-completed { background: linear-gradient(90deg, #4caf50, #45a049); }\n\
.fill-pending { background: linear-gradient(90deg, #2196f3, #1976d2); }\n\
.calendar-header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 12px; }\n\
.calendar-grid { display: grid; grid-template-columns: repeat(7, 1fr); gap: 4px; }\n\
.calendar-weekday { text-align: center; font-size: 0.8em; color: #999; padding: 6px 0; }\n\
.calendar-day { min-height: 70px; border: 1px solid #333; border-radius: 6px; padding: 6px; }\n\
body.light-mode .calendar-day { border-color: #eee; background: #fff; }\n\
.calendar-day.other-month { opacity: 0.35; }\n\
.calendar-day.today { border-color: var(--primary); box-shadow: inset 0 0 0 1px var(--primary); }\n\
.day-number { font-size: 0.85em; }\n\
.filter-tabs { display: flex; gap: 8px; margin: 14px 0; flex-wrap: wrap; }\n\
.filter-tabs a { padding: 6px 14px; border-radius: 16px; text-decoration: none; color: inherit; background: #23243a; font-size: 0.85em; }\n\
body.light-mode .filter-tabs a { background: #fff; box-shadow: 0 1px 4px rgba(0,0,0,0.08); }\n\
.filter-tabs a.active { background: var(--primary); color: white; }\n\
.notification-item { display: flex; align-items: center; gap: 14px; padding: 14px 0; border-bottom: 1px solid #333; }\n\
body.light-mode .notification-item { border-bottom-color: #eee; }\n\
.notification-item.unread { font-weight: 600; }\n\
.notification-icon { width: 12px; height: 12px; border-radius: 50%; flex-shrink: 0; }\n\
.notification-icon.task { background: var(--primary); }\n\
.notification-icon.user { background: #4caf50; }\n\
.notification-icon.system { background: #ff9800; }\n\
.notification-content { flex: 1; }\n\
.notification-content p { margin: 0; }\n\
.notification-time { color: #999; font-size: 0.8em; }\n\
.notification-actions { display: flex; gap: 8px; }\n\
.page-actions { display: flex; gap: 10px; margin: 12px 0; flex-wrap: wrap; }\n\
";

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use common::Priority;

    fn sample_task(title: &str) -> Task {
        Task {
            id: 1,
            user_id: 1,
            title: title.to_string(),
            description: Some("desc".to_string()),
            priority: Priority::High,
            completed: false,
            due_date: None,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn escape_neutralizes_markup_characters() {
        assert_eq!(
            escape("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
        assert_eq!(escape("a & b"), "a &amp; b");
        assert_eq!(escape("\"quoted\" 'single'"), "&quot;quoted&quot; &#39;single&#39;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn format_date_handles_missing_values() {
        assert_eq!(format_date(None), "N/A");
        let ts = NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(format_date(Some(ts)), "2024-02-01 09:30");
        assert_eq!(format_day(ts), "Feb 1");
    }

    #[test]
    fn task_cards_escape_the_title() {
        let task = sample_task("<script>alert(1)</script>");
        let users = Vec::new();
        let html = task_cards(&[&task], &users);
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
        // Dangling user reference renders the placeholder, not a panic.
        assert!(html.contains("Unknown User"));
    }

    #[test]
    fn page_marks_the_active_nav_link_and_theme() {
        let html = page("Tasks", "tasks", "light", None, "<p>body</p>");
        assert!(html.contains("<body class=\"light-mode\">"));
        assert!(html.contains("<a href=\"/tasks\" class=\"active\">Tasks</a>"));

        let dark = page("Tasks", "tasks", "dark", None, "");
        assert!(dark.contains("<body>"));
    }

    #[test]
    fn page_renders_the_toast_when_a_notice_is_present() {
        let notice = Notice::error("Failed to load <data>");
        let html = page("Dashboard", "dashboard", "dark", Some(&notice), "");
        assert!(html.contains("toast show error"));
        assert!(html.contains("Failed to load &lt;data&gt;"));
    }

    #[test]
    fn calendar_grid_always_fills_42_cells() {
        // February 2024: starts on a Thursday, 29 days.
        let month = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let html = calendar_grid(month, today);
        assert_eq!(html.matches("calendar-day").count(), 42);
        assert_eq!(html.matches("other-month").count(), 42 - 29);
        assert_eq!(html.matches("today").count(), 1);
    }

    #[test]
    fn priority_chart_scales_bars_to_the_largest_bucket() {
        let breakdown = PriorityBreakdown {
            high: 4,
            medium: 2,
            low: 0,
        };
        let html = priority_chart(&breakdown);
        assert!(html.contains("height: 100%"));
        assert!(html.contains("height: 50%"));
        assert!(html.contains("height: 0%"));
    }

    #[test]
    fn user_options_mark_the_selected_user() {
        let users = vec![
            User {
                id: 1,
                username: "ada".to_string(),
                email: "ada@example.com".to_string(),
                full_name: "Ada Lovelace".to_string(),
                created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
            },
        ];
        let html = user_options(&users, Some(1));
        assert!(html.contains("<option value=\"1\" selected>Ada Lovelace</option>"));
        let html = user_options(&users, None);
        assert!(!html.contains("selected"));
    }
}
