// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::handlers::{self, AppState};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Creates and configures the application router: one GET per page, one
/// POST per form action.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/users", get(handlers::users_page))
        .route("/users/create", post(handlers::create_user))
        .route("/users/{id}/update", post(handlers::update_user))
        .route("/users/{id}/delete", post(handlers::delete_user))
        .route("/tasks", get(handlers::tasks_page))
        .route("/tasks/create", post(handlers::create_task))
        .route("/tasks/{id}/toggle", post(handlers::toggle_task))
        .route("/tasks/{id}/update", post(handlers::update_task))
        .route("/tasks/{id}/delete", post(handlers::delete_task))
        .route("/calendar", get(handlers::calendar_page))
        .route("/analytics", get(handlers::analytics_page))
        .route("/notifications", get(handlers::notifications_page))
        .route(
            "/notifications/read-all",
            post(handlers::mark_all_notifications_read),
        )
        .route("/notifications/clear", post(handlers::clear_notifications))
        .route(
            "/notifications/{id}/read",
            post(handlers::mark_notification_read),
        )
        .route(
            "/notifications/{id}/delete",
            post(handlers::delete_notification),
        )
        .route("/profile", get(handlers::profile_page))
        .route("/profile/update", post(handlers::update_profile))
        .route("/profile/password", post(handlers::change_password))
        .route("/reports", get(handlers::reports_page))
        .route("/reports/generate", post(handlers::generate_report))
        .route("/settings", get(handlers::settings_page))
        .route("/settings/update", post(handlers::update_settings))
        .route("/settings/export", get(handlers::export_data))
        .route("/settings/clear-cache", post(handlers::clear_cache))
        .route("/settings/reset", post(handlers::reset_settings))
        // Request span logging for every page and action
        .layer(TraceLayer::new_for_http())
        // Adds the shared state to the application
        .with_state(state)
}
