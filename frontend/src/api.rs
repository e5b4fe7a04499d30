// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::fmt;

use common::{
    CreateTaskPayload, CreateUserPayload, Task, UpdateTaskPayload, UpdateUserPayload, User,
};
use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

/// Body used when a request carries none; keeps `request` generic without
/// a second entry point.
const NO_BODY: Option<&()> = None;

/// Shape of the error body the upstream attaches to non-2xx responses.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// Failure shape shared by every outbound call.
///
/// Callers treat both variants uniformly: surface a transient notice and
/// keep the page interactive. The split only matters for logging and for
/// picking the message shown to the user.
#[derive(Debug)]
pub enum RequestError {
    /// Transport-level failure: unreachable upstream, broken connection,
    /// or an undecodable response body.
    Network(reqwest::Error),
    /// The upstream answered with a non-success status.
    Api { status: u16, message: String },
}

impl RequestError {
    /// Short message suitable for a user-facing notice. Upstream error
    /// messages pass through; transport details stay in the log.
    pub fn message(&self) -> String {
        match self {
            RequestError::Network(_) => "network error".to_string(),
            RequestError::Api { message, .. } => message.clone(),
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Network(err) => write!(f, "network failure: {err}"),
            RequestError::Api { status, message } => write!(f, "HTTP {status}: {message}"),
        }
    }
}

impl std::error::Error for RequestError {}

/// Client for the upstream task/user REST API.
///
/// All outbound traffic funnels through [`ApiClient::request`] so every
/// caller sees the same failure shape; there is no endpoint-specific
/// recovery and nothing is retried.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the API rooted at `base_url`
    /// (e.g. `http://127.0.0.1:5000/api`). A trailing slash is trimmed so
    /// endpoint paths can always start with one.
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Issues one request against the upstream and decodes the JSON
    /// response. Non-2xx responses become [`RequestError::Api`] carrying
    /// the upstream's `{"error": ...}` message when one is present.
    async fn request<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("API request: {} {}", method, url);

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(RequestError::Network)?;
        let status = response.status();

        if !status.is_success() {
            let message = match response.json::<ApiErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => format!("HTTP {}", status.as_u16()),
            };
            error!("API error on {}: {} (status {})", url, message, status);
            return Err(RequestError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<T>().await.map_err(RequestError::Network)
    }

    /// Retrieves all users.
    pub async fn list_users(&self) -> Result<Vec<User>, RequestError> {
        self.request(Method::GET, "/users", NO_BODY).await
    }

    /// Creates a new user and returns the stored entity.
    pub async fn create_user(&self, payload: &CreateUserPayload) -> Result<User, RequestError> {
        self.request(Method::POST, "/users", Some(payload)).await
    }

    /// Applies a partial update to a user.
    pub async fn update_user(
        &self,
        user_id: i64,
        payload: &UpdateUserPayload,
    ) -> Result<User, RequestError> {
        self.request(Method::PUT, &format!("/users/{user_id}"), Some(payload))
            .await
    }

    /// Deletes a user (the upstream cascades to their tasks).
    pub async fn delete_user(&self, user_id: i64) -> Result<(), RequestError> {
        let _: serde_json::Value = self
            .request(Method::DELETE, &format!("/users/{user_id}"), NO_BODY)
            .await?;
        Ok(())
    }

    /// Retrieves all tasks, optionally scoped to one owning user.
    pub async fn list_tasks(&self, user_id: Option<i64>) -> Result<Vec<Task>, RequestError> {
        self.request(Method::GET, &tasks_endpoint(user_id), NO_BODY)
            .await
    }

    /// Retrieves a single task by ID.
    pub async fn get_task(&self, task_id: i64) -> Result<Task, RequestError> {
        self.request(Method::GET, &format!("/tasks/{task_id}"), NO_BODY)
            .await
    }

    /// Creates a new task and returns the stored entity.
    pub async fn create_task(&self, payload: &CreateTaskPayload) -> Result<Task, RequestError> {
        self.request(Method::POST, "/tasks", Some(payload)).await
    }

    /// Applies a partial update to a task (edit or completion toggle).
    pub async fn update_task(
        &self,
        task_id: i64,
        payload: &UpdateTaskPayload,
    ) -> Result<Task, RequestError> {
        self.request(Method::PUT, &format!("/tasks/{task_id}"), Some(payload))
            .await
    }

    /// Deletes a task.
    pub async fn delete_task(&self, task_id: i64) -> Result<(), RequestError> {
        let _: serde_json::Value = self
            .request(Method::DELETE, &format!("/tasks/{task_id}"), NO_BODY)
            .await?;
        Ok(())
    }

    /// Probes the upstream health endpoint.
    pub async fn health(&self) -> Result<(), RequestError> {
        let _: serde_json::Value = self.request(Method::GET, "/health", NO_BODY).await?;
        Ok(())
    }
}

/// Builds the task listing endpoint, optionally scoped to one user.
fn tasks_endpoint(user_id: Option<i64>) -> String {
    match user_id {
        Some(id) => format!("/tasks?user_id={id}"),
        None => "/tasks".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_endpoint_includes_user_filter_only_when_set() {
        assert_eq!(tasks_endpoint(None), "/tasks");
        assert_eq!(tasks_endpoint(Some(7)), "/tasks?user_id=7");
    }

    #[test]
    fn api_error_keeps_upstream_message_for_notices() {
        let err = RequestError::Api {
            status: 409,
            message: "Username or email already exists".to_string(),
        };
        assert_eq!(err.message(), "Username or email already exists");
        assert_eq!(
            err.to_string(),
            "HTTP 409: Username or email already exists"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://127.0.0.1:5000/api/");
        assert_eq!(client.base_url, "http://127.0.0.1:5000/api");
    }
}
