// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Task priority as exposed by the upstream API.
///
/// Serialized lowercase (`"high"`, `"medium"`, `"low"`) to match the wire
/// format; the lowercase form doubles as the CSS class suffix on badges.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Lowercase wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Parses the lowercase wire form. Anything else is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

/// Represents a user account in the upstream service.
///
/// Derivation attributes (derive):
/// - `Serialize`, `Deserialize`: Allows conversion to/from JSON.
/// - `Debug`: Enables displaying the structure for debugging.
/// - `Clone`: Allows creating copies of the object.
///
/// Timestamps are naive UTC because the upstream emits ISO-8601 strings
/// without an offset. Fields the upstream adds beyond these are ignored
/// on deserialization.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub created_at: NaiveDateTime,
}

/// Represents a task owned by a user.
///
/// `user_id` is a foreign reference, not ownership in the Rust sense;
/// many tasks point at the same user.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub completed: bool,
    pub due_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

/// Structure used to send user creation data to the API.
/// It's a good practice to separate API entities (`User`) from mutation
/// payloads, as they carry different fields.
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateUserPayload {
    pub username: String,
    pub email: String,
    pub full_name: String,
}

/// Partial user update. Absent fields are omitted from the JSON body so
/// the upstream leaves them untouched.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct UpdateUserPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Structure used to send task creation data to the API.
/// The due date is optional; the upstream stores `null` when absent.
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateTaskPayload {
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<NaiveDateTime>,
}

/// Partial task update, used both for edits and for the completion
/// toggle. Absent fields are omitted from the JSON body.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct UpdateTaskPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_round_trips_through_lowercase() {
        for (priority, text) in [
            (Priority::High, "high"),
            (Priority::Medium, "medium"),
            (Priority::Low, "low"),
        ] {
            assert_eq!(priority.as_str(), text);
            assert_eq!(Priority::parse(text), Some(priority));
        }
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn update_task_payload_omits_absent_fields() {
        let payload = UpdateTaskPayload {
            completed: Some(true),
            ..Default::default()
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"completed":true}"#);
    }

    #[test]
    fn task_accepts_offsetless_timestamps_and_extra_fields() {
        // The upstream serializes naive UTC timestamps and carries columns
        // this client does not model; both must deserialize cleanly.
        let json = r#"{
            "id": 1,
            "user_id": 2,
            "title": "Write report",
            "description": null,
            "priority": "high",
            "completed": false,
            "status": "pending",
            "due_date": "2024-02-01T09:30:00",
            "created_at": "2024-01-15T08:00:00.123456"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.priority, Priority::High);
        assert!(task.due_date.is_some());
        assert!(task.description.is_none());
    }
}
