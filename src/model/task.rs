use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single to-do item, the wire shape of one row in the store's `todos`
/// table. `id` and `created_at` are assigned by the store and immutable;
/// `is_completed` is the only field ever changed after creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Task {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub is_completed: bool,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// Task priority, lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Priority {
    /// Display weight used by the view sort: high sorts before medium,
    /// medium before low.
    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Priority::Low => Priority::High,
            Priority::Medium => Priority::Low,
            Priority::High => Priority::Medium,
        }
    }
}

/// Payload for the store's create operation. The store assigns `id` and
/// `created_at`. An absent description is serialized as an explicit null.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewTask {
    pub title: String,
    pub priority: Priority,
    pub is_completed: bool,
    pub description: Option<String>,
}

impl NewTask {
    pub fn new(title: String, priority: Priority, description: Option<String>) -> Self {
        Self {
            title,
            priority,
            is_completed: false,
            description,
        }
    }
}

/// Partial update for the store's update operation. Unset fields are left
/// out of the body entirely; only completion is ever patched today.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl TaskUpdate {
    pub fn completion(is_completed: bool) -> Self {
        Self {
            is_completed: Some(is_completed),
        }
    }
}
