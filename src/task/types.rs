use crate::types::TaskStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Audit trail stamped by the service on every write.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuditInfo {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

impl AuditInfo {
    #[must_use]
    pub fn new(actor: Option<&str>) -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            created_by: actor.map(str::to_string),
            updated_by: actor.map(str::to_string),
        }
    }

    pub fn touch(&mut self, actor: Option<&str>) {
        self.updated_at = Utc::now();
        self.updated_by = actor.map(str::to_string);
    }
}

/// Payload for creating or replacing a task.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: i32,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl TaskRequest {
    #[must_use]
    pub fn new(title: impl Into<String>, status: TaskStatus, priority: i32) -> Self {
        Self { title: title.into(), description: None, status, priority, due_date: None }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }
}
