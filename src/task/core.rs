use crate::task::types::{AuditInfo, TaskRequest};
use crate::types::{TaskId, TaskStatus};
use bson::{Bson, Document as BsonDocument};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Date layout used for stored due dates; lexicographic order is chronological.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub mod fields {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const STATUS: &str = "status";
    pub const PRIORITY: &str = "priority";
    pub const DUE_DATE: &str = "dueDate";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub audit: AuditInfo,
}

impl Task {
    #[must_use]
    pub fn from_request(request: TaskRequest, actor: Option<&str>) -> Self {
        Self {
            id: TaskId::new(),
            title: request.title,
            description: request.description,
            status: request.status,
            priority: request.priority,
            due_date: request.due_date,
            audit: AuditInfo::new(actor),
        }
    }

    /// Applies a request onto an existing task. Absent optional fields keep their stored value.
    pub fn apply(&mut self, request: TaskRequest, actor: Option<&str>) {
        self.title = request.title;
        if let Some(d) = request.description {
            self.description = Some(d);
        }
        self.status = request.status;
        self.priority = request.priority;
        if let Some(due) = request.due_date {
            self.due_date = Some(due);
        }
        self.audit.touch(actor);
    }

    /// The BSON view queries are evaluated against. Absent optionals are omitted.
    #[must_use]
    pub fn to_document(&self) -> BsonDocument {
        let mut d = BsonDocument::new();
        d.insert(fields::ID, self.id.as_str());
        d.insert(fields::TITLE, self.title.as_str());
        d.insert(fields::STATUS, self.status.as_str());
        d.insert(fields::PRIORITY, self.priority);
        d.insert(fields::CREATED_AT, Bson::String(timestamp(&self.audit.created_at)));
        d.insert(fields::UPDATED_AT, Bson::String(timestamp(&self.audit.updated_at)));
        if let Some(desc) = &self.description {
            d.insert(fields::DESCRIPTION, desc.as_str());
        }
        if let Some(due) = self.due_date {
            d.insert(fields::DUE_DATE, format_date(due));
        }
        d
    }
}

// Fixed-width so audit timestamps sort as strings.
fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_omits_absent_optionals() {
        let t = Task::from_request(TaskRequest::new("Write docs", TaskStatus::Todo, 2), Some("system"));
        let d = t.to_document();
        assert_eq!(d.get_str(fields::STATUS).unwrap(), "TODO");
        assert_eq!(d.get_i32(fields::PRIORITY).unwrap(), 2);
        assert!(d.get(fields::DESCRIPTION).is_none());
        assert!(d.get(fields::DUE_DATE).is_none());
    }

    #[test]
    fn due_date_is_stored_as_iso_string() {
        let due = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let t = Task::from_request(TaskRequest::new("x", TaskStatus::Done, 1).due_date(due), None);
        assert_eq!(t.to_document().get_str(fields::DUE_DATE).unwrap(), "2024-01-05");
    }

    #[test]
    fn apply_keeps_omitted_optionals_and_stamps_actor() {
        let due = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut t = Task::from_request(
            TaskRequest::new("a", TaskStatus::Todo, 1).description("keep me").due_date(due),
            Some("alice"),
        );
        t.apply(TaskRequest::new("b", TaskStatus::Done, 5), Some("bob"));
        assert_eq!(t.title, "b");
        assert_eq!(t.description.as_deref(), Some("keep me"));
        assert_eq!(t.due_date, Some(due));
        assert_eq!(t.audit.created_by.as_deref(), Some("alice"));
        assert_eq!(t.audit.updated_by.as_deref(), Some("bob"));
    }

    #[test]
    fn json_uses_camel_case_and_flattened_audit() {
        let t = Task::from_request(TaskRequest::new("x", TaskStatus::InProgress, 3), Some("system"));
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["status"], "IN_PROGRESS");
        assert_eq!(v["createdBy"], "system");
        assert!(v.get("dueDate").is_none());
    }
}
