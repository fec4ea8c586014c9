use chrono::NaiveDate;
use std::sync::Arc;
use tasklite::errors::TaskError;
use tasklite::filter::FilterCriteria;
use tasklite::service::TaskService;
use tasklite::store::{MemoryTaskStore, TaskRepository};
use tasklite::task::TaskRequest;
use tasklite::telemetry::Metrics;
use tasklite::types::TaskStatus;

fn service() -> TaskService<MemoryTaskStore> {
    TaskService::new(Arc::new(MemoryTaskStore::new()), Arc::new(Metrics::new()))
        .with_auditor(Some("alice".into()))
}

#[test]
fn create_get_update_delete() {
    let svc = service();
    let due = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let created = svc
        .create(TaskRequest::new("Write docs", TaskStatus::Todo, 2).description("api guide").due_date(due))
        .unwrap();
    assert_eq!(created.audit.created_by.as_deref(), Some("alice"));
    assert_eq!(svc.get(&created.id).unwrap().title, "Write docs");

    let updated = svc.update(&created.id, TaskRequest::new("Write more docs", TaskStatus::InProgress, 4)).unwrap();
    assert_eq!(updated.title, "Write more docs");
    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(updated.priority, 4);
    // Omitted optional fields keep their stored values.
    assert_eq!(updated.description.as_deref(), Some("api guide"));
    assert_eq!(updated.due_date, Some(due));
    assert_eq!(updated.audit.created_at, created.audit.created_at);
    assert!(updated.audit.updated_at >= created.audit.updated_at);

    svc.delete(&created.id).unwrap();
    assert!(matches!(svc.get(&created.id), Err(TaskError::NoSuchTask(_))));
    assert!(svc.repository().is_empty());
}

#[test]
fn list_filters_and_sorts() {
    let svc = service();
    for (title, prio) in [("low", 1), ("high", 5), ("mid", 3)] {
        svc.create(TaskRequest::new(title, TaskStatus::Todo, prio)).unwrap();
    }
    svc.create(TaskRequest::new("finished", TaskStatus::Done, 5)).unwrap();

    let todo = svc
        .list(&FilterCriteria::new().status(TaskStatus::Todo).sort_by("priority").sort_direction("desc"))
        .unwrap();
    let titles: Vec<&str> = todo.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["high", "mid", "low"]);
}

#[test]
fn list_rejects_inverted_range() {
    let svc = service();
    let from = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let to = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let err = svc.list(&FilterCriteria::new().due_from(from).due_to(to)).unwrap_err();
    assert!(matches!(err, TaskError::Validation(_)));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn out_of_range_list_priority_returns_empty() {
    let svc = service();
    svc.create(TaskRequest::new("only", TaskStatus::Todo, 3)).unwrap();
    assert!(svc.list(&FilterCriteria::new().priority(9)).unwrap().is_empty());
}

#[test]
fn update_validates_before_lookup() {
    let svc = service();
    let t = svc.create(TaskRequest::new("keep", TaskStatus::Todo, 3)).unwrap();
    let err = svc.update(&t.id, TaskRequest::new("", TaskStatus::Todo, 3)).unwrap_err();
    assert!(matches!(err, TaskError::Validation(_)));
    assert_eq!(svc.get(&t.id).unwrap().title, "keep");
}
