use crate::errors::TaskError;
use crate::filter::{FilterCriteria, compile};
use crate::store::TaskRepository;
use crate::task::{Task, TaskRequest};
use crate::telemetry::{self, Metrics};
use crate::types::TaskId;
use crate::validation::{validate_criteria, validate_request};
use std::sync::Arc;
use std::time::Instant;

/// Task use cases on top of a repository.
pub struct TaskService<R: TaskRepository> {
    repo: Arc<R>,
    metrics: Arc<Metrics>,
    auditor: Option<String>,
}

impl<R: TaskRepository> TaskService<R> {
    #[must_use]
    pub fn new(repo: Arc<R>, metrics: Arc<Metrics>) -> Self {
        Self { repo, metrics, auditor: Some(crate::config::DEFAULT_AUDITOR.to_string()) }
    }

    /// Name written into the audit fields; `None` leaves them empty.
    #[must_use]
    pub fn with_auditor(mut self, auditor: Option<String>) -> Self {
        self.auditor = auditor;
        self
    }

    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// # Errors
    /// Returns `TaskError::Validation` if the request is malformed.
    pub fn create(&self, request: TaskRequest) -> Result<Task, TaskError> {
        log::info!("Creating new task with title: {}", request.title);
        validate_request(&request)?;
        let task = Task::from_request(request, self.auditor.as_deref());
        self.repo.insert(task.clone());
        telemetry::log_audit(&self.metrics, "create", task.id.as_str(), self.auditor.as_deref());
        log::info!("Task created successfully with id: {}", task.id);
        Ok(task)
    }

    /// # Errors
    /// Returns `TaskError::NoSuchTask` if no task has this id.
    pub fn get(&self, id: &TaskId) -> Result<Task, TaskError> {
        log::debug!("Fetching task with id: {id}");
        self.repo.get(id).ok_or_else(|| TaskError::NoSuchTask(id.to_string()))
    }

    /// Lists tasks matching `criteria`.
    ///
    /// # Errors
    /// Returns `TaskError::Validation` for an inverted date range.
    pub fn list(&self, criteria: &FilterCriteria) -> Result<Vec<Task>, TaskError> {
        validate_criteria(criteria)?;
        let start = Instant::now();
        let query = compile(criteria);
        let tasks = self.repo.find(&query);
        telemetry::log_query(&self.metrics, &query.fingerprint(), tasks.len(), start.elapsed());
        Ok(tasks)
    }

    /// # Errors
    /// Returns `TaskError::Validation` for a malformed request or
    /// `TaskError::NoSuchTask` if no task has this id.
    pub fn update(&self, id: &TaskId, request: TaskRequest) -> Result<Task, TaskError> {
        log::info!("Updating task with id: {id}");
        validate_request(&request)?;
        let mut task = self.get(id)?;
        task.apply(request, self.auditor.as_deref());
        if !self.repo.replace(task.clone()) {
            // Deleted between read and write.
            return Err(TaskError::NoSuchTask(id.to_string()));
        }
        telemetry::log_audit(&self.metrics, "update", id.as_str(), self.auditor.as_deref());
        Ok(task)
    }

    /// # Errors
    /// Returns `TaskError::NoSuchTask` if no task has this id.
    pub fn delete(&self, id: &TaskId) -> Result<(), TaskError> {
        log::info!("Deleting task with id: {id}");
        if !self.repo.remove(id) {
            return Err(TaskError::NoSuchTask(id.to_string()));
        }
        telemetry::log_audit(&self.metrics, "delete", id.as_str(), self.auditor.as_deref());
        Ok(())
    }
}
