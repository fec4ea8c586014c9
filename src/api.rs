//! Request facade: every call is admitted by the gate before any handler runs.

use crate::config::AppConfig;
use crate::errors::TaskError;
use crate::filter::FilterCriteria;
use crate::ratelimit::{AdmissionGate, BucketRegistry};
use crate::service::TaskService;
use crate::store::TaskRepository;
use crate::task::{Task, TaskRequest};
use crate::telemetry::Metrics;
use crate::types::TaskId;
use std::sync::Arc;
use std::time::Instant;

pub struct TaskApi<R: TaskRepository> {
    gate: AdmissionGate,
    service: TaskService<R>,
    metrics: Arc<Metrics>,
}

impl<R: TaskRepository> TaskApi<R> {
    #[must_use]
    pub const fn new(gate: AdmissionGate, service: TaskService<R>, metrics: Arc<Metrics>) -> Self {
        Self { gate, service, metrics }
    }

    /// Wires a registry, gate and service from configuration around `repo`.
    #[must_use]
    pub fn from_config(cfg: &AppConfig, repo: Arc<R>) -> Self {
        let metrics = Arc::new(Metrics::new());
        let registry = Arc::new(BucketRegistry::new(cfg.rate_limit.clone()));
        let gate = AdmissionGate::new(registry, Arc::clone(&metrics));
        let service = TaskService::new(repo, Arc::clone(&metrics)).with_auditor(Some(cfg.auditor.clone()));
        Self::new(gate, service, metrics)
    }

    fn admit(&self, client: &str) -> Result<(), TaskError> {
        self.gate.check(client, Instant::now())
    }

    /// # Errors
    /// `RateLimited` when the client is over its allowance, otherwise as [`TaskService::create`].
    pub fn create(&self, client: &str, request: TaskRequest) -> Result<Task, TaskError> {
        self.admit(client)?;
        self.service.create(request)
    }

    /// # Errors
    /// `RateLimited`, `InvalidTaskId`, or as [`TaskService::get`].
    pub fn get(&self, client: &str, id: &str) -> Result<Task, TaskError> {
        self.admit(client)?;
        self.service.get(&id.parse::<TaskId>()?)
    }

    /// # Errors
    /// `RateLimited`, or as [`TaskService::list`].
    pub fn list(&self, client: &str, criteria: &FilterCriteria) -> Result<Vec<Task>, TaskError> {
        self.admit(client)?;
        self.service.list(criteria)
    }

    /// # Errors
    /// `RateLimited`, `InvalidTaskId`, or as [`TaskService::update`].
    pub fn update(&self, client: &str, id: &str, request: TaskRequest) -> Result<Task, TaskError> {
        self.admit(client)?;
        self.service.update(&id.parse::<TaskId>()?, request)
    }

    /// # Errors
    /// `RateLimited`, `InvalidTaskId`, or as [`TaskService::delete`].
    pub fn delete(&self, client: &str, id: &str) -> Result<(), TaskError> {
        self.admit(client)?;
        self.service.delete(&id.parse::<TaskId>()?)
    }

    #[must_use]
    pub const fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    #[must_use]
    pub const fn service(&self) -> &TaskService<R> {
        &self.service
    }

    #[must_use]
    pub fn metrics_text(&self) -> String {
        let registry = self.gate.registry();
        self.metrics.metrics_text(registry.len(), registry.buckets_created())
    }
}
