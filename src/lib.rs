pub mod api;
pub mod config;
pub mod errors;
pub mod filter;
pub mod logger;
pub mod query;
pub mod ratelimit;
pub mod service;
pub mod store;
pub mod task;
pub mod telemetry;
pub mod types;
pub mod validation;

pub use crate::api::TaskApi;
pub use crate::config::{AppConfig, RateLimitConfig};
pub use crate::errors::TaskError;
pub use crate::filter::{CompiledQuery, FilterCriteria, compile};
pub use crate::ratelimit::{AdmissionGate, BucketRegistry, TokenBucket};
pub use crate::service::TaskService;
pub use crate::store::{MemoryTaskStore, TaskRepository};
pub use crate::task::{Task, TaskRequest};
pub use crate::types::{TaskId, TaskStatus};
