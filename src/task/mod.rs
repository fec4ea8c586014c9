pub mod core;
pub mod types;

pub use self::core::{DATE_FORMAT, Task, fields, format_date};
pub use self::types::{AuditInfo, TaskRequest};
