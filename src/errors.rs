use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML encode error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Task not found with id: {0}")]
    NoSuchTask(String),

    #[error("Invalid task ID: {0}")]
    InvalidTaskId(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("rate-limited; retry-after-ms: {retry_after_ms}")]
    RateLimited { retry_after_ms: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging error: {0}")]
    Logging(String),
}

impl TaskError {
    /// HTTP status the REST surface answers with for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::InvalidTaskId(_) => 400,
            Self::NoSuchTask(_) => 404,
            Self::RateLimited { .. } => 429,
            _ => 500,
        }
    }

    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_rest_surface() {
        assert_eq!(TaskError::Validation("x".into()).status_code(), 400);
        assert_eq!(TaskError::InvalidTaskId("x".into()).status_code(), 400);
        assert_eq!(TaskError::NoSuchTask("x".into()).status_code(), 404);
        assert_eq!(TaskError::RateLimited { retry_after_ms: 5 }.status_code(), 429);
        assert_eq!(TaskError::Config("x".into()).status_code(), 500);
    }

    #[test]
    fn rate_limited_message_carries_retry_hint() {
        let e = TaskError::RateLimited { retry_after_ms: 1500 };
        assert!(e.is_rate_limited());
        assert_eq!(e.to_string(), "rate-limited; retry-after-ms: 1500");
    }
}
