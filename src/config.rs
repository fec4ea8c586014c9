//! Runtime configuration.
//!
//! Precedence: defaults < TOML file < environment variables. The file is the
//! first existing one of: an explicit path, `TASKLITE_CONFIG`, `./tasklite.toml`,
//! `<config dir>/tasklite.toml`.

use crate::errors::TaskError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CAPACITY: u64 = 100;
pub const DEFAULT_WINDOW_SECS: u64 = 60;
pub const DEFAULT_AUDITOR: &str = "system";
const CONFIG_FILE_NAME: &str = "tasklite.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum tokens a bucket holds; also its starting level.
    pub capacity: u64,
    /// Tokens granted at each completed window.
    pub refill_tokens: u64,
    pub window_secs: u64,
    /// Bound on tracked client keys (LRU). `None` keeps every key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tracked_keys: Option<usize>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            refill_tokens: DEFAULT_CAPACITY,
            window_secs: DEFAULT_WINDOW_SECS,
            max_tracked_keys: None,
        }
    }
}

impl RateLimitConfig {
    #[must_use]
    pub const fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// # Errors
    /// Returns `TaskError::Config` when a bucket could never grant a request.
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.capacity == 0 {
            return Err(TaskError::Config("rate_limit.capacity must be at least 1".into()));
        }
        if self.refill_tokens == 0 {
            return Err(TaskError::Config("rate_limit.refill_tokens must be at least 1".into()));
        }
        if self.window_secs == 0 {
            return Err(TaskError::Config("rate_limit.window_secs must be at least 1".into()));
        }
        if self.max_tracked_keys == Some(0) {
            return Err(TaskError::Config("rate_limit.max_tracked_keys must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    pub level: String,
    pub retention: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { dir: None, level: "info".into(), retention: 7 }
    }
}

impl LoggingConfig {
    /// Applies the `TASKLITE_LOG_*` overrides only.
    ///
    /// # Errors
    /// Returns `TaskError::Config` if `TASKLITE_LOG_RETENTION` is not a number.
    pub fn apply_env<F>(&mut self, get: F) -> Result<(), TaskError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = get("TASKLITE_LOG_DIR") {
            self.dir = Some(PathBuf::from(v));
        }
        if let Some(v) = get("TASKLITE_LOG_LEVEL") {
            self.level = v;
        }
        if let Some(v) = get("TASKLITE_LOG_RETENTION") {
            self.retention = parse_num("TASKLITE_LOG_RETENTION", &v)?;
        }
        Ok(())
    }
}

fn parse_num<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, TaskError> {
    raw.trim().parse::<T>().map_err(|_| TaskError::Config(format!("{key}: not a number: {raw}")))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Name stamped into `createdBy`/`updatedBy`.
    pub auditor: String,
    /// JSON file of tasks the CLI loads into the in-memory store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_path: Option<PathBuf>,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            auditor: DEFAULT_AUDITOR.into(),
            data_path: None,
            rate_limit: RateLimitConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Resolves the configuration from file and environment.
    ///
    /// # Errors
    /// Returns an error if a config file exists but cannot be read or parsed,
    /// or if an environment override does not parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self, TaskError> {
        let mut cfg = match find_config_file(explicit) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        cfg.apply_env(|k| std::env::var(k).ok())?;
        cfg.rate_limit.validate()?;
        Ok(cfg)
    }

    /// # Errors
    /// Returns an error if the file cannot be read or is not valid TOML for this schema.
    pub fn from_file(path: &Path) -> Result<Self, TaskError> {
        let s = std::fs::read_to_string(path)?;
        let cfg: Self = toml::from_str(&s)?;
        log::debug!("loaded config from {}", path.display());
        Ok(cfg)
    }

    /// Applies `TASKLITE_*` overrides read through `get`.
    ///
    /// # Errors
    /// Returns `TaskError::Config` naming the variable that failed to parse.
    pub fn apply_env<F>(&mut self, get: F) -> Result<(), TaskError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = get("TASKLITE_RATE_CAPACITY") {
            self.rate_limit.capacity = parse_num("TASKLITE_RATE_CAPACITY", &v)?;
        }
        if let Some(v) = get("TASKLITE_RATE_REFILL") {
            self.rate_limit.refill_tokens = parse_num("TASKLITE_RATE_REFILL", &v)?;
        }
        if let Some(v) = get("TASKLITE_RATE_WINDOW_SECS") {
            self.rate_limit.window_secs = parse_num("TASKLITE_RATE_WINDOW_SECS", &v)?;
        }
        if let Some(v) = get("TASKLITE_RATE_MAX_KEYS") {
            self.rate_limit.max_tracked_keys = Some(parse_num("TASKLITE_RATE_MAX_KEYS", &v)?);
        }
        if let Some(v) = get("TASKLITE_AUDITOR") {
            self.auditor = v;
        }
        if let Some(v) = get("TASKLITE_DATA") {
            self.data_path = Some(PathBuf::from(v));
        }
        self.logging.apply_env(get)
    }

    /// # Errors
    /// Returns an error if the configuration cannot be encoded as TOML.
    pub fn to_toml(&self) -> Result<String, TaskError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn find_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    let mut paths: Vec<PathBuf> = vec![];
    if let Some(p) = explicit {
        paths.push(p.to_path_buf());
    }
    if let Ok(p) = std::env::var("TASKLITE_CONFIG") {
        paths.push(PathBuf::from(p));
    }
    if let Ok(cur) = std::env::current_dir() {
        paths.push(cur.join(CONFIG_FILE_NAME));
    }
    if let Some(dir) = dirs_next::config_dir() {
        paths.push(dir.join(CONFIG_FILE_NAME));
    }
    paths.into_iter().find(|p| p.is_file())
}
