//! log4rs wiring for the `log` facade.
//!
//! Audit lines (target `tasklite::audit`) and rate-limit decisions (target
//! `tasklite::ratelimit`) go to their own rolling files; everything else lands
//! in `app.log`. Installing a logger twice is not an error: the first one wins.

use crate::config::LoggingConfig;
use crate::errors::TaskError;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::{
    CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
};
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::{Path, PathBuf};

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";
const ROLL_SIZE_BYTES: u64 = 10 * 1024 * 1024;

#[must_use]
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn rolling(base: &Path, stem: &str, keep: u32) -> Result<RollingFileAppender, TaskError> {
    let roller = FixedWindowRoller::builder()
        .build(&format!("{}", base.join(format!("{stem}.{{}}.log")).display()), keep)
        .map_err(|e| TaskError::Logging(e.to_string()))?;
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(ROLL_SIZE_BYTES)), Box::new(roller));
    RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(base.join(format!("{stem}.log")), Box::new(policy))
        .map_err(|e| TaskError::Logging(e.to_string()))
}

/// Builds the file-based configuration without installing it.
///
/// # Errors
/// Returns an error if the directory cannot be created or an appender fails to open.
pub fn build_file_config(dir: &Path, level: LevelFilter, retention: u32) -> Result<Config, TaskError> {
    std::fs::create_dir_all(dir)?;
    let keep = retention.max(1);
    Config::builder()
        .appender(Appender::builder().build("app", Box::new(rolling(dir, "app", keep)?)))
        .appender(Appender::builder().build("audit", Box::new(rolling(dir, "audit", keep)?)))
        .appender(Appender::builder().build("ratelimit", Box::new(rolling(dir, "ratelimit", keep)?)))
        .logger(Logger::builder().appender("audit").additive(false).build("tasklite::audit", level))
        .logger(
            Logger::builder().appender("ratelimit").additive(false).build("tasklite::ratelimit", level),
        )
        .build(Root::builder().appender("app").build(level))
        .map_err(|e| TaskError::Logging(e.to_string()))
}

/// Configure file logging globally for the process.
/// - dir: base directory for logs; if None, current directory.
/// - level: off|error|warn|info|debug|trace
/// - retention: number of rolled files to keep
///
/// # Errors
/// Returns an error if the log directory or files cannot be set up.
pub fn configure_logging(dir: Option<&Path>, level: &str, retention: u32) -> Result<(), TaskError> {
    let base = dir
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    let config = build_file_config(&base, parse_level(level), retention)?;
    if log4rs::init_config(config).is_err() {
        log::debug!("logger already installed; keeping existing configuration");
    }
    Ok(())
}

/// Installs logging described by a [`LoggingConfig`]: files when a directory is set,
/// stderr otherwise.
///
/// # Errors
/// Returns an error if file logging was requested and cannot be set up.
pub fn init(cfg: &LoggingConfig) -> Result<(), TaskError> {
    match cfg.dir.as_deref() {
        Some(dir) => configure_logging(Some(dir), &cfg.level, cfg.retention),
        None => init_console(&cfg.level),
    }
}

/// Console-only logging, used by the CLI.
///
/// # Errors
/// Returns an error if the log4rs configuration is rejected.
pub fn init_console(level: &str) -> Result<(), TaskError> {
    let stderr = ConsoleAppender::builder()
        .target(log4rs::append::console::Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("[{l}] {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(parse_level(level)))
        .map_err(|e| TaskError::Logging(e.to_string()))?;
    if log4rs::init_config(config).is_err() {
        log::debug!("logger already installed; keeping existing configuration");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_parse_with_info_fallback() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level("warn"), LevelFilter::Warn);
        assert_eq!(parse_level("chatty"), LevelFilter::Info);
    }

    #[test]
    fn file_config_creates_log_files() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        build_file_config(&logs, LevelFilter::Info, 3).unwrap();
        assert!(logs.join("app.log").exists());
        assert!(logs.join("audit.log").exists());
        assert!(logs.join("ratelimit.log").exists());
    }
}
