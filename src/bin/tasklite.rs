use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tasklite::config::AppConfig;
use tasklite::errors::TaskError;
use tasklite::filter::{DEFAULT_SORT_DIRECTION, DEFAULT_SORT_FIELD, FilterCriteria, compile};
use tasklite::ratelimit::{AdmissionGate, BucketRegistry};
use tasklite::store::MemoryTaskStore;
use tasklite::telemetry::Metrics;
use tasklite::types::TaskStatus;
use tasklite::{TaskApi, logger};

#[derive(Parser, Debug)]
#[command(name = "tasklite", version, about = "Task filtering and rate-limit tool", long_about = None)]
struct Cli {
    #[arg(long, global = true, help = "Path to a config file (TOML). If omitted, the usual locations are searched.")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Console log level (trace|debug|info|warn|error|off)")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "List tasks from a JSON data file matching the filter; prints JSON")]
    List {
        #[arg(long, help = "JSON array of tasks; falls back to data_path from config")]
        data: Option<PathBuf>,
        #[arg(long, default_value = "cli", help = "Client key charged against the rate limit")]
        client: String,
        #[command(flatten)]
        filter: FilterArgs,
    },
    #[command(about = "Compile a filter and print the resulting query as JSON")]
    Explain {
        #[command(flatten)]
        filter: FilterArgs,
    },
    #[command(about = "Print the effective configuration as TOML")]
    Config,
    #[command(about = "Replay requests for one client through the admission gate")]
    Simulate {
        #[arg(long, default_value = "client", help = "Client key")]
        key: String,
        #[arg(long, default_value_t = 150, help = "Number of requests")]
        requests: u64,
        #[arg(long, default_value_t = 0, help = "Simulated milliseconds between requests")]
        interval_ms: u64,
    },
}

#[derive(Args, Debug)]
struct FilterArgs {
    #[arg(long, help = "TODO|IN_PROGRESS|DONE")]
    status: Option<String>,
    #[arg(long)]
    priority: Option<i32>,
    #[arg(long, help = "Inclusive lower due date (YYYY-MM-DD)")]
    due_from: Option<NaiveDate>,
    #[arg(long, help = "Inclusive upper due date (YYYY-MM-DD)")]
    due_to: Option<NaiveDate>,
    #[arg(long, help = "Case-insensitive text matched against title and description")]
    search: Option<String>,
    #[arg(long, default_value = DEFAULT_SORT_FIELD, help = "Field to sort by; pass an empty value for insertion order")]
    sort_by: Option<String>,
    #[arg(long, default_value = DEFAULT_SORT_DIRECTION, help = "ASC|DESC; anything else sorts ascending")]
    sort_direction: Option<String>,
}

impl FilterArgs {
    fn criteria(self) -> Result<FilterCriteria, TaskError> {
        Ok(FilterCriteria {
            status: self.status.as_deref().map(str::parse::<TaskStatus>).transpose()?,
            priority: self.priority,
            due_from: self.due_from,
            due_to: self.due_to,
            search: self.search,
            sort_by: self.sort_by,
            sort_direction: self.sort_direction,
        })
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Tally {
    sent: u64,
    allowed: u64,
    denied: u64,
}

/// Replays `requests` admissions for `key`, `step` apart starting at `t0`.
/// Stops early once the simulated clock would overflow `Instant`.
fn simulate(gate: &AdmissionGate, key: &str, requests: u64, step: Duration, t0: Instant) -> Tally {
    let mut tally = Tally::default();
    let mut now = t0;
    for i in 0..requests {
        if i > 0 {
            match now.checked_add(step) {
                Some(next) => now = next,
                None => {
                    log::warn!("simulated clock overflowed after {i} requests; stopping");
                    break;
                }
            }
        }
        tally.sent += 1;
        if gate.admit(key, now) {
            tally.allowed += 1;
        } else {
            tally.denied += 1;
        }
    }
    tally
}

fn run(cli: Cli) -> Result<(), TaskError> {
    let cfg = AppConfig::load(cli.config.as_deref())?;
    let mut logging = cfg.logging.clone();
    if let Some(level) = cli.log_level {
        logging.level = level;
    }
    logger::init(&logging)?;

    match cli.command {
        Commands::List { data, client, filter } => {
            let path = data
                .or_else(|| cfg.data_path.clone())
                .ok_or_else(|| TaskError::Config("no data file: pass --data or set data_path".into()))?;
            let store = Arc::new(MemoryTaskStore::load_json(&path)?);
            let api = TaskApi::from_config(&cfg, store);
            let tasks = api.list(&client, &filter.criteria()?)?;
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        Commands::Explain { filter } => {
            let query = compile(&filter.criteria()?);
            println!("{}", serde_json::to_string_pretty(&query)?);
        }
        Commands::Config => {
            print!("{}", cfg.to_toml()?);
        }
        Commands::Simulate { key, requests, interval_ms } => {
            let metrics = Arc::new(Metrics::new());
            let gate = AdmissionGate::new(Arc::new(BucketRegistry::new(cfg.rate_limit.clone())), metrics);
            let tally = simulate(&gate, &key, requests, Duration::from_millis(interval_ms), Instant::now());
            let out = serde_json::json!({
                "key": key,
                "requests": tally.sent,
                "allowed": tally.allowed,
                "denied": tally.denied,
            });
            println!("{out}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(if e.is_rate_limited() { 2 } else { 1 })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> AdmissionGate {
        AdmissionGate::new(Arc::new(BucketRegistry::default()), Arc::new(Metrics::new()))
    }

    #[test]
    fn list_defaults_to_due_date_ascending() {
        let cli = Cli::try_parse_from(["tasklite", "list", "--data", "tasks.json"]).unwrap();
        let Commands::List { filter, .. } = cli.command else { panic!("expected list") };
        let criteria = filter.criteria().unwrap();
        assert_eq!(criteria.sort_field(), Some(DEFAULT_SORT_FIELD));
        let sort = compile(&criteria).sort.unwrap();
        assert_eq!(sort.field, "dueDate");
        assert_eq!(sort.direction, tasklite::filter::SortDirection::Asc);
    }

    #[test]
    fn empty_sort_by_keeps_insertion_order() {
        let cli = Cli::try_parse_from(["tasklite", "explain", "--sort-by", ""]).unwrap();
        let Commands::Explain { filter } = cli.command else { panic!("expected explain") };
        assert!(compile(&filter.criteria().unwrap()).sort.is_none());
    }

    #[test]
    fn simulate_counts_one_window() {
        let tally = simulate(&gate(), "k", 150, Duration::ZERO, Instant::now());
        assert_eq!(tally, Tally { sent: 150, allowed: 100, denied: 50 });
    }

    #[test]
    fn simulate_stops_when_clock_overflows() {
        let tally = simulate(&gate(), "k", 2000, Duration::from_millis(u64::MAX), Instant::now());
        assert!(tally.sent >= 1 && tally.sent < 2000);
        assert_eq!(tally.allowed, tally.sent);
    }
}
