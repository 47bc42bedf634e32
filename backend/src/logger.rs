use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use tracing_subscriber::EnvFilter;

use crate::get_create_semdict_log_dir;

/// Number of rotated `log.<timestamp>.txt` files kept next to `log.txt`.
const ROTATED_LOGS_KEPT: usize = 5;

/// Log levels in increasing verbosity. A level enables itself and every level
/// below it. `Info` is the default, `LOG_LEVEL` overrides it at startup and
/// `set_log_level()` at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Silent = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "silent" | "off" => Ok(Level::Silent),
            "error" => Ok(Level::Error),
            "warn" | "warning" => Ok(Level::Warn),
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            other => Err(format!("Unknown log level: {}", other)),
        }
    }
}

impl Level {
    fn tag(&self) -> &'static str {
        match self {
            Level::Silent => "",
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn is_rotated_log(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with("log.") && n.ends_with(".txt") && n != "log.txt")
        .unwrap_or(false)
}

/// Moves an existing `log.txt` aside as `log.<mtime>.txt` and deletes the
/// oldest rotated files beyond `ROTATED_LOGS_KEPT`.
fn rotate_log_files(log_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !log_file.try_exists().unwrap_or(false) {
        return Ok(());
    }

    let log_dir = log_file.parent().ok_or("Log file has no parent directory")?;

    let modified: DateTime<Local> = fs::metadata(log_file)?.modified()?.into();
    let rotated = log_dir.join(format!("log.{}.txt", modified.format("%Y-%m-%dT%H-%M-%S")));
    fs::rename(log_file, &rotated)?;

    let mut old_logs: Vec<PathBuf> = fs::read_dir(log_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_rotated_log(path))
        .collect();

    // The timestamp format sorts chronologically
    old_logs.sort();

    let excess = old_logs.len().saturating_sub(ROTATED_LOGS_KEPT);
    for path in old_logs.iter().take(excess) {
        if let Err(e) = fs::remove_file(path) {
            eprintln!("Failed to remove old log file {:?}: {}", path, e);
        }
    }

    Ok(())
}

pub struct Logger {
    /// None when writing to the log file is disabled.
    log_file: Option<PathBuf>,
    print_log: bool,
    level: Mutex<Level>,
}

impl Logger {
    /// Reads `DISABLE_LOG`, `ENABLE_PRINT_LOG` and `LOG_LEVEL` from the
    /// environment and rotates the previous log file.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let level = std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|v| v.parse::<Level>().ok())
            .unwrap_or(Level::Info);

        let log_file = if env_flag("DISABLE_LOG") {
            None
        } else {
            let log_dir = get_create_semdict_log_dir()
                .map_err(|e| format!("Failed to get log dir: {}", e))?;
            let log_file = log_dir.join("log.txt");

            if let Err(e) = rotate_log_files(&log_file) {
                eprintln!("Failed to rotate log files: {}", e);
            }
            Some(log_file)
        };

        Ok(Logger {
            log_file,
            print_log: env_flag("ENABLE_PRINT_LOG"),
            level: Mutex::new(level),
        })
    }

    fn disabled() -> Self {
        Logger {
            log_file: None,
            print_log: false,
            level: Mutex::new(Level::Info),
        }
    }

    fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;
        Ok(())
    }

    fn append(&self, line: &str, start_new: bool) -> std::io::Result<()> {
        let Some(log_file) = &self.log_file else {
            return Ok(());
        };

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(!start_new)
            .truncate(start_new)
            .open(log_file)?;

        writeln!(file, "[{}] {}", Utc::now().format("%Y-%m-%d %H:%M:%S%.3fZ"), line)
    }

    pub fn log(&self, level: Level, msg: &str, start_new: bool) {
        if level == Level::Silent || self.level() < level {
            return;
        }

        if self.print_log {
            match level {
                Level::Error => tracing::error!("{}", msg),
                Level::Warn => tracing::warn!("{}", msg),
                Level::Info => tracing::info!("{}", msg),
                Level::Debug => tracing::debug!("{}", msg),
                Level::Silent => {}
            }
        }

        if let Err(e) = self.append(&format!("{}: {}", level.tag(), msg), start_new) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    pub fn level(&self) -> Level {
        self.level.lock().map(|l| *l).unwrap_or(Level::Info)
    }

    pub fn set_level(&self, level: Level) {
        if let Ok(mut current) = self.level.lock() {
            *current = level;
        }
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();
static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

fn logger() -> &'static Logger {
    TRACING_INITIALIZED.get_or_init(|| {
        if let Err(e) = Logger::init_tracing() {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });

    LOGGER.get_or_init(|| {
        Logger::from_env().unwrap_or_else(|e| {
            eprintln!("Failed to create logger, logging disabled: {}", e);
            Logger::disabled()
        })
    })
}

pub fn info(msg: &str) {
    info_with_options(msg, false);
}

pub fn info_with_options(msg: &str, start_new: bool) {
    logger().log(Level::Info, msg, start_new);
}

pub fn warn(msg: &str) {
    warn_with_options(msg, false);
}

pub fn warn_with_options(msg: &str, start_new: bool) {
    logger().log(Level::Warn, msg, start_new);
}

pub fn error(msg: &str) {
    error_with_options(msg, false);
}

pub fn error_with_options(msg: &str, start_new: bool) {
    logger().log(Level::Error, msg, start_new);
}

pub fn debug(msg: &str) {
    debug_with_options(msg, false);
}

pub fn debug_with_options(msg: &str, start_new: bool) {
    logger().log(Level::Debug, msg, start_new);
}

pub fn get_log_level() -> Level {
    logger().level()
}

pub fn set_log_level(level: Level) {
    logger().set_level(level);
}

/// Returns false if `level_str` is not a known level.
pub fn set_log_level_str(level_str: &str) -> bool {
    match level_str.parse::<Level>() {
        Ok(level) => {
            set_log_level(level);
            true
        }
        Err(_) => false,
    }
}

/// `HH:MM:SS`, hours not wrapped at 24.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
