/// Progress reporting for the precipitation pivot
///
/// The analysis code never prints. Orchestration code reports through the
/// `Reporter` trait, so the binary can log to the console (and optionally
/// a file) while tests capture or discard the same messages.

use chrono::Utc;
use serde::Deserialize;
use std::cell::RefCell;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline Stages
// ---------------------------------------------------------------------------

/// Which step of the run a message comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Aggregate,
    Output,
    System,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Load => write!(f, "LOAD"),
            Stage::Aggregate => write!(f, "PIVOT"),
            Stage::Output => write!(f, "OUT"),
            Stage::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Reporter trait
// ---------------------------------------------------------------------------

/// Sink for progress messages.
pub trait Reporter {
    fn log(&self, level: LogLevel, stage: Stage, message: &str);

    fn debug(&self, stage: Stage, message: &str) {
        self.log(LogLevel::Debug, stage, message);
    }

    fn info(&self, stage: Stage, message: &str) {
        self.log(LogLevel::Info, stage, message);
    }

    fn warn(&self, stage: Stage, message: &str) {
        self.log(LogLevel::Warning, stage, message);
    }

    fn error(&self, stage: Stage, message: &str) {
        self.log(LogLevel::Error, stage, message);
    }
}

// ---------------------------------------------------------------------------
// Console logger
// ---------------------------------------------------------------------------

pub struct ConsoleLogger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<PathBuf>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel, log_file: Option<PathBuf>, console_timestamps: bool) -> Self {
        ConsoleLogger {
            min_level,
            log_file,
            console_timestamps,
        }
    }

    fn format_entry(level: LogLevel, stage: Stage, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        format!("{} {} {}: {}", timestamp, level, stage, message)
    }

    fn append_to_file(path: &PathBuf, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

impl Reporter for ConsoleLogger {
    fn log(&self, level: LogLevel, stage: Stage, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = Self::format_entry(level, stage, message);

        if self.console_timestamps {
            match level {
                LogLevel::Error => eprintln!("{}", log_entry),
                LogLevel::Warning => eprintln!("   {}", log_entry),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}: {}", stage, message),
                LogLevel::Warning => eprintln!("   ⚠ {}: {}", stage, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path.display(), e);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Test-friendly reporters
// ---------------------------------------------------------------------------

/// Discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn log(&self, _level: LogLevel, _stage: Stage, _message: &str) {}
}

/// One captured message.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub stage: Stage,
    pub message: String,
}

/// Keeps every message in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    entries: RefCell<Vec<LogEntry>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries.borrow().iter().any(|e| e.message.contains(needle))
    }
}

impl Reporter for RecordingReporter {
    fn log(&self, level: LogLevel, stage: Stage, message: &str) {
        self.entries.borrow_mut().push(LogEntry {
            level,
            stage,
            message: message.to_string(),
        });
    }
}

// ---------------------------------------------------------------------------
// Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of the output step
pub fn log_output_summary(reporter: &dyn Reporter, total: usize, successful: usize) {
    let failed = total - successful;
    let message = format!(
        "Output complete: {}/{} sinks written, {} failed",
        successful,
        total,
        failed
    );

    if failed == 0 {
        reporter.info(Stage::Output, &message);
    } else if successful == 0 {
        reporter.error(Stage::Output, &message);
    } else {
        reporter.warn(Stage::Output, &message);
    }
}
