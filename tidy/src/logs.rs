//! Pipeline progress logging.
//!
//! A single process-wide logger prints entries to stderr, either as
//! prefixed text or as JSON lines, and keeps a bounded history that the
//! run report and tests can read back.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Mutex;

/// Maximum entries kept in the in-memory history.
const MAX_HISTORY: usize = 256;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Optional indentation level (for nested logs)
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    fn render_text(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        format!("{}{} {}", indent, prefix, self.message)
    }
}

/// Global pipeline logger
pub static LOGGER: Lazy<PipelineLogger> = Lazy::new(PipelineLogger::new);

/// Prints log entries and remembers the most recent ones
pub struct PipelineLogger {
    quiet: AtomicBool,
    format: AtomicU8,
    history: Mutex<Vec<LogEntry>>,
}

impl PipelineLogger {
    pub fn new() -> Self {
        Self {
            quiet: AtomicBool::new(false),
            format: AtomicU8::new(0),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Silence stderr output. History is still recorded.
    pub fn set_quiet(&self, quiet: bool) {
        self.quiet.store(quiet, Ordering::Relaxed);
    }

    pub fn set_format(&self, format: LogFormat) {
        let raw = match format {
            LogFormat::Text => 0,
            LogFormat::Json => 1,
        };
        self.format.store(raw, Ordering::Relaxed);
    }

    fn format(&self) -> LogFormat {
        match self.format.load(Ordering::Relaxed) {
            1 => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }

    /// Record an entry and print it to stderr
    pub fn log(&self, entry: LogEntry) {
        if !self.quiet.load(Ordering::Relaxed) {
            match self.format() {
                LogFormat::Text => eprintln!("{}", entry.render_text()),
                LogFormat::Json => match serde_json::to_string(&entry) {
                    Ok(line) => eprintln!("{}", line),
                    Err(_) => eprintln!("{}", entry.render_text()),
                },
            }
        }

        // A poisoned lock only loses history, never the run.
        if let Ok(mut history) = self.history.lock() {
            if history.len() == MAX_HISTORY {
                history.remove(0);
            }
            history.push(entry);
        }
    }

    /// Snapshot of the recorded history
    pub fn history(&self) -> Vec<LogEntry> {
        self.history
            .lock()
            .map(|h| h.clone())
            .unwrap_or_default()
    }

    /// Number of warnings recorded so far
    pub fn warning_count(&self) -> usize {
        self.history()
            .iter()
            .filter(|e| e.level == LogLevel::Warning)
            .count()
    }
}

impl Default for PipelineLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    LOGGER.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOGGER.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOGGER.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOGGER.log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LOGGER.log(LogEntry::info(msg).with_indent(indent));
}

pub fn log_warning_indent(msg: impl Into<String>, indent: u8) {
    LOGGER.log(LogEntry::warning(msg).with_indent(indent));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_bounded() {
        let logger = PipelineLogger::new();
        logger.set_quiet(true);
        for i in 0..(MAX_HISTORY + 10) {
            logger.log(LogEntry::info(format!("entry {}", i)));
        }
        let history = logger.history();
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history[0].message, "entry 10");
    }

    #[test]
    fn test_warning_count() {
        let logger = PipelineLogger::new();
        logger.set_quiet(true);
        logger.log(LogEntry::info("a"));
        logger.log(LogEntry::warning("b"));
        logger.log(LogEntry::warning("c").with_indent(1));
        assert_eq!(logger.warning_count(), 2);
    }

    #[test]
    fn test_json_entry_shape() {
        let entry = LogEntry::success("done").with_indent(2);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["level"], "success");
        assert_eq!(json["message"], "done");
        assert_eq!(json["indent"], 2);
    }

    #[test]
    fn test_text_render_indent() {
        let line = LogEntry::warning("careful").with_indent(1).render_text();
        assert!(line.starts_with("   "));
        assert!(line.contains("careful"));
    }
}
