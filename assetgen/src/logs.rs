//! Console logging.
//!
//! Success entries are the per-file confirmations and print verbatim on
//! stdout. Info entries are progress details, shown only in verbose mode.
//! Warnings and errors go to stderr.

use std::sync::atomic::{AtomicBool, Ordering};

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting level for detail lines
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Info,
            message: message.into(),
            indent: 0,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Success,
            message: message.into(),
            indent: 0,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Warning,
            message: message.into(),
            indent: 0,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Error,
            message: message.into(),
            indent: 0,
        }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }
}

/// Global log sink
pub static LOG_SINK: LogSink = LogSink::new();

/// Decides which entries reach the console and how they look.
pub struct LogSink {
    verbose: AtomicBool,
    quiet: AtomicBool,
}

impl LogSink {
    pub const fn new() -> Self {
        Self {
            verbose: AtomicBool::new(false),
            quiet: AtomicBool::new(false),
        }
    }

    pub fn set_verbose(&self, verbose: bool) {
        self.verbose.store(verbose, Ordering::Relaxed);
    }

    /// Quiet mode drops info and success entries.
    pub fn set_quiet(&self, quiet: bool) {
        self.quiet.store(quiet, Ordering::Relaxed);
    }

    /// Console line for an entry, `None` if the current mode hides it.
    pub fn render(&self, entry: &LogEntry) -> Option<String> {
        let quiet = self.quiet.load(Ordering::Relaxed);
        let indent = "   ".repeat(entry.indent as usize);
        match entry.level {
            LogLevel::Info if quiet || !self.verbose.load(Ordering::Relaxed) => None,
            LogLevel::Success if quiet => None,
            LogLevel::Info | LogLevel::Success => Some(format!("{}{}", indent, entry.message)),
            LogLevel::Warning => Some(format!("{}Warning: {}", indent, entry.message)),
            LogLevel::Error => Some(format!("{}Error: {}", indent, entry.message)),
        }
    }

    pub fn log(&self, entry: LogEntry) {
        let Some(line) = self.render(&entry) else {
            return;
        };
        match entry.level {
            LogLevel::Success => println!("{}", line),
            _ => eprintln!("{}", line),
        }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    LOG_SINK.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOG_SINK.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOG_SINK.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOG_SINK.log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LOG_SINK.log(LogEntry::info(msg).with_indent(indent));
}
