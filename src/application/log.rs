//! Append-only action log shown next to the canvas

use std::fmt;

use chrono::{DateTime, Local};

/// One human-readable state change.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

/// Log entries, oldest first.
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    entries: Vec<LogEntry>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.entries.push(LogEntry {
            at: Local::now(),
            message: message.into(),
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Messages without timestamps.
    pub fn messages(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.message.as_str())
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(|e| e.message.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
