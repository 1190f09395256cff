use std::sync::Mutex;

use super::formatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
    Success,
}

/// One recorded line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub category: String,
    pub message: String,
}

/// Logger that records every line so a run can be summarized or replayed
///
/// Nested workflow runs share the same logger, so the summary of a release
/// also covers the publish it performed. Lines are forwarded to the `log`
/// facade at debug level as well.
pub struct ReplayLogger {
    entries: Mutex<Vec<LogEntry>>,
    echo: bool,
}

impl ReplayLogger {
    /// Logger that prints each line as it is recorded
    pub fn new() -> Self {
        ReplayLogger {
            entries: Mutex::new(Vec::new()),
            echo: true,
        }
    }

    /// Logger that only records
    pub fn silent() -> Self {
        ReplayLogger {
            entries: Mutex::new(Vec::new()),
            echo: false,
        }
    }

    pub fn info(&self, category: &str, message: impl Into<String>) {
        self.record(LogLevel::Info, category, message.into());
    }

    pub fn error(&self, category: &str, message: impl Into<String>) {
        self.record(LogLevel::Error, category, message.into());
    }

    pub fn success(&self, category: &str, message: impl Into<String>) {
        self.record(LogLevel::Success, category, message.into());
    }

    fn record(&self, level: LogLevel, category: &str, message: String) {
        log::debug!(target: "module_release", "[{}] {}", category, message);

        let entry = LogEntry {
            level,
            category: category.to_string(),
            message,
        };
        if self.echo {
            formatter::display_entry(&entry);
        }

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push(entry);
    }

    /// Snapshot of everything recorded so far
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Messages recorded so far, oldest first
    pub fn replay(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.message).collect()
    }

    /// Print a summary of the recorded lines
    pub fn summarize(&self) {
        formatter::display_summary(&self.entries());
    }
}

impl Default for ReplayLogger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let logger = ReplayLogger::silent();
        logger.info("git", "git status --porcelain");
        logger.error("registry", "lookup failed");
        logger.success("success", "done");

        let entries = logger.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].category, "git");
        assert_eq!(entries[1].level, LogLevel::Error);
        assert_eq!(logger.replay(), vec!["git status --porcelain", "lookup failed", "done"]);
    }

    #[test]
    fn test_shared_between_threads() {
        let logger = ReplayLogger::silent();
        std::thread::scope(|s| {
            s.spawn(|| logger.info("git", "one"));
            s.spawn(|| logger.info("git", "two"));
        });
        assert_eq!(logger.entries().len(), 2);
    }
}
