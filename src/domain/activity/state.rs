//! Activity log state container — append-only, bounded, FIFO eviction.

use super::{LogEntry, LogKind};
use std::collections::VecDeque;

/// Number of entries the dashboard keeps.
pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// Bounded activity log.
///
/// Entries can only be appended; once the log is at capacity the oldest entry
/// is evicted. Reads return entries in insertion order.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry stamped with the current time.
    pub fn append(&mut self, message: impl Into<String>, kind: LogKind) -> &LogEntry {
        let entry = LogEntry::new(message, kind);
        match kind {
            LogKind::Error => tracing::warn!(message = %entry.message, "activity"),
            _ => tracing::debug!(kind = %kind, message = %entry.message, "activity"),
        }
        self.push(entry)
    }

    /// Append a pre-built entry.
    pub fn push(&mut self, entry: LogEntry) -> &LogEntry {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.append(message, LogKind::Info);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.append(message, LogKind::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.append(message, LogKind::Error);
    }

    pub fn entries(&self) -> &VecDeque<LogEntry> {
        &self.entries
    }

    /// Owned copy of the entries, oldest first.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_insertion_order() {
        let mut log = ActivityLog::default();
        log.info("first");
        log.success("second");
        log.error("third");
        let messages: Vec<_> = log.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["first", "second", "third"]);
        assert_eq!(log.latest().unwrap().kind, LogKind::Error);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut log = ActivityLog::new(3);
        for i in 0..10 {
            log.info(format!("entry {i}"));
            assert!(log.len() <= 3);
        }
    }

    #[test]
    fn test_keeps_most_recent_cap_entries_in_order() {
        let mut log = ActivityLog::default();
        for i in 0..75 {
            log.info(format!("entry {i}"));
        }
        assert_eq!(log.len(), DEFAULT_LOG_CAPACITY);
        let messages: Vec<_> = log.entries().iter().map(|e| e.message.clone()).collect();
        let expected: Vec<_> = (25..75).map(|i| format!("entry {i}")).collect();
        assert_eq!(messages, expected);
    }

    #[test]
    fn test_timestamps_are_non_decreasing() {
        let mut log = ActivityLog::default();
        log.info("a");
        log.info("b");
        let entries = log.snapshot();
        assert!(entries[0].timestamp <= entries[1].timestamp);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut log = ActivityLog::new(0);
        log.info("only");
        log.info("latest");
        assert_eq!(log.len(), 1);
        assert_eq!(log.latest().unwrap().message, "latest");
    }
}
