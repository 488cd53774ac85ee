// src/sched/history.rs

use std::time::Duration;

use crate::task::TaskName;

/// How a logged task invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Success,
    Failed(String), // error detail
}

/// One completed task invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub task: TaskName,
    /// Round in which the task ran (1-based).
    pub round: u32,
    pub outcome: EntryOutcome,
    /// Wall-clock duration of the task's `run`.
    pub duration: Duration,
}

impl LogEntry {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, EntryOutcome::Success)
    }
}

/// Append-only record of task executions, ordered by completion within each
/// round. Purely observational: the scheduler never consults it when
/// deciding what to run.
#[derive(Debug, Default)]
pub struct ExecutionLog {
    entries: Vec<LogEntry>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }
}
