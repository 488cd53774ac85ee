// src/sched/ready.rs

use std::collections::HashSet;

use crate::facts::FactStore;
use crate::task::{Task, TaskName};

/// Compute which tasks are ready to run.
///
/// Deterministic pure function: a task is ready iff it has not executed yet
/// and every capability it requires is present in the fact store. Returns
/// indices into `tasks`, so the result is in registration order; that
/// ordering is the only tie-break and carries no priority semantics.
pub fn ready_tasks(
    tasks: &[Box<dyn Task>],
    executed: &HashSet<TaskName>,
    facts: &FactStore,
) -> Vec<usize> {
    tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| !executed.contains(task.name()))
        .filter(|(_, task)| facts.has_all(task.requires()))
        .map(|(idx, _)| idx)
        .collect()
}
