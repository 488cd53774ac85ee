// src/sched/mod.rs

//! Dependency-driven scheduling core.
//!
//! - [`ready`] computes which registered tasks are eligible to run.
//! - [`runner`] contains the round loop that executes ready tasks, merges
//!   their results into the fact store and settles the run.
//! - [`history`] is the append-only execution log used for diagnostics.

pub mod history;
pub mod ready;
pub mod runner;

pub use history::{EntryOutcome, ExecutionLog, LogEntry};
pub use ready::ready_tasks;
pub use runner::{RunError, RunReport, Scheduler, SettleReason};
