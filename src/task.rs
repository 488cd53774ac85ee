// src/task.rs

//! The task contract.
//!
//! A task declares the capabilities it produces and the capabilities it
//! requires, and exposes a single `run` operation over a read-only snapshot
//! of the fact store. The scheduler treats all tasks uniformly; there is no
//! dispatch hierarchy beyond this trait.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::facts::FactStore;

/// A capability names a kind of fact a task can produce or require
/// (e.g. "parse_data", "generate_questions"). Opaque and comparable;
/// no hierarchy, no versioning.
pub type Capability = String;

/// Public type alias for task names throughout the crate.
pub type TaskName = String;

/// An independent unit of work.
///
/// Contract:
/// - `produces()` is non-empty; on success every produced capability is
///   merged into the fact store with the task's result.
/// - `requires()` may be empty, in which case the task is eligible from
///   round one.
/// - `run` is invoked at most once per scheduling pass. The `FactStore`
///   argument is a stable snapshot: it is never mutated while any task in
///   the same round is still running.
/// - An `Err` from `run` aborts the entire scheduling pass (fail-fast,
///   no retry).
#[async_trait]
pub trait Task: Send + Sync {
    /// Immutable identity, unique within one scheduling pass.
    fn name(&self) -> &str;

    /// Capabilities this task registers results under when it succeeds.
    fn produces(&self) -> &[Capability];

    /// Capabilities that must be present in the fact store before this
    /// task may run.
    fn requires(&self) -> &[Capability];

    /// Perform the work against a snapshot of the current facts.
    async fn run(&self, facts: &FactStore) -> Result<Value>;
}
