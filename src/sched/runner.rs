// src/sched/runner.rs

use std::collections::HashSet;
use std::time::Instant;

use futures::future::join_all;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::events::{Event, EventSink};
use crate::facts::FactStore;
use crate::sched::history::{EntryOutcome, ExecutionLog, LogEntry};
use crate::sched::ready::ready_tasks;
use crate::task::{Capability, Task, TaskName};

/// Why a run settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleReason {
    /// Every registered task executed.
    AllExecuted,
    /// A round found nothing ready while tasks remain; their requirements
    /// can never be satisfied (missing producer or cyclic dependency, the
    /// two are indistinguishable from here).
    NoProgress,
    /// The configured round ceiling was hit with tasks still ready.
    CeilingReached,
}

/// Terminal report of one scheduling pass.
///
/// The final fact store and execution log stay on the [`Scheduler`] and are
/// reachable through its accessors, for both settled and failed runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub reason: SettleReason,
    /// Number of rounds that actually executed tasks.
    pub rounds: u32,
    /// Tasks that ran, in completion order.
    pub executed: Vec<TaskName>,
    /// Tasks that never became ready, in registration order. Whether a
    /// non-empty remainder is an overall failure is the caller's call.
    pub unsatisfied: Vec<TaskName>,
}

/// Errors that abort a scheduling pass.
#[derive(Debug, Error)]
pub enum RunError {
    /// A task's `run` returned an error. Fail-fast: no further rounds run
    /// and the task is not retried. Facts merged before the failure remain
    /// in the store for diagnostics.
    #[error("task '{task}' failed in round {round}: {cause}")]
    TaskFailed {
        task: TaskName,
        round: u32,
        cause: anyhow::Error,
    },
}

/// The scheduling loop.
///
/// Holds the registered tasks (registration order is significant for
/// tie-breaking), the fact store, and the execution log. One value drives
/// one scheduling pass; the store is discarded with it.
///
/// Rounds are synchronous: every task ready at the start of a round runs
/// concurrently within it, and the fact store is only merged into after the
/// whole round has completed, so the next round's readiness is evaluated
/// against a stable snapshot.
pub struct Scheduler {
    tasks: Vec<Box<dyn Task>>,
    facts: FactStore,
    log: ExecutionLog,
    executed: HashSet<TaskName>,
    max_rounds: u32,
    sink: Option<Box<dyn EventSink>>,
}

impl Scheduler {
    /// Create a scheduler with the given round ceiling.
    ///
    /// The ceiling is a liveness guard only; a clamp to at least 1 keeps a
    /// zero ceiling from settling before the first round.
    pub fn new(max_rounds: u32) -> Self {
        Self {
            tasks: Vec::new(),
            facts: FactStore::new(),
            log: ExecutionLog::new(),
            executed: HashSet::new(),
            max_rounds: max_rounds.max(1),
            sink: None,
        }
    }

    /// Register a task. Order of registration is preserved and breaks ties
    /// when several tasks become ready in the same round.
    pub fn register(&mut self, task: Box<dyn Task>) {
        debug!(task = %task.name(), "task registered");
        self.tasks.push(task);
    }

    /// Seed an initial fact before round one (e.g. raw input data that has
    /// no producer task). Uses the same merge rule as task results.
    pub fn seed(&mut self, capability: Capability, value: Value) {
        self.facts.merge(capability, value);
    }

    /// Attach an observational event sink. Purely for logging and
    /// visualization; has no effect on scheduling decisions.
    pub fn set_event_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sink = Some(sink);
    }

    pub fn facts(&self) -> &FactStore {
        &self.facts
    }

    pub fn log(&self) -> &ExecutionLog {
        &self.log
    }

    /// Run the scheduling pass to settlement.
    ///
    /// Per round: compute the ready set; if empty, settle. Otherwise run
    /// every ready task, then fold the results in registration order:
    /// merge produced capabilities on success, abort the whole pass on
    /// the first failure.
    pub async fn run(&mut self) -> Result<RunReport, RunError> {
        info!(
            tasks = self.tasks.len(),
            seeded = self.facts.len(),
            max_rounds = self.max_rounds,
            "scheduler run started"
        );
        self.publish(Event::RunStarted {
            tasks: self.tasks.len(),
            seeded: self.facts.len(),
        });

        let mut rounds_run = 0u32;
        let reason = loop {
            let ready = ready_tasks(&self.tasks, &self.executed, &self.facts);

            if ready.is_empty() {
                break if self.executed.len() == self.tasks.len() {
                    SettleReason::AllExecuted
                } else {
                    SettleReason::NoProgress
                };
            }

            if rounds_run >= self.max_rounds {
                warn!(
                    max_rounds = self.max_rounds,
                    still_ready = ready.len(),
                    "round ceiling reached with tasks still ready"
                );
                break SettleReason::CeilingReached;
            }

            rounds_run += 1;
            self.execute_round(rounds_run, &ready).await?;
        };

        let report = self.settle(reason, rounds_run);
        Ok(report)
    }

    /// Run one round's ready set concurrently, then merge results.
    ///
    /// The tasks only see `&self.facts`; no merge happens until every task
    /// in the round has completed. Results are folded in registration order,
    /// so a failure still merges the successes ordered before it.
    async fn execute_round(&mut self, round: u32, ready: &[usize]) -> Result<(), RunError> {
        let names: Vec<TaskName> = ready
            .iter()
            .map(|&idx| self.tasks[idx].name().to_string())
            .collect();
        info!(round, ready = ?names, "round started");
        self.publish(Event::RoundStarted {
            round,
            ready: names,
        });

        let facts = &self.facts;
        let tasks = &self.tasks;
        let outcomes = join_all(ready.iter().map(|&idx| async move {
            let task = &tasks[idx];
            debug!(round, task = %task.name(), "executing task");
            let started = Instant::now();
            let result = task.run(facts).await;
            (idx, result, started.elapsed())
        }))
        .await;

        for (idx, result, duration) in outcomes {
            let (name, produces) = {
                let task = &self.tasks[idx];
                (task.name().to_string(), task.produces().to_vec())
            };

            match result {
                Ok(value) => {
                    for capability in produces {
                        self.facts.merge(capability.clone(), value.clone());
                        self.publish(Event::ResultPublished {
                            round,
                            task: name.clone(),
                            capability,
                        });
                    }
                    self.executed.insert(name.clone());
                    info!(round, task = %name, ?duration, "task completed");
                    self.log.append(LogEntry {
                        task: name,
                        round,
                        outcome: EntryOutcome::Success,
                        duration,
                    });
                }
                Err(cause) => {
                    warn!(round, task = %name, error = %cause, "task failed; aborting run");
                    self.log.append(LogEntry {
                        task: name.clone(),
                        round,
                        outcome: EntryOutcome::Failed(cause.to_string()),
                        duration,
                    });
                    self.publish(Event::TaskFailed {
                        round,
                        task: name.clone(),
                        error: cause.to_string(),
                    });
                    return Err(RunError::TaskFailed {
                        task: name,
                        round,
                        cause,
                    });
                }
            }
        }

        Ok(())
    }

    /// Build the terminal report and log diagnostics for stuck tasks.
    fn settle(&mut self, reason: SettleReason, rounds: u32) -> RunReport {
        let executed: Vec<TaskName> = self
            .log
            .entries()
            .iter()
            .filter(|e| e.succeeded())
            .map(|e| e.task.clone())
            .collect();

        let unsatisfied: Vec<TaskName> = self
            .tasks
            .iter()
            .filter(|t| !self.executed.contains(t.name()))
            .map(|t| t.name().to_string())
            .collect();

        // Missing producer and genuine cycle look the same from here, so
        // log requirements next to the final fact keys to aid diagnosis.
        let available: Vec<&str> = self.facts.keys().collect();
        for task in self.tasks.iter().filter(|t| !self.executed.contains(t.name())) {
            warn!(
                task = %task.name(),
                requires = ?task.requires(),
                ?available,
                "task never became ready"
            );
        }

        info!(
            ?reason,
            rounds,
            executed = executed.len(),
            unsatisfied = unsatisfied.len(),
            "scheduler run settled"
        );
        self.publish(Event::RunSettled { reason });

        RunReport {
            reason,
            rounds,
            executed,
            unsatisfied,
        }
    }

    fn publish(&mut self, event: Event) {
        if let Some(sink) = self.sink.as_mut() {
            sink.publish(event);
        }
    }
}
