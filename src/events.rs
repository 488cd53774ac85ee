// src/events.rs

//! Observational event sink.
//!
//! The scheduler can broadcast what it is doing (rounds starting, results
//! published, tasks failing) to an optional sink. This exists purely for
//! logging, visualization and tests: readiness is gated by fact-store key
//! presence alone, and nothing a sink does can influence scheduling.

use std::sync::{Arc, Mutex};

use crate::sched::SettleReason;
use crate::task::{Capability, TaskName};

/// Events emitted over the course of one scheduling pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    RunStarted {
        tasks: usize,
        seeded: usize,
    },
    RoundStarted {
        round: u32,
        ready: Vec<TaskName>,
    },
    /// One per capability a successful task registered its result under.
    ResultPublished {
        round: u32,
        task: TaskName,
        capability: Capability,
    },
    TaskFailed {
        round: u32,
        task: TaskName,
        error: String,
    },
    RunSettled {
        reason: SettleReason,
    },
}

/// Receives scheduler events. Implementations must not block for long;
/// publishing happens inline on the scheduling loop.
pub trait EventSink: Send {
    fn publish(&mut self, event: Event);
}

/// Sink that records every event in memory behind a shared handle, so the
/// events remain inspectable after the scheduler has consumed the sink.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<Event> {
        match self.events.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EventSink for RecordingSink {
    fn publish(&mut self, event: Event) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}
