// src/config/model.rs

use serde::Deserialize;

/// Top-level plan file as read from TOML.
///
/// ```toml
/// [scheduler]
/// max_rounds = 20
///
/// [seed]
/// raw_product_data = { name = "Vitamin C Serum", sku = "VC-100" }
///
/// [[task]]
/// name = "parse"
/// cmd = "python parse.py"
/// produces = ["parse_data"]
///
/// [[task]]
/// name = "questions"
/// cmd = "python questions.py"
/// produces = ["generate_questions"]
/// requires = ["parse_data"]
/// ```
///
/// Tasks are an array of tables rather than a named map because
/// registration order is significant: it is the tie-break when several
/// tasks become ready in the same round.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanFile {
    /// Global scheduling knobs from `[scheduler]`.
    #[serde(default)]
    pub scheduler: SchedulerSection,

    /// Initial facts from `[seed]`: capability -> value entries merged into
    /// the fact store before round one (inputs with no producer task).
    #[serde(default)]
    pub seed: toml::Table,

    /// All tasks from `[[task]]`, in file order.
    #[serde(default, rename = "task")]
    pub tasks: Vec<TaskSection>,
}

/// `[scheduler]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSection {
    /// Round ceiling: a run never executes more than this many rounds.
    /// Liveness guard only; default 20.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

fn default_max_rounds() -> u32 {
    20
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
        }
    }
}

/// One `[[task]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskSection {
    /// Task identity, unique within the plan.
    pub name: String,

    /// Shell command to run. The current fact-store snapshot is written to
    /// its stdin as JSON; its stdout becomes the result payload.
    pub cmd: String,

    /// Capabilities the task's result is registered under. Must be
    /// non-empty. Several tasks may legally produce the same capability;
    /// their results merge by shallow union.
    pub produces: Vec<String>,

    /// Capabilities that must be present before the task may run.
    #[serde(default)]
    pub requires: Vec<String>,
}
