// src/config/validate.rs

use std::collections::HashSet;

use anyhow::{Result, anyhow};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::warn;

use crate::config::model::PlanFile;

/// Run semantic validation against a loaded plan.
///
/// Hard errors:
/// - no tasks at all
/// - empty or duplicate task names
/// - a task with an empty `produces` set
/// - `max_rounds = 0`
///
/// Warnings only (the scheduler's unsatisfied reporting is the defined
/// behavior for these, and optional never-ready tasks are legitimate):
/// - a required capability that no task produces and no seed provides
/// - a cycle in the producer -> consumer graph
pub fn validate_plan(plan: &PlanFile) -> Result<()> {
    ensure_has_tasks(plan)?;
    validate_scheduler_section(plan)?;
    validate_task_declarations(plan)?;
    warn_on_unsatisfiable_requirements(plan);
    warn_on_capability_cycles(plan);
    Ok(())
}

fn ensure_has_tasks(plan: &PlanFile) -> Result<()> {
    if plan.tasks.is_empty() {
        return Err(anyhow!("plan must contain at least one [[task]] entry"));
    }
    Ok(())
}

fn validate_scheduler_section(plan: &PlanFile) -> Result<()> {
    if plan.scheduler.max_rounds == 0 {
        return Err(anyhow!("[scheduler].max_rounds must be >= 1 (got 0)"));
    }
    Ok(())
}

fn validate_task_declarations(plan: &PlanFile) -> Result<()> {
    let mut seen = HashSet::new();

    for task in plan.tasks.iter() {
        if task.name.trim().is_empty() {
            return Err(anyhow!("task with empty name"));
        }
        if !seen.insert(task.name.as_str()) {
            return Err(anyhow!("duplicate task name '{}'", task.name));
        }
        if task.produces.is_empty() {
            return Err(anyhow!(
                "task '{}' must produce at least one capability",
                task.name
            ));
        }
    }

    Ok(())
}

/// Warn about requirements that nothing in the plan can ever satisfy.
/// These manifest at runtime as the task settling in the unsatisfied set.
fn warn_on_unsatisfiable_requirements(plan: &PlanFile) {
    let produced: HashSet<&str> = plan
        .tasks
        .iter()
        .flat_map(|t| t.produces.iter().map(|c| c.as_str()))
        .collect();
    let seeded: HashSet<&str> = plan.seed.keys().map(|k| k.as_str()).collect();

    for task in plan.tasks.iter() {
        for req in task.requires.iter() {
            if !produced.contains(req.as_str()) && !seeded.contains(req.as_str()) {
                warn!(
                    task = %task.name,
                    requires = %req,
                    "requirement has no producer task and no seed; task will never become ready"
                );
            }
        }
    }
}

/// Warn about cycles in the capability dependency graph.
fn warn_on_capability_cycles(plan: &PlanFile) {
    if let Some(task) = capability_cycle(plan) {
        warn!(
            task = %task,
            "cycle in capability dependencies; the involved tasks will never become ready"
        );
    }
}

/// Find a task involved in a capability dependency cycle, if any.
///
/// Edge direction: producer task -> consumer task, for every capability the
/// consumer requires that the producer produces. Requirements a `[seed]`
/// entry satisfies add no edge: the fact is present before round one, so
/// the producer does not gate the consumer. A remaining cycle means the
/// involved tasks gate each other and will all settle unsatisfied.
pub fn capability_cycle(plan: &PlanFile) -> Option<String> {
    let seeded: HashSet<&str> = plan.seed.keys().map(|k| k.as_str()).collect();

    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for task in plan.tasks.iter() {
        graph.add_node(task.name.as_str());
    }

    for consumer in plan.tasks.iter() {
        for producer in plan.tasks.iter() {
            if producer.name == consumer.name {
                continue;
            }
            let feeds = consumer
                .requires
                .iter()
                .filter(|req| !seeded.contains(req.as_str()))
                .any(|req| producer.produces.contains(req));
            if feeds {
                graph.add_edge(producer.name.as_str(), consumer.name.as_str(), ());
            }
        }
    }

    toposort(&graph, None)
        .err()
        .map(|cycle| cycle.node_id().to_string())
}
