// src/lib.rs

pub mod cli;
pub mod config;
pub mod events;
pub mod exec;
pub mod facts;
pub mod logging;
pub mod sched;
pub mod task;

use std::path::PathBuf;

use anyhow::{Result, bail};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::PlanFile;
use crate::exec::CmdTask;
use crate::sched::Scheduler;
use crate::task::Task;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - plan loading and validation
/// - fact seeding and task registration (file order = registration order)
/// - one scheduling pass to settlement
/// - reporting: final facts as JSON on stdout, summary via tracing
pub async fn run(args: CliArgs) -> Result<()> {
    let plan_path = PathBuf::from(&args.config);
    let plan = load_and_validate(&plan_path)?;

    if args.dry_run {
        print_dry_run(&plan);
        return Ok(());
    }

    let max_rounds = args.max_rounds.unwrap_or(plan.scheduler.max_rounds);
    let mut scheduler = Scheduler::new(max_rounds);

    for (capability, value) in plan.seed.iter() {
        let value = serde_json::to_value(value)?;
        scheduler.seed(capability.clone(), value);
    }

    for section in plan.tasks.iter() {
        let task: Box<dyn Task> = Box::new(CmdTask::from_plan(section));
        scheduler.register(task);
    }

    let report = scheduler.run().await?;

    info!(
        rounds = report.rounds,
        order = %report.executed.join(" -> "),
        "execution order"
    );

    // Final fact store on stdout; the caller owns all further persistence.
    println!("{}", serde_json::to_string_pretty(&scheduler.facts().as_json())?);

    if args.strict && !report.unsatisfied.is_empty() {
        bail!(
            "{} task(s) never became ready: {}",
            report.unsatisfied.len(),
            report.unsatisfied.join(", ")
        );
    }

    Ok(())
}

/// Simple dry-run output: print seeds, tasks and their capability sets.
fn print_dry_run(plan: &PlanFile) {
    println!("capflow dry-run");
    println!("  scheduler.max_rounds = {}", plan.scheduler.max_rounds);
    println!();

    if !plan.seed.is_empty() {
        println!("seeds ({}):", plan.seed.len());
        for key in plan.seed.keys() {
            println!("  - {key}");
        }
        println!();
    }

    println!("tasks ({}):", plan.tasks.len());
    for task in plan.tasks.iter() {
        println!("  - {}", task.name);
        println!("      cmd: {}", task.cmd);
        println!("      produces: {:?}", task.produces);
        if !task.requires.is_empty() {
            println!("      requires: {:?}", task.requires);
        }
    }

    debug!("dry-run complete (no execution)");
}
