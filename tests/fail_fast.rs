mod common;

use serde_json::json;

use capflow::sched::{EntryOutcome, RunError, Scheduler};

use common::StubTask;

/// A failing task aborts the whole pass: dependents of other tasks never
/// run, and the error names the failing task and round.
#[tokio::test]
async fn failure_aborts_run_before_later_rounds() {
    let mut scheduler = Scheduler::new(10);
    scheduler.register(StubTask::failing("T", &["t_out"], &[], "boom"));
    scheduler.register(StubTask::ok("U", &["u_out"], &[], json!({})));
    scheduler.register(StubTask::ok("V", &["v_out"], &["u_out"], json!({})));

    let err = scheduler.run().await.unwrap_err();

    let RunError::TaskFailed { task, round, cause } = err;
    assert_eq!(task, "T");
    assert_eq!(round, 1);
    assert!(cause.to_string().contains("boom"));

    // V depends on U, which shares T's round; the abort means V never ran.
    let logged: Vec<&str> = scheduler
        .log()
        .entries()
        .iter()
        .map(|e| e.task.as_str())
        .collect();
    assert!(!logged.contains(&"V"));
}

/// Partial results merged in earlier rounds stay in the store after a
/// failure, for diagnostics.
#[tokio::test]
async fn earlier_facts_survive_a_failed_run() {
    let mut scheduler = Scheduler::new(10);
    scheduler.register(StubTask::ok("parse", &["parsed"], &[], json!({"doc": 7})));
    scheduler.register(StubTask::failing("broken", &["content"], &["parsed"], "bad input"));

    let err = scheduler.run().await.unwrap_err();
    let RunError::TaskFailed { task, round, .. } = err;
    assert_eq!(task, "broken");
    assert_eq!(round, 2);

    assert_eq!(scheduler.facts().get("parsed"), Some(&json!({"doc": 7})));
    assert_eq!(scheduler.facts().get("content"), None);
}

/// The failure is recorded in the execution log with its error detail.
#[tokio::test]
async fn failure_is_logged_with_detail() {
    let mut scheduler = Scheduler::new(10);
    scheduler.register(StubTask::failing("T", &["t_out"], &[], "boom"));

    let _ = scheduler.run().await.unwrap_err();

    let entries = scheduler.log().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].task, "T");
    assert_eq!(entries[0].round, 1);
    match &entries[0].outcome {
        EntryOutcome::Failed(detail) => assert!(detail.contains("boom")),
        EntryOutcome::Success => panic!("expected a failure entry"),
    }
}

/// Successes folded before the failure in the same round are still merged
/// (registration order decides what "before" means).
#[tokio::test]
async fn same_round_successes_before_failure_are_merged() {
    let mut scheduler = Scheduler::new(10);
    scheduler.register(StubTask::ok("first", &["f_out"], &[], json!({"ok": 1})));
    scheduler.register(StubTask::failing("second", &["s_out"], &[], "boom"));

    let err = scheduler.run().await.unwrap_err();
    let RunError::TaskFailed { task, .. } = err;
    assert_eq!(task, "second");

    assert_eq!(scheduler.facts().get("f_out"), Some(&json!({"ok": 1})));
}
