mod common;

use serde_json::json;

use capflow::events::{Event, EventSink, RecordingSink};
use capflow::sched::{Scheduler, SettleReason};

use common::StubTask;

/// Three tasks, registered P, Q, R: P has no requirements, Q and R both
/// wait on "parsed". Round 1 runs {P}, round 2 runs {Q, R} with the tie
/// broken by registration order, round 3 finds nothing ready and settles.
#[tokio::test]
async fn linear_fan_out_runs_in_two_rounds() {
    let mut scheduler = Scheduler::new(10);
    scheduler.register(StubTask::ok("P", &["parsed"], &[], json!({"doc": 1})));
    scheduler.register(StubTask::ok("Q", &["questions"], &["parsed"], json!({"q": []})));
    scheduler.register(StubTask::ok("R", &["content"], &["parsed"], json!({"c": []})));

    let report = scheduler.run().await.unwrap();

    assert_eq!(report.reason, SettleReason::AllExecuted);
    assert_eq!(report.rounds, 2);
    assert_eq!(report.executed, vec!["P", "Q", "R"]);
    assert!(report.unsatisfied.is_empty());

    let rounds: Vec<(String, u32)> = scheduler
        .log()
        .entries()
        .iter()
        .map(|e| (e.task.clone(), e.round))
        .collect();
    assert_eq!(
        rounds,
        vec![
            ("P".to_string(), 1),
            ("Q".to_string(), 2),
            ("R".to_string(), 2),
        ]
    );
}

/// Same inputs and registration order give the same executed ordering.
#[tokio::test]
async fn executed_order_is_deterministic() {
    let mut orders = Vec::new();

    for _ in 0..2 {
        let mut scheduler = Scheduler::new(10);
        scheduler.register(StubTask::ok("parse", &["parsed"], &[], json!({})));
        scheduler.register(StubTask::ok("benefits", &["content"], &["parsed"], json!({})));
        scheduler.register(StubTask::ok("safety", &["content"], &["parsed"], json!({})));
        scheduler.register(StubTask::ok(
            "page",
            &["filled"],
            &["parsed", "content"],
            json!({}),
        ));

        let report = scheduler.run().await.unwrap();
        orders.push(report.executed);
    }

    assert_eq!(orders[0], vec!["parse", "benefits", "safety", "page"]);
    assert_eq!(orders[0], orders[1]);
}

/// The event sink observes the run without gating it, and sees rounds and
/// published results in order.
#[tokio::test]
async fn event_sink_records_run_shape() {
    let sink = RecordingSink::new();

    let mut scheduler = Scheduler::new(10);
    scheduler.set_event_sink(Box::new(sink.clone()));
    scheduler.register(StubTask::ok("P", &["parsed"], &[], json!({})));
    scheduler.register(StubTask::ok("Q", &["questions"], &["parsed"], json!({})));

    let report = scheduler.run().await.unwrap();
    assert_eq!(report.reason, SettleReason::AllExecuted);

    let events = sink.take();
    assert_eq!(
        events,
        vec![
            Event::RunStarted { tasks: 2, seeded: 0 },
            Event::RoundStarted {
                round: 1,
                ready: vec!["P".to_string()],
            },
            Event::ResultPublished {
                round: 1,
                task: "P".to_string(),
                capability: "parsed".to_string(),
            },
            Event::RoundStarted {
                round: 2,
                ready: vec!["Q".to_string()],
            },
            Event::ResultPublished {
                round: 2,
                task: "Q".to_string(),
                capability: "questions".to_string(),
            },
            Event::RunSettled {
                reason: SettleReason::AllExecuted,
            },
        ]
    );
}

/// A sink that drops every event must not change scheduling at all.
#[tokio::test]
async fn event_sink_never_gates_scheduling() {
    struct NullSink;
    impl EventSink for NullSink {
        fn publish(&mut self, _event: Event) {}
    }

    let mut scheduler = Scheduler::new(10);
    scheduler.set_event_sink(Box::new(NullSink));
    scheduler.register(StubTask::ok("P", &["parsed"], &[], json!({})));
    scheduler.register(StubTask::ok("Q", &["questions"], &["parsed"], json!({})));

    let report = scheduler.run().await.unwrap();
    assert_eq!(report.executed, vec!["P", "Q"]);
}
