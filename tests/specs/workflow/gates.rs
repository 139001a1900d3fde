//! Gate specs
//!
//! Verify the decisions between LOAD, CREATE and TEST.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn rejecting_load_gate_finishes_without_touching_tables() {
    let scenario = Scenario::new(&["base", "sales", "stock"]);
    let controller = scenario.controller();

    let (end, script) = run(&controller, &[Decision::Reject]).await;

    assert_eq!(end, Some(StageEvent::done(Stage::Done)));
    assert_eq!(
        trace(&script.events),
        strings(&[
            "init:start",
            "init:done",
            "load:start",
            "load:progress(0)",
            "load:progress(33)",
            "load:progress(67)",
            "load:done",
            "done:start",
            "done:done",
        ])
    );
    assert!(!scenario.database.calls().contains(&DatabaseCall::ClearSchema));
}

#[tokio::test]
async fn rejecting_create_gate_skips_test_data() {
    let scenario = Scenario::new(&["base"]);
    let controller = scenario.controller();

    let (end, script) = run(&controller, &[Decision::Accept, Decision::Reject]).await;

    assert_eq!(end, Some(StageEvent::done(Stage::Done)));
    assert_eq!(
        stages_started(&script.events),
        vec![Stage::Init, Stage::Load, Stage::Create, Stage::Done]
    );
    assert!(scenario
        .modules
        .calls()
        .iter()
        .all(|c| c.hook == ModuleHook::LoadModels));
}

#[tokio::test]
async fn gates_carry_their_prompts() {
    let scenario = Scenario::new(&[]);
    let controller = scenario.controller();
    let mut rx = controller.subscribe();

    controller.start().unwrap();
    controller.submit(RunCommand::new(Stage::Init));
    wait_for(&mut rx, &StageEvent::done(Stage::Load)).await;

    let decision = controller.gate().open_for(Stage::Load).unwrap();
    assert_eq!(
        decision.prompt,
        "Reconfigure database? This will drop the tables in the database you chose and recreate it."
    );
    controller.gate().resolve(Decision::Accept);

    wait_for(&mut rx, &StageEvent::done(Stage::Create)).await;
    let decision = controller.gate().open_for(Stage::Create).unwrap();
    assert_eq!(decision.prompt, "Insert test values?");
    controller.gate().resolve(Decision::Reject);

    wait_for(&mut rx, &StageEvent::done(Stage::Done)).await;
}

#[tokio::test]
async fn accepting_twice_runs_create_once() {
    let scenario = Scenario::new(&["base"]);
    let controller = scenario.controller();
    let mut rx = controller.subscribe();

    controller.start().unwrap();
    controller.submit(RunCommand::new(Stage::Init));
    wait_for(&mut rx, &StageEvent::done(Stage::Load)).await;

    controller.gate().open_for(Stage::Load).unwrap();
    assert_eq!(
        controller.gate().resolve(Decision::Accept),
        Some(RunCommand::gated(Stage::Create))
    );
    assert_eq!(controller.gate().resolve(Decision::Accept), None);

    wait_for(&mut rx, &StageEvent::done(Stage::Create)).await;
    controller.gate().open_for(Stage::Create).unwrap();
    controller.gate().resolve(Decision::Reject);
    wait_for(&mut rx, &StageEvent::done(Stage::Done)).await;

    let history = controller.channel().history();
    let creates = history
        .iter()
        .filter(|e| **e == StageEvent::start(Stage::Create))
        .count();
    assert_eq!(creates, 1);
    assert_eq!(
        scenario
            .database
            .calls()
            .iter()
            .filter(|c| **c == DatabaseCall::ClearSchema)
            .count(),
        1
    );
}

#[tokio::test]
async fn gate_never_resolves_on_its_own() {
    let scenario = Scenario::new(&["base"]);
    let controller = scenario.controller();
    let mut rx = controller.subscribe();

    controller.start().unwrap();
    controller.submit(RunCommand::new(Stage::Init));
    wait_for(&mut rx, &StageEvent::done(Stage::Load)).await;
    controller.gate().open_for(Stage::Load).unwrap();

    // Nothing arrives while the decision is pending
    let idle = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
    assert!(idle.is_err());
    assert!(controller.gate().pending().is_some());

    assert_eq!(controller.shutdown(SPEC_WAIT).await, ShutdownStatus::Stopped);
    assert!(controller.gate().pending().is_none());
}

#[tokio::test]
async fn create_without_an_accepted_gate_is_refused() {
    let scenario = Scenario::new(&["base"]);
    let controller = scenario.controller();
    let mut rx = controller.subscribe();

    controller.start().unwrap();
    controller.submit(RunCommand::new(Stage::Init));
    wait_for(&mut rx, &StageEvent::done(Stage::Load)).await;
    assert!(controller.gate().pending().is_none());

    // Claiming gate origin is not consent
    assert!(controller.submit(RunCommand::gated(Stage::Create)));
    let idle = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
    assert!(idle.is_err());
    assert!(!scenario.database.calls().contains(&DatabaseCall::ClearSchema));

    controller.gate().open_for(Stage::Load).unwrap();
    controller.gate().resolve(Decision::Accept);
    wait_for(&mut rx, &StageEvent::done(Stage::Create)).await;

    // Nor does it stand in for the CREATE gate
    controller.submit(RunCommand::gated(Stage::Test));
    let idle = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
    assert!(idle.is_err());
    assert_eq!(controller.shutdown(SPEC_WAIT).await, ShutdownStatus::Stopped);
    assert_eq!(
        stages_started(&controller.channel().history()),
        vec![Stage::Init, Stage::Load, Stage::Create]
    );
    assert_eq!(
        scenario.database.calls(),
        vec![
            DatabaseCall::Connect {
                profile: "local".to_string()
            },
            DatabaseCall::ClearSchema,
            DatabaseCall::CreateSchema,
            DatabaseCall::Disconnect,
        ]
    );
}
