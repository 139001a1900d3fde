//! Failure specs
//!
//! Verify a failing collaborator produces exactly one ERROR and halts the run.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn connect_failure_reports_only_init_events() {
    let scenario = Scenario::new(&["base"]);
    scenario
        .database
        .fail_connect(ConnectError::Connection("password rejected".to_string()));
    let controller = scenario.controller();

    let (end, script) = run(&controller, &[]).await;
    let cause = StageError::Connection {
        message: "password rejected".to_string(),
    };

    assert_eq!(end, Some(StageEvent::error(Stage::Init, cause.clone())));
    assert_eq!(
        script.events,
        vec![
            StageEvent::start(Stage::Init),
            StageEvent::error(Stage::Init, cause.clone()),
        ]
    );
    assert!(cause.is_configuration());

    // Halted: nothing else runs, not even on request
    controller.submit(RunCommand::new(Stage::Load));
    assert_eq!(controller.shutdown(SPEC_WAIT).await, ShutdownStatus::Stopped);
    assert_eq!(controller.channel().history().len(), 2);
    assert!(scenario.modules.calls().is_empty());
}

#[tokio::test]
async fn missing_backend_is_reported_with_driver() {
    let scenario = Scenario::new(&[]);
    scenario.database.fail_connect(ConnectError::BackendUnavailable {
        driver: "sqlite".to_string(),
        message: "shared library not found".to_string(),
    });
    let controller = scenario.controller();

    let (end, _) = run(&controller, &[]).await;
    let end = end.unwrap();

    assert_eq!(
        end.message(),
        "Could not connect to database! database backend unavailable for driver sqlite: shared library not found"
    );
}

#[tokio::test]
async fn no_active_profile_fails_init() {
    let scenario = Scenario {
        profiles: MemoryProfileStore::new(vec![sqlite()]),
        ..Scenario::new(&[])
    };
    let controller = scenario.controller();

    let (end, _) = run(&controller, &[]).await;

    assert_eq!(
        end.unwrap().cause(),
        Some(&StageError::Profile {
            message: "no active profile".to_string()
        })
    );
    assert!(scenario.database.calls().is_empty());
}

#[tokio::test]
async fn load_failure_stops_before_the_gate() {
    let scenario = Scenario::new(&["base", "sales", "stock"]);
    scenario.modules.get("stock").unwrap().fail_load("unknown column");
    let controller = scenario.controller();

    let (end, script) = run(&controller, &[Decision::Accept]).await;

    assert_eq!(
        trace(&script.events),
        strings(&[
            "init:start",
            "init:done",
            "load:start",
            "load:progress(0)",
            "load:progress(33)",
            "load:error"
        ])
    );
    assert_eq!(
        end.unwrap().cause(),
        Some(&StageError::Load {
            module: "stock".to_string(),
            message: "unknown column".to_string(),
        })
    );
    assert!(script.asked.is_empty());

    // The connection opened by INIT is still closed on the way out
    assert_eq!(controller.shutdown(SPEC_WAIT).await, ShutdownStatus::Stopped);
    assert_eq!(scenario.database.calls().last(), Some(&DatabaseCall::Disconnect));
}

#[tokio::test]
async fn schema_failure_during_create() {
    let scenario = Scenario::new(&["base"]);
    scenario
        .database
        .fail_schema(DatabaseOp::ClearSchema, "permission denied");
    let controller = scenario.controller();

    let (end, script) = run(&controller, &[Decision::Accept, Decision::Accept]).await;

    assert_eq!(
        end,
        Some(StageEvent::error(
            Stage::Create,
            StageError::Schema {
                message: "clearing schema failed: permission denied".to_string()
            }
        ))
    );
    assert_eq!(
        stages_started(&script.events),
        vec![Stage::Init, Stage::Load, Stage::Create]
    );
    assert!(!scenario.database.calls().contains(&DatabaseCall::CreateSchema));
}

#[tokio::test]
async fn seed_failure_during_test() {
    let scenario = Scenario::new(&["base", "sales"]);
    scenario.modules.get("base").unwrap().fail_seed("duplicate key");
    let controller = scenario.controller();

    let (end, script) = run(&controller, &[Decision::Accept, Decision::Accept]).await;

    assert_eq!(
        end.unwrap().message(),
        "Error inserting test values! failed to insert test data for module base: duplicate key"
    );
    assert!(script.events.iter().all(|e| e.stage != Stage::Done));
}
