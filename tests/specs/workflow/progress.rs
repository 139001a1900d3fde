//! Progress specs
//!
//! Verify PROGRESS values stay ordered and bounded.

use crate::prelude::*;
use cb_core::progress::overall;
use similar_asserts::assert_eq;

fn progress_by_stage(events: &[StageEvent]) -> Vec<(Stage, Vec<u8>)> {
    Stage::ALL
        .iter()
        .map(|stage| {
            let values = events
                .iter()
                .filter(|e| e.stage == *stage)
                .filter_map(StageEvent::percent)
                .collect();
            (*stage, values)
        })
        .collect()
}

#[tokio::test]
async fn progress_is_non_decreasing_and_bounded() {
    let names = ["a", "b", "c", "d", "e", "f", "g"];
    let scenario = Scenario::new(&names);
    let controller = scenario.controller();

    let (_, script) = run(&controller, &[Decision::Accept, Decision::Accept]).await;

    for (stage, values) in progress_by_stage(&script.events) {
        assert!(
            values.windows(2).all(|w| w[0] <= w[1]),
            "{stage} progress decreased: {values:?}"
        );
        assert!(values.iter().all(|v| *v <= 100), "{stage}: {values:?}");
    }
}

#[tokio::test]
async fn three_modules_report_thirds() {
    let scenario = Scenario::new(&["base", "sales", "stock"]);
    let controller = scenario.controller();

    let (_, script) = run(&controller, &[Decision::Accept, Decision::Accept]).await;
    let progress = progress_by_stage(&script.events);

    assert_eq!(
        progress,
        vec![
            (Stage::Init, vec![]),
            (Stage::Load, vec![0, 33, 67]),
            (Stage::Create, vec![50]),
            (Stage::Test, vec![0, 33, 67]),
            (Stage::Done, vec![]),
        ]
    );
}

#[tokio::test]
async fn no_modules_means_no_progress() {
    let scenario = Scenario::new(&[]);
    let controller = scenario.controller();

    let (end, script) = run(&controller, &[Decision::Accept, Decision::Accept]).await;

    assert_eq!(end, Some(StageEvent::done(Stage::Done)));
    let load: Vec<_> = script
        .events
        .iter()
        .filter(|e| e.stage == Stage::Load)
        .cloned()
        .collect();
    assert_eq!(
        load,
        vec![StageEvent::start(Stage::Load), StageEvent::done(Stage::Load)]
    );
}

#[test]
fn overall_bar_spans_all_stages() {
    let bar: Vec<u8> = vec![
        overall(Stage::Init, 0),
        overall(Stage::Load, 33),
        overall(Stage::Create, 50),
        overall(Stage::Test, 100),
        overall(Stage::Done, 100),
    ];
    assert_eq!(bar, vec![0, 26, 50, 80, 100]);
}
