//! Module ordering specs
//!
//! Verify modules load in dependency order through traced collaborators.

use crate::prelude::*;
use cb_adapters::{OrderedModuleRegistry, TracedDatabaseConnector, TracedModuleRegistry};
use similar_asserts::assert_eq;

#[tokio::test]
async fn dependencies_load_and_seed_first() {
    let fakes = FakeModuleRegistry::new();
    fakes.add_with_dependencies("sales", &["customers", "stock"]);
    fakes.add_with_dependencies("customers", &["base"]);
    fakes.add_with_dependencies("stock", &["base"]);
    fakes.add("base");
    let ordered = OrderedModuleRegistry::new(cb_adapters::ModuleRegistry::list_modules(&fakes))
        .unwrap();

    let scenario = Scenario::new(&[]);
    let controller = WorkflowController::new(
        WorkflowDeps {
            database: TracedDatabaseConnector::new(scenario.database.clone()),
            modules: TracedModuleRegistry::new(ordered),
            profiles: scenario.profiles.clone(),
        },
        config(),
    );

    let (end, _) = run(&controller, &[Decision::Accept, Decision::Accept]).await;
    assert_eq!(end, Some(StageEvent::done(Stage::Done)));

    let loaded: Vec<String> = fakes
        .calls()
        .into_iter()
        .filter(|c| c.hook == ModuleHook::LoadModels)
        .map(|c| c.module)
        .collect();
    assert_eq!(loaded, strings(&["base", "customers", "stock", "sales"]));

    let seeded: Vec<String> = fakes
        .calls()
        .into_iter()
        .filter(|c| c.hook == ModuleHook::SeedTestData)
        .map(|c| c.module)
        .collect();
    assert_eq!(seeded, loaded);
}

#[test]
fn cyclic_modules_are_rejected_before_any_run() {
    let fakes = FakeModuleRegistry::new();
    fakes.add_with_dependencies("sales", &["stock"]);
    fakes.add_with_dependencies("stock", &["sales"]);

    let err = OrderedModuleRegistry::new(cb_adapters::ModuleRegistry::list_modules(&fakes))
        .err()
        .unwrap();
    assert_eq!(
        err.to_string(),
        "dependency cycle between modules: sales, stock"
    );
}
