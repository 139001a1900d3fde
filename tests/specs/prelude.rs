//! Shared helpers for workflow specs

#![allow(dead_code)]

pub use cb_adapters::{
    ConnectError, DatabaseCall, DatabaseOp, FakeDatabase, FakeModuleRegistry, MemoryProfileStore,
    ModuleHook, ProfileStore,
};
pub use cb_core::{
    ConnectionSettings, Decision, Driver, DriverField, Phase, Profile, RunCommand,
    SettingField, Stage, StageError, StageEvent, WorkflowConfig,
};
pub use cb_engine::{
    observe, EventReceiver, Observer, ShutdownStatus, WorkflowController, WorkflowDeps,
};
pub use std::time::Duration;

use cb_core::PendingDecision;
use std::collections::VecDeque;

/// Upper bound for anything a spec waits on
pub const SPEC_WAIT: Duration = Duration::from_secs(5);

pub type Controller = WorkflowController<FakeDatabase, FakeModuleRegistry, MemoryProfileStore>;

/// Fake collaborators for one run
pub struct Scenario {
    pub database: FakeDatabase,
    pub modules: FakeModuleRegistry,
    pub profiles: MemoryProfileStore,
}

impl Scenario {
    /// A scenario with an active SQLite profile and the given modules
    pub fn new(modules: &[&str]) -> Self {
        let profiles = MemoryProfileStore::new(vec![sqlite()])
            .with_profile(Profile::new("local", "sqlite"));
        profiles.activate("local").unwrap();
        Self {
            database: FakeDatabase::new(),
            modules: FakeModuleRegistry::with_modules(modules),
            profiles,
        }
    }

    pub fn controller(&self) -> Controller {
        WorkflowController::new(
            WorkflowDeps {
                database: self.database.clone(),
                modules: self.modules.clone(),
                profiles: self.profiles.clone(),
            },
            config(),
        )
        .with_run_id("spec")
    }
}

pub fn sqlite() -> Driver {
    Driver::new("sqlite", "SQLite").with_field(
        DriverField::required(SettingField::Database, "File").with_default("coinbox.db"),
    )
}

pub fn config() -> WorkflowConfig {
    WorkflowConfig::default().with_poll_interval(Duration::from_millis(5))
}

/// Observer that answers gates from a script and records what it saw
#[derive(Default)]
pub struct Script {
    pub events: Vec<StageEvent>,
    pub asked: Vec<Stage>,
    answers: VecDeque<Decision>,
}

impl Script {
    pub fn answering(answers: &[Decision]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            ..Default::default()
        }
    }
}

impl Observer for Script {
    fn on_event(&mut self, event: &StageEvent) {
        self.events.push(event.clone());
    }

    fn decide(&mut self, decision: &PendingDecision) -> Option<Decision> {
        self.asked.push(decision.stage);
        self.answers.pop_front()
    }
}

/// Start `controller`, submit INIT and observe until the run ends
pub async fn run<D, M, P>(
    controller: &WorkflowController<D, M, P>,
    answers: &[Decision],
) -> (Option<StageEvent>, Script)
where
    D: cb_adapters::DatabaseConnector,
    M: cb_adapters::ModuleRegistry,
    P: ProfileStore,
{
    let mut rx = controller.subscribe();
    controller.start().unwrap();
    assert!(controller.submit(RunCommand::new(Stage::Init)));

    let mut script = Script::answering(answers);
    let end = tokio::time::timeout(SPEC_WAIT, observe(&mut rx, controller.gate(), &mut script))
        .await
        .unwrap();
    (end, script)
}

/// Wait for a specific event, returning everything seen up to and including it
pub async fn wait_for(rx: &mut EventReceiver, target: &StageEvent) -> Vec<StageEvent> {
    let mut seen = Vec::new();
    loop {
        let event = tokio::time::timeout(SPEC_WAIT, rx.recv())
            .await
            .unwrap()
            .unwrap_or_else(|| panic!("channel closed before {target}"));
        seen.push(event.clone());
        if &event == target {
            return seen;
        }
    }
}

/// Render events the way they read in a log: `load:progress(33)`
pub fn trace(events: &[StageEvent]) -> Vec<String> {
    events.iter().map(ToString::to_string).collect()
}

pub fn stages_started(events: &[StageEvent]) -> Vec<Stage> {
    events
        .iter()
        .filter(|e| e.phase == Phase::Start)
        .map(|e| e.stage)
        .collect()
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
