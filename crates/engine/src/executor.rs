// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage executor

use crate::ProgressChannel;
use cb_adapters::{DatabaseConnector, ModuleRegistry, ProfileStore};
use cb_core::progress::fraction;
use cb_core::{ProgressTracker, RunId, Stage, StageError, StageEvent};
use std::any::Any;
use tracing::Instrument;

/// Collaborators the workflow drives
pub struct WorkflowDeps<D, M, P> {
    pub database: D,
    pub modules: M,
    pub profiles: P,
}

/// Runs the body of one stage and reports it on the progress channel
#[derive(Clone)]
pub struct StageExecutor<D, M, P> {
    database: D,
    modules: M,
    profiles: P,
}

impl<D, M, P> StageExecutor<D, M, P>
where
    D: DatabaseConnector,
    M: ModuleRegistry,
    P: ProfileStore,
{
    pub fn new(deps: WorkflowDeps<D, M, P>) -> Self {
        Self {
            database: deps.database,
            modules: deps.modules,
            profiles: deps.profiles,
        }
    }

    /// Execute one stage to its terminal event.
    ///
    /// Emits `START`, any `PROGRESS`, then exactly one of `DONE` or `ERROR`.
    /// The body runs in its own task so a panicking collaborator surfaces as
    /// an `ERROR` instead of taking the worker down.
    pub async fn execute(
        &self,
        stage: Stage,
        channel: &ProgressChannel,
        run_id: &RunId,
    ) -> Result<(), StageError> {
        let span = tracing::info_span!("stage", run_id = %run_id, stage = %stage);
        async {
            tracing::info!("executing");
            channel.publish(StageEvent::start(stage));

            let start = std::time::Instant::now();
            let body = {
                let executor = self.clone();
                let channel = channel.clone();
                tokio::spawn(
                    async move { executor.run_body(stage, &channel).await }
                        .instrument(tracing::Span::current()),
                )
            };
            let result = match body.await {
                Ok(result) => result,
                Err(e) if e.is_panic() => Err(StageError::Panicked {
                    message: panic_message(e.into_panic()),
                }),
                Err(_) => Err(StageError::Panicked {
                    message: "stage task cancelled".to_string(),
                }),
            };
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => {
                    tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "completed");
                    channel.publish(StageEvent::done(stage));
                }
                Err(e) => {
                    tracing::error!(
                        elapsed_ms = elapsed.as_millis() as u64,
                        error = %e,
                        "failed"
                    );
                    channel.publish(StageEvent::error(stage, e.clone()));
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run_body(&self, stage: Stage, channel: &ProgressChannel) -> Result<(), StageError> {
        match stage {
            Stage::Init => {
                let profile = self.profiles.active().map_err(|e| StageError::Profile {
                    message: e.to_string(),
                })?;
                self.database.connect(&profile).await?;
                Ok(())
            }

            Stage::Load => {
                let modules = self.modules.list_modules();
                let mut tracker = ProgressTracker::new();
                for (index, module) in modules.iter().enumerate() {
                    module
                        .load_models()
                        .await
                        .map_err(|e| StageError::Load {
                            module: module.name().to_string(),
                            message: e.to_string(),
                        })?;
                    let percent = tracker.observe(fraction(index, modules.len()));
                    channel.publish(StageEvent::progress(stage, percent));
                }
                Ok(())
            }

            Stage::Create => {
                self.database.clear_schema().await?;
                channel.publish(StageEvent::progress(stage, 50));
                self.database.create_schema().await?;
                Ok(())
            }

            Stage::Test => {
                let modules = self.modules.list_modules();
                let mut tracker = ProgressTracker::new();
                for (index, module) in modules.iter().enumerate() {
                    module
                        .seed_test_data()
                        .await
                        .map_err(|e| StageError::Seed {
                            module: module.name().to_string(),
                            message: e.to_string(),
                        })?;
                    let percent = tracker.observe(fraction(index, modules.len()));
                    channel.publish(StageEvent::progress(stage, percent));
                }
                Ok(())
            }

            Stage::Done => Ok(()),
        }
    }

    /// Close the connection opened by `INIT`
    pub async fn disconnect(&self) {
        if let Err(e) = self.database.disconnect().await {
            tracing::warn!(error = %e, "failed to close database connection");
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
