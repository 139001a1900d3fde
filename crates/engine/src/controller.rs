// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow controller and its worker loop

use crate::{EventReceiver, Gate, ProgressChannel, StageExecutor, WorkflowDeps, WorkflowError};
use cb_adapters::{DatabaseConnector, ModuleRegistry, ProfileStore};
use cb_core::{
    Advance, RunCommand, RunId, Stage, WorkflowConfig, WorkflowState,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::Instrument;

type CommandReceiver = mpsc::UnboundedReceiver<RunCommand>;

/// Create a command queue whose sender refuses commands once the run finished
pub(crate) fn command_queue() -> (CommandSender, CommandReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let sender = CommandSender {
        tx,
        finished: Arc::new(AtomicBool::new(false)),
        consent: Arc::new(Mutex::new(None)),
    };
    (sender, rx)
}

/// Fire-and-forget handle for submitting run commands
#[derive(Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<RunCommand>,
    finished: Arc<AtomicBool>,
    /// Stage allowed by the last accepted gate, until the worker picks it up
    consent: Arc<Mutex<Option<Stage>>>,
}

impl CommandSender {
    /// Enqueue a command without blocking.
    ///
    /// Returns `false` when the command was dropped because the run already
    /// finished or the worker is gone.
    pub fn submit(&self, command: RunCommand) -> bool {
        if self.is_finished() {
            tracing::debug!(stage = %command.stage, "workflow finished, dropping command");
            return false;
        }
        if self.tx.send(command).is_err() {
            tracing::debug!(stage = %command.stage, "worker stopped, dropping command");
            return false;
        }
        true
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    fn mark_finished(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }

    /// Allow `stage` to run once. Only the gate grants consent.
    pub(crate) fn grant(&self, stage: Stage) {
        *self.consent.lock().unwrap_or_else(|e| e.into_inner()) = Some(stage);
    }

    pub(crate) fn take_consent(&self) -> Option<Stage> {
        self.consent.lock().unwrap_or_else(|e| e.into_inner()).take()
    }
}

/// Outcome of a shutdown request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownStatus {
    /// The worker loop has exited
    Stopped,
    /// The worker is still finishing a stage and still owns the connection
    Running,
}

impl ShutdownStatus {
    pub fn is_stopped(self) -> bool {
        self == ShutdownStatus::Stopped
    }
}

enum WorkerSlot {
    Idle(CommandReceiver),
    Running(JoinHandle<()>),
    Stopped,
}

/// Owns the worker context and serializes stage execution.
///
/// Commands run one at a time in submission order. Stages that need no
/// decision advance on their own; gated stages wait for the [`Gate`].
pub struct WorkflowController<D, M, P> {
    run_id: RunId,
    config: WorkflowConfig,
    executor: StageExecutor<D, M, P>,
    channel: ProgressChannel,
    gate: Gate,
    sender: CommandSender,
    stop: Arc<AtomicBool>,
    worker: Mutex<WorkerSlot>,
}

impl<D, M, P> WorkflowController<D, M, P>
where
    D: DatabaseConnector,
    M: ModuleRegistry,
    P: ProfileStore,
{
    pub fn new(deps: WorkflowDeps<D, M, P>, config: WorkflowConfig) -> Self {
        let (sender, commands) = command_queue();
        Self {
            run_id: RunId::new(),
            config,
            executor: StageExecutor::new(deps),
            channel: ProgressChannel::new(),
            gate: Gate::new(sender.clone()),
            sender,
            stop: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(WorkerSlot::Idle(commands)),
        }
    }

    /// Use a fixed run identifier instead of a random one
    pub fn with_run_id(mut self, run_id: impl Into<RunId>) -> Self {
        self.run_id = run_id.into();
        self
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Subscribe to stage events, including those already published
    pub fn subscribe(&self) -> EventReceiver {
        self.channel.subscribe()
    }

    pub fn channel(&self) -> &ProgressChannel {
        &self.channel
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    pub fn sender(&self) -> CommandSender {
        self.sender.clone()
    }

    pub fn submit(&self, command: RunCommand) -> bool {
        self.sender.submit(command)
    }

    /// Start the worker loop on the current tokio runtime.
    ///
    /// Starting a running controller is a no-op.
    pub fn start(&self) -> Result<(), WorkflowError> {
        let mut slot = self.worker.lock().unwrap_or_else(|e| e.into_inner());
        let commands = match std::mem::replace(&mut *slot, WorkerSlot::Stopped) {
            WorkerSlot::Idle(commands) => commands,
            WorkerSlot::Running(handle) => {
                *slot = WorkerSlot::Running(handle);
                return Ok(());
            }
            WorkerSlot::Stopped => return Err(WorkflowError::Stopped),
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            *slot = WorkerSlot::Idle(commands);
            return Err(WorkflowError::NoRuntime);
        };

        let worker = Worker {
            run_id: self.run_id.clone(),
            poll_interval: self.config.poll_interval,
            executor: self.executor.clone(),
            channel: self.channel.clone(),
            gate: self.gate.clone(),
            commands,
            sender: self.sender.clone(),
            stop: Arc::clone(&self.stop),
            state: WorkflowState::new(),
        };
        let span = tracing::info_span!("workflow", run_id = %self.run_id);
        *slot = WorkerSlot::Running(runtime.spawn(worker.run().instrument(span)));
        tracing::info!(run_id = %self.run_id, "worker started");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        match &*self.worker.lock().unwrap_or_else(|e| e.into_inner()) {
            WorkerSlot::Running(handle) => !handle.is_finished(),
            WorkerSlot::Idle(_) | WorkerSlot::Stopped => false,
        }
    }

    /// Whether the run reached `DONE`
    pub fn is_finished(&self) -> bool {
        self.sender.is_finished()
    }

    /// Ask the worker to stop after the stage in flight and wait up to `timeout`.
    ///
    /// On [`ShutdownStatus::Running`] the worker keeps the connection and a
    /// later call can wait for it again.
    pub async fn shutdown(&self, timeout: Duration) -> ShutdownStatus {
        self.stop.store(true, Ordering::SeqCst);
        let mut handle = {
            let mut slot = self.worker.lock().unwrap_or_else(|e| e.into_inner());
            match std::mem::replace(&mut *slot, WorkerSlot::Stopped) {
                WorkerSlot::Running(handle) => handle,
                WorkerSlot::Idle(_) | WorkerSlot::Stopped => {
                    self.gate.discard();
                    self.channel.close();
                    return ShutdownStatus::Stopped;
                }
            }
        };

        match tokio::time::timeout(timeout, &mut handle).await {
            Ok(joined) => {
                if let Err(e) = joined {
                    tracing::error!(run_id = %self.run_id, error = %e, "worker task failed");
                }
                tracing::info!(run_id = %self.run_id, "shut down");
                ShutdownStatus::Stopped
            }
            Err(_) => {
                tracing::warn!(
                    run_id = %self.run_id,
                    timeout_ms = timeout.as_millis() as u64,
                    "worker still running after shutdown timeout"
                );
                *self.worker.lock().unwrap_or_else(|e| e.into_inner()) =
                    WorkerSlot::Running(handle);
                ShutdownStatus::Running
            }
        }
    }

    /// Shut down using the configured timeout
    pub async fn stop(&self) -> ShutdownStatus {
        self.shutdown(self.config.shutdown_timeout).await
    }
}

impl<D, M, P> Drop for WorkflowController<D, M, P> {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

struct Worker<D, M, P> {
    run_id: RunId,
    poll_interval: Duration,
    executor: StageExecutor<D, M, P>,
    channel: ProgressChannel,
    gate: Gate,
    commands: CommandReceiver,
    sender: CommandSender,
    stop: Arc<AtomicBool>,
    state: WorkflowState,
}

impl<D, M, P> Worker<D, M, P>
where
    D: DatabaseConnector,
    M: ModuleRegistry,
    P: ProfileStore,
{
    async fn run(mut self) {
        while !self.stop.load(Ordering::SeqCst) {
            match tokio::time::timeout(self.poll_interval, self.commands.recv()).await {
                Ok(Some(command)) => self.handle(command).await,
                Ok(None) => break,
                Err(_) => tokio::task::yield_now().await,
            }
        }
        self.wind_down().await;
    }

    async fn handle(&mut self, command: RunCommand) {
        let stage = command.stage;
        if let Some(granted) = self.sender.take_consent() {
            tracing::debug!(stage = %granted, "consent granted");
            self.state.grant(granted);
        }
        if let Err(reason) = self.state.admit(&command) {
            tracing::warn!(%stage, origin = ?command.origin, %reason, "command rejected");
            return;
        }

        self.state.begin(stage);
        match self.executor.execute(stage, &self.channel, &self.run_id).await {
            Ok(()) => match self.state.complete(stage) {
                Advance::Auto(next) => {
                    tracing::debug!(%stage, %next, "advancing");
                    self.sender.submit(RunCommand::auto(next));
                }
                Advance::Gated { .. } => {
                    tracing::debug!(%stage, "waiting for decision");
                }
                Advance::Finish => {
                    self.sender.mark_finished();
                    self.stop.store(true, Ordering::SeqCst);
                }
            },
            Err(_) => {
                self.state.fail(stage);
                tracing::warn!(%stage, "workflow halted");
            }
        }
    }

    async fn wind_down(mut self) {
        // The connection is closed on the context that opened it
        if self.state.is_connected() {
            self.executor.disconnect().await;
        }

        self.commands.close();
        let mut dropped = 0usize;
        while let Ok(command) = self.commands.try_recv() {
            tracing::debug!(stage = %command.stage, "dropping queued command");
            dropped += 1;
        }

        self.gate.discard();
        self.channel.close();
        tracing::info!(
            completed = ?self.state.completed(),
            halted = ?self.state.halted(),
            dropped,
            "worker stopped"
        );
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
