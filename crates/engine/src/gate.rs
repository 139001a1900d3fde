// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interactive gate between stages

use crate::CommandSender;
use cb_core::{Decision, PendingDecision, RunCommand, Stage};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct Slot {
    pending: Option<PendingDecision>,
    /// Stages whose decision was already raised in this run
    raised: BTreeSet<Stage>,
}

/// Holds at most one pending decision and submits the chosen command.
///
/// A decision never resolves on its own. Resolving it submits exactly one of
/// its two commands and clears the slot, so later resolves are no-ops.
/// Accepting a decision is also the only way to grant the consent that
/// CREATE and TEST need.
#[derive(Clone)]
pub struct Gate {
    slot: Arc<Mutex<Slot>>,
    commands: CommandSender,
}

impl Gate {
    pub fn new(commands: CommandSender) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            commands,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Open a decision after `stage`, replacing any unresolved one
    pub fn open(&self, stage: Stage, on_accept: Stage, on_reject: Stage) -> PendingDecision {
        let decision = PendingDecision::new(stage, on_accept, on_reject);
        raise(&mut self.lock(), decision)
    }

    /// Open the decision that follows `stage` in the workflow, if it has one.
    ///
    /// Each stage raises its decision once per run. While it is pending every
    /// caller gets the same decision back; once it was resolved or discarded
    /// this returns `None`.
    pub fn open_for(&self, stage: Stage) -> Option<PendingDecision> {
        let decision = PendingDecision::after(stage)?;
        let mut slot = self.lock();
        if let Some(pending) = slot.pending.as_ref().filter(|p| p.stage == stage) {
            return Some(pending.clone());
        }
        if slot.raised.contains(&stage) {
            tracing::debug!(%stage, "decision already raised");
            return None;
        }
        Some(raise(&mut slot, decision))
    }

    pub fn pending(&self) -> Option<PendingDecision> {
        self.lock().pending.clone()
    }

    /// Resolve the pending decision and submit the chosen command.
    ///
    /// Returns the submitted command, or `None` when nothing was pending.
    pub fn resolve(&self, decision: Decision) -> Option<RunCommand> {
        let pending = self.lock().pending.take();
        self.submit(pending, decision)
    }

    /// Resolve the pending decision only if it was raised after `stage`
    pub fn resolve_for(&self, stage: Stage, decision: Decision) -> Option<RunCommand> {
        let pending = {
            let mut slot = self.lock();
            if slot.pending.as_ref().is_some_and(|p| p.stage == stage) {
                slot.pending.take()
            } else {
                None
            }
        };
        self.submit(pending, decision)
    }

    fn submit(&self, pending: Option<PendingDecision>, decision: Decision) -> Option<RunCommand> {
        let Some(pending) = pending else {
            tracing::debug!(?decision, "no pending decision");
            return None;
        };

        let command = pending.command_for(decision);
        tracing::info!(stage = %pending.stage, ?decision, next = %command.stage, "decision resolved");
        if command.stage.requires_consent() {
            self.commands.grant(command.stage);
        }
        self.commands.submit(command);
        Some(command)
    }

    /// Drop any unresolved decision without submitting a command
    pub fn discard(&self) {
        let discarded = self.lock().pending.take();
        if let Some(pending) = discarded {
            tracing::debug!(stage = %pending.stage, "discarded unresolved decision");
        }
    }
}

fn raise(slot: &mut Slot, decision: PendingDecision) -> PendingDecision {
    slot.raised.insert(decision.stage);
    if let Some(previous) = slot.pending.replace(decision.clone()) {
        tracing::warn!(stage = %previous.stage, "replacing unresolved decision");
    }
    tracing::info!(stage = %decision.stage, prompt = decision.prompt, "awaiting decision");
    decision
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
