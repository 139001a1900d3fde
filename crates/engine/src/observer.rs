// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observer interface for rendering progress and answering gates

use crate::{EventReceiver, Gate};
use cb_core::{Decision, PendingDecision, Phase, StageEvent};

/// Consumer of stage events, typically a user interface
pub trait Observer {
    /// Called for every event, in order
    fn on_event(&mut self, event: &StageEvent);

    /// Answer a gate right away, or return `None` to leave it pending for a
    /// later [`Gate::resolve`]
    fn decide(&mut self, decision: &PendingDecision) -> Option<Decision> {
        let _ = decision;
        None
    }
}

/// Feed events to `observer` until the run ends.
///
/// Opens the gate whenever a gated stage finishes. Several observers may
/// watch one run; each decision is answered at most once. Returns the event
/// that ended the run (the final `DONE` or an `ERROR`), or `None` if the
/// channel closed first.
pub async fn observe<O: Observer>(
    events: &mut EventReceiver,
    gate: &Gate,
    observer: &mut O,
) -> Option<StageEvent> {
    while let Some(event) = events.recv().await {
        observer.on_event(&event);
        if event.is_final() || event.cause().is_some() {
            return Some(event);
        }
        if event.phase != Phase::Done {
            continue;
        }
        if let Some(pending) = gate.open_for(event.stage) {
            if let Some(decision) = observer.decide(&pending) {
                gate.resolve_for(pending.stage, decision);
            }
        }
    }
    None
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod tests;
