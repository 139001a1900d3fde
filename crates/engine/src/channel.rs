// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress channel carrying stage events from the worker to observers

use cb_core::StageEvent;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Sender for event delivery
pub type EventSender = mpsc::UnboundedSender<StageEvent>;
/// Receiver for event delivery
pub type EventReceiver = mpsc::UnboundedReceiver<StageEvent>;

#[derive(Default)]
struct Inner {
    history: Vec<StageEvent>,
    subscribers: Vec<EventSender>,
    closed: bool,
}

/// Ordered, lossless fan-out of stage events.
///
/// Every subscriber receives every event in publish order, including the
/// events published before it subscribed. Closing the channel ends every
/// subscriber's stream once the buffered events are consumed.
#[derive(Clone, Default)]
pub struct ProgressChannel {
    inner: Arc<Mutex<Inner>>,
}

impl ProgressChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events, starting with the ones already published
    pub fn subscribe(&self) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        for event in &inner.history {
            let _ = tx.send(event.clone());
        }
        if !inner.closed {
            inner.subscribers.push(tx);
        }
        rx
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: StageEvent) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.closed {
            tracing::warn!(%event, "event published after channel closed");
            return;
        }
        tracing::debug!(%event, "publishing");

        // Dropped receivers are pruned here
        inner.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        inner.history.push(event);
    }

    /// Events published so far, in order
    pub fn history(&self) -> Vec<StageEvent> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .history
            .clone()
    }

    /// Get count of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .subscribers
            .len()
    }

    /// Stop accepting events and end every subscriber's stream
    pub fn close(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.closed = true;
        inner.subscribers.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).closed
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
