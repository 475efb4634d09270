// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Progress observer contract and a channel-backed implementation.
//!
//! Workers never read observer state. They push immutable events into a
//! channel and the observer counts them at its own pace.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::icon::IconIdentity;
use crate::sync::resilient_lock;

/// Events delivered to a progress observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// One icon was fetched, generated and written.
    Saved(IconIdentity),
    /// The run is over (success or failure); the observer should exit.
    Terminate,
}

/// What the download coordinator needs from a progress observer.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// Resolves once the observer is ready for work to begin.
    async fn wait_for_start(&self);

    /// Called once per completed icon. Must not block.
    fn notify_saved(&self, icon: &IconIdentity);

    /// Called exactly once after all processing ends.
    fn request_termination(&self);
}

/// Coordinator-side half of a progress channel.
#[derive(Debug)]
pub struct ChannelSink {
    start_rx: Mutex<Option<oneshot::Receiver<()>>>,
    events: mpsc::UnboundedSender<ProgressEvent>,
}

/// Observer-side half of a progress channel.
#[derive(Debug)]
pub struct ProgressReceiver {
    start_tx: Option<oneshot::Sender<()>>,
    events: mpsc::UnboundedReceiver<ProgressEvent>,
}

/// Create a connected sink/receiver pair.
pub fn channel() -> (ChannelSink, ProgressReceiver) {
    let (start_tx, start_rx) = oneshot::channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    (
        ChannelSink {
            start_rx: Mutex::new(Some(start_rx)),
            events: events_tx,
        },
        ProgressReceiver {
            start_tx: Some(start_tx),
            events: events_rx,
        },
    )
}

#[async_trait]
impl ProgressSink for ChannelSink {
    async fn wait_for_start(&self) {
        let start_rx = resilient_lock(&self.start_rx).take();
        if let Some(rx) = start_rx {
            if rx.await.is_err() {
                // Observer went away without signalling; run unobserved.
                tracing::debug!("progress observer dropped before start");
            }
        }
    }

    fn notify_saved(&self, icon: &IconIdentity) {
        let _ = self.events.send(ProgressEvent::Saved(icon.clone()));
    }

    fn request_termination(&self) {
        let _ = self.events.send(ProgressEvent::Terminate);
    }
}

impl ProgressReceiver {
    /// Tell the coordinator to begin. Later calls are no-ops.
    pub fn start(&mut self) {
        if let Some(tx) = self.start_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Next event, or `None` once the sink is dropped and drained.
    pub async fn recv(&mut self) -> Option<ProgressEvent> {
        self.events.recv().await
    }
}
