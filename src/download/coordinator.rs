// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Bounded worker pool that fetches, generates and saves resolved icons.
//!
//! One producer task fills a bounded queue with the resolved icons and
//! closes it when done. `worker_count` workers share the receiving end;
//! each dequeued icon belongs to the worker that pulled it. The first
//! error flips a shared shutdown flag and is kept as the run's result.
//! Workers check the flag before every pull, so icons already in flight
//! may still finish and report, but nothing new is picked up.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;

use super::sink::ProgressSink;
use super::store;
use crate::catalog::CatalogClient;
use crate::config::IconifyConfig;
use crate::error::IconifyError;
use crate::icon::{IconIdentity, ResolvedIcon};
use crate::sync::resilient_lock;
use crate::template::TemplateGenerator;

/// Lifecycle of a single [`DownloadCoordinator::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Waiting for the observer to signal start.
    Idle,
    /// Start received, spawning the producer and workers.
    Started,
    /// Workers are draining the queue.
    Draining,
    /// Every icon was saved.
    Done,
    /// A worker failed; the run was shut down.
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Failed)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Number of icons written.
    pub saved: usize,
}

/// Runs the download pool for a resolved icon list.
pub struct DownloadCoordinator {
    catalog: Arc<dyn CatalogClient>,
    generator: TemplateGenerator,
    save_dir: Arc<PathBuf>,
    extension: Arc<str>,
    worker_count: usize,
    queue_capacity: usize,
    state: watch::Sender<RunState>,
}

impl DownloadCoordinator {
    pub fn new(catalog: Arc<dyn CatalogClient>, config: &IconifyConfig) -> Self {
        let (state, _) = watch::channel(RunState::Idle);
        Self {
            catalog,
            generator: TemplateGenerator::new(),
            save_dir: Arc::new(config.save_dir.clone()),
            extension: Arc::from(config.file_extension.as_str()),
            worker_count: config.worker_count.max(1),
            queue_capacity: config.queue_capacity.max(1),
            state,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        *self.state.borrow()
    }

    /// Receiver that observes lifecycle transitions.
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.state.subscribe()
    }

    fn transition(&self, next: RunState) {
        tracing::debug!(state = ?next, "download run state");
        self.state.send_replace(next);
    }

    /// Download every icon in `icons` and notify `sink` per saved icon.
    ///
    /// Waits for `sink` to signal start first. `sink.request_termination()`
    /// is called exactly once before returning, on success and on failure.
    pub async fn run(
        &self,
        icons: Vec<IconIdentity>,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<DownloadSummary, IconifyError> {
        self.transition(RunState::Idle);
        sink.wait_for_start().await;
        self.transition(RunState::Started);

        let total = icons.len();
        tracing::info!(icons = total, workers = self.worker_count, "starting download");

        let (queue_tx, queue_rx) = mpsc::channel::<IconIdentity>(self.queue_capacity);
        let shutdown = Arc::new(AtomicBool::new(false));

        let producer = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                for icon in icons {
                    if shutdown.load(Ordering::SeqCst) {
                        break;
                    }
                    if queue_tx.send(icon).await.is_err() {
                        // every worker has exited
                        break;
                    }
                }
                // dropping queue_tx closes the queue
            })
        };

        let worker = Worker {
            catalog: self.catalog.clone(),
            generator: self.generator,
            save_dir: self.save_dir.clone(),
            extension: self.extension.clone(),
            queue: Arc::new(tokio::sync::Mutex::new(queue_rx)),
            shutdown: shutdown.clone(),
            first_error: Arc::new(Mutex::new(None)),
            sink: sink.clone(),
        };
        let first_error = worker.first_error.clone();

        let mut workers = JoinSet::new();
        for id in 0..self.worker_count {
            workers.spawn(worker.clone().run(id));
        }
        drop(worker);
        self.transition(RunState::Draining);

        let mut saved = 0;
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(count) => saved += count,
                Err(e) => {
                    tracing::error!("download worker crashed: {}", e);
                    shutdown.store(true, Ordering::SeqCst);
                    record_first(&first_error, IconifyError::Worker(e.to_string()));
                }
            }
        }

        if let Err(e) = producer.await {
            tracing::warn!("queue producer ended abnormally: {}", e);
        }

        sink.request_termination();

        let outcome = resilient_lock(&first_error).take();
        match outcome {
            Some(err) => {
                tracing::info!(saved, total, "download failed: {}", err);
                self.transition(RunState::Failed);
                Err(err)
            }
            None => {
                tracing::info!(saved, "download complete");
                self.transition(RunState::Done);
                Ok(DownloadSummary { saved })
            }
        }
    }
}

fn record_first(slot: &Mutex<Option<IconifyError>>, err: IconifyError) {
    let mut slot = resilient_lock(slot);
    if slot.is_none() {
        *slot = Some(err);
    } else {
        tracing::debug!("suppressed later error: {}", err);
    }
}

/// State shared by every worker of one run.
#[derive(Clone)]
struct Worker {
    catalog: Arc<dyn CatalogClient>,
    generator: TemplateGenerator,
    save_dir: Arc<PathBuf>,
    extension: Arc<str>,
    queue: Arc<tokio::sync::Mutex<mpsc::Receiver<IconIdentity>>>,
    shutdown: Arc<AtomicBool>,
    first_error: Arc<Mutex<Option<IconifyError>>>,
    sink: Arc<dyn ProgressSink>,
}

impl Worker {
    /// Drain the queue until it closes or shutdown is signalled.
    /// Returns the number of icons this worker saved.
    async fn run(self, id: usize) -> usize {
        let mut saved = 0;
        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }
            let next = self.queue.lock().await.recv().await;
            let Some(identity) = next else {
                break;
            };
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }

            match self.process(&identity).await {
                Ok(path) => {
                    tracing::debug!(worker = id, icon = %identity, path = %path.display(), "icon saved");
                    self.sink.notify_saved(&identity);
                    saved += 1;
                }
                Err(err) => {
                    tracing::debug!(worker = id, icon = %identity, "icon failed: {}", err);
                    self.shutdown.store(true, Ordering::SeqCst);
                    record_first(&self.first_error, err);
                    break;
                }
            }
        }
        saved
    }

    async fn process(&self, identity: &IconIdentity) -> Result<PathBuf, IconifyError> {
        let mut icon = ResolvedIcon::new(identity.clone());
        icon.raw_body = self
            .catalog
            .fetch_icon(identity)
            .await
            .map_err(|source| IconifyError::Fetch {
                icon: identity.clone(),
                source,
            })?;

        self.generator.apply(&mut icon);
        store::save_icon(&self.save_dir, &icon, &self.extension).await
    }
}
