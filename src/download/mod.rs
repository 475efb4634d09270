// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Concurrent icon download pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   bounded   ┌──────────┐  fetch   ┌───────────────┐
//! │ producer │───queue────▶│ worker×N │─────────▶│ CatalogClient │
//! └──────────┘             └────┬─────┘          └───────────────┘
//!                               │ generate + save
//!                               ▼
//!                       <save_dir>/<pkg>/<icon>.templ
//!                               │ Saved event
//!                               ▼
//!                        ┌──────────────┐
//!                        │ ProgressSink │
//!                        └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use templ_iconify::catalog::IconifyClient;
//! use templ_iconify::config::IconifyConfig;
//! use templ_iconify::download::{self, DownloadCoordinator};
//! use templ_iconify::icon::IconIdentity;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = IconifyConfig::default();
//! let coordinator = DownloadCoordinator::new(Arc::new(IconifyClient::from_config(&config)?), &config);
//!
//! let (sink, mut progress) = download::channel();
//! progress.start();
//! let summary = coordinator.run(vec![IconIdentity::new("mdi", "home")], Arc::new(sink)).await?;
//! println!("saved {}", summary.saved);
//! # Ok(())
//! # }
//! ```

pub mod coordinator;
pub mod sink;
pub mod store;

pub use coordinator::{DownloadCoordinator, DownloadSummary, RunState};
pub use sink::{channel, ChannelSink, ProgressEvent, ProgressReceiver, ProgressSink};
pub use store::{output_path, save_icon};
