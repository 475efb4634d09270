// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! templ-iconify - Iconify icons as templ components.
//!
//! Resolves `collection:name` specifiers (wildcards allowed) against the
//! Iconify catalog, then downloads every match concurrently and writes one
//! templ component per icon.
//!
//! **Specifiers** -> **Resolver** -> **DownloadCoordinator** -> `<dir>/<pkg>/<icon>.templ`
//!
//! # Core Modules
//!
//! - [`icon`] - Icon identities and specifier parsing
//! - [`catalog`] - Catalog access (Iconify HTTP API, in-memory catalog)
//! - [`resolver`] - Wildcard expansion into a sorted icon list
//! - [`template`] - SVG to templ component generation
//! - [`download`] - Bounded worker pool, persistence and progress events
//! - [`progress`] - Terminal progress rendering
//! - [`config`] - Layered runtime configuration
//! - [`error`] - Error taxonomy and formatting

pub mod catalog;
pub mod config;
pub mod download;
pub mod error;
pub mod icon;
pub mod progress;
pub mod resolver;
pub mod sync;
pub mod template;

pub use catalog::{CatalogClient, IconifyClient, InMemoryCatalog};
pub use config::IconifyConfig;
pub use download::{DownloadCoordinator, DownloadSummary, ProgressEvent, ProgressSink, RunState};
pub use error::{format_error, CatalogError, ErrorBuilder, IconifyError};
pub use icon::{IconIdentity, ResolvedIcon, Specifier};
pub use resolver::{wildcard_to_regex, Resolver};
pub use template::{GeneratedUnit, TemplateGenerator};
