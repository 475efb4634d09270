// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! In-process catalog backed by a map, for offline runs and tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use super::CatalogClient;
use crate::error::CatalogError;
use crate::icon::IconIdentity;

const MEMORY_URL: &str = "memory://catalog";

/// A catalog held entirely in memory.
///
/// Icons registered with [`InMemoryCatalog::with_missing_icon`] are listed
/// in their collection but answer "not found" when fetched, like a catalog
/// whose index is ahead of its storage.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    /// collection -> icon name -> body (`None` = listed but missing)
    collections: BTreeMap<String, BTreeMap<String, Option<String>>>,
    offline: AtomicBool,
    list_requests: AtomicUsize,
    fetch_requests: AtomicUsize,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_icon(mut self, collection: &str, name: &str, body: impl Into<String>) -> Self {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(name.to_string(), Some(body.into()));
        self
    }

    pub fn with_missing_icon(mut self, collection: &str, name: &str) -> Self {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(name.to_string(), None);
        self
    }

    /// Make every subsequent call fail as unavailable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of collection and icon listing calls served so far.
    pub fn list_requests(&self) -> usize {
        self.list_requests.load(Ordering::SeqCst)
    }

    /// Number of icon fetches served so far.
    pub fn fetch_requests(&self) -> usize {
        self.fetch_requests.load(Ordering::SeqCst)
    }

    fn check_online(&self, path: &str) -> Result<(), CatalogError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CatalogError::unavailable(format!("{}{}", MEMORY_URL, path), "catalog offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogClient for InMemoryCatalog {
    async fn list_collections(&self) -> Result<Vec<String>, CatalogError> {
        self.list_requests.fetch_add(1, Ordering::SeqCst);
        self.check_online("/collections")?;
        Ok(self.collections.keys().cloned().collect())
    }

    async fn list_icons(&self, collection: &str) -> Result<Vec<String>, CatalogError> {
        self.list_requests.fetch_add(1, Ordering::SeqCst);
        self.check_online("/collection")?;
        // Iconify answers an unknown prefix with 404.
        let icons = self.collections.get(collection).ok_or_else(|| {
            CatalogError::unavailable(format!("{}/collection?prefix={}", MEMORY_URL, collection), "HTTP 404 Not Found")
        })?;
        Ok(icons.keys().cloned().collect())
    }

    async fn fetch_icon(&self, icon: &IconIdentity) -> Result<String, CatalogError> {
        self.fetch_requests.fetch_add(1, Ordering::SeqCst);
        self.check_online(&format!("/{}/{}.svg", icon.collection, icon.name))?;
        self.collections
            .get(&icon.collection)
            .and_then(|icons| icons.get(&icon.name))
            .and_then(Clone::clone)
            .ok_or_else(|| CatalogError::IconNotFound {
                collection: icon.collection.clone(),
                name: icon.name.clone(),
            })
    }
}
