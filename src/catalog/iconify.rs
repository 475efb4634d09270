// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! HTTP client for the Iconify API.
//!
//! # Example
//!
//! ```no_run
//! use templ_iconify::catalog::{CatalogClient, IconifyClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = IconifyClient::new()?;
//! let icons = client.list_icons("mdi").await?;
//! println!("mdi has {} icons", icons.len());
//! # Ok(())
//! # }
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::IgnoredAny;
use serde::Deserialize;

use super::CatalogClient;
use crate::config::{IconifyConfig, DEFAULT_API_URL};
use crate::error::CatalogError;
use crate::icon::IconIdentity;

/// Timeout for establishing a connection (in seconds).
const CONNECTION_TIMEOUT_SECS: u64 = 10;

/// Default timeout for a whole request (in seconds).
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Response of `GET /collection?prefix=<name>`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CollectionIconsResponse {
    uncategorized: Vec<String>,
    hidden: Vec<String>,
    categories: BTreeMap<String, Vec<String>>,
}

impl CollectionIconsResponse {
    /// Union of all three groups, first occurrence wins.
    fn into_names(self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.uncategorized
            .into_iter()
            .chain(self.hidden)
            .chain(self.categories.into_values().flatten())
            .filter(|name| seen.insert(name.clone()))
            .collect()
    }
}

/// Client for the Iconify HTTP API.
#[derive(Debug, Clone)]
pub struct IconifyClient {
    /// Base URL without trailing slash.
    base_url: String,
    client: reqwest::Client,
}

impl IconifyClient {
    /// Client for the public Iconify API with default timeouts.
    pub fn new() -> Result<Self> {
        Self::with_url(DEFAULT_API_URL)
    }

    /// Client for a custom endpoint (mirrors, mock servers).
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        Self::build(url.into(), Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Client using the endpoint and timeout from `config`.
    pub fn from_config(config: &IconifyConfig) -> Result<Self> {
        Self::build(config.api_url.clone(), config.request_timeout())
    }

    fn build(url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECTION_TIMEOUT_SECS))
            .timeout(timeout)
            .user_agent(concat!("templ-iconify/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<reqwest::Response, CatalogError> {
        tracing::debug!(%url, "GET");
        self.client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    "request timed out".to_string()
                } else if e.is_connect() {
                    format!("cannot connect: {}", e)
                } else {
                    e.to_string()
                };
                CatalogError::unavailable(url, reason)
            })
    }
}

fn expect_ok(url: &str, response: &reqwest::Response) -> Result<(), CatalogError> {
    let status = response.status();
    if status != StatusCode::OK {
        tracing::debug!(%url, %status, "catalog returned non-200");
        return Err(CatalogError::unavailable(url, format!("HTTP {}", status)));
    }
    Ok(())
}

#[async_trait]
impl CatalogClient for IconifyClient {
    async fn list_collections(&self) -> Result<Vec<String>, CatalogError> {
        let url = format!("{}/collections", self.base_url);
        let response = self.get(&url, &[]).await?;
        expect_ok(&url, &response)?;

        let body: HashMap<String, IgnoredAny> = response
            .json()
            .await
            .map_err(|e| CatalogError::unavailable(&url, format!("invalid collections payload: {}", e)))?;

        let mut names: Vec<String> = body.into_keys().collect();
        names.sort();
        tracing::debug!(count = names.len(), "listed collections");
        Ok(names)
    }

    async fn list_icons(&self, collection: &str) -> Result<Vec<String>, CatalogError> {
        let url = format!("{}/collection", self.base_url);
        let response = self.get(&url, &[("prefix", collection)]).await?;
        expect_ok(&url, &response)?;

        let body: CollectionIconsResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::unavailable(&url, format!("invalid collection payload: {}", e)))?;

        let names = body.into_names();
        tracing::debug!(collection, count = names.len(), "listed icons");
        Ok(names)
    }

    async fn fetch_icon(&self, icon: &IconIdentity) -> Result<String, CatalogError> {
        let url = format!("{}/{}/{}.svg", self.base_url, icon.collection, icon.name);
        let response = self.get(&url, &[]).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CatalogError::IconNotFound {
                collection: icon.collection.clone(),
                name: icon.name.clone(),
            });
        }
        expect_ok(&url, &response)?;

        response
            .text()
            .await
            .map_err(|e| CatalogError::unavailable(&url, format!("failed to read body: {}", e)))
    }
}
