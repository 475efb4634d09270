// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Read-only access to a remote icon catalog.
//!
//! The catalog is two levels deep: collections, then the icon names inside
//! each collection. A third call fetches one icon's SVG markup.
//!
//! | Operation        | Request                        |
//! |------------------|--------------------------------|
//! | list collections | `GET /collections`             |
//! | list icons       | `GET /collection?prefix=<name>`|
//! | fetch icon       | `GET /<collection>/<name>.svg` |

pub mod iconify;
pub mod memory;

use async_trait::async_trait;

use crate::error::CatalogError;
use crate::icon::IconIdentity;

pub use iconify::IconifyClient;
pub use memory::InMemoryCatalog;

/// Stateless accessor to an icon catalog.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Names of every collection in the catalog.
    async fn list_collections(&self) -> Result<Vec<String>, CatalogError>;

    /// Every icon name in `collection`, deduplicated.
    async fn list_icons(&self, collection: &str) -> Result<Vec<String>, CatalogError>;

    /// Raw SVG markup of one icon.
    async fn fetch_icon(&self, icon: &IconIdentity) -> Result<String, CatalogError>;
}
