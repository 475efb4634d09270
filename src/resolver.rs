// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Expansion of user specifiers into concrete icon identities.
//!
//! A specifier such as `mdi:home-*` is split into a collection pattern and a
//! name pattern. Each pattern becomes a regular expression: literal segments
//! are escaped, `*` becomes `.*`, and the ends are anchored unless the user
//! put a `*` there. So `home-*` matches `home-outline` but not `home`, and
//! `*` alone matches everything.
//!
//! The result is the union across all specifiers, deduplicated and sorted by
//! `collection:name`. Specifiers that match nothing contribute nothing; only
//! a completely empty result is an error.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use regex::Regex;

use crate::catalog::CatalogClient;
use crate::error::IconifyError;
use crate::icon::{IconIdentity, Specifier};

/// Translate a `*` wildcard pattern into a regular expression string.
///
/// ```
/// use templ_iconify::resolver::wildcard_to_regex;
///
/// assert_eq!(wildcard_to_regex("home"), "^home$");
/// assert_eq!(wildcard_to_regex("home*"), "^home.*");
/// assert_eq!(wildcard_to_regex("*"), ".*");
/// ```
pub fn wildcard_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    if !pattern.starts_with('*') {
        out.push('^');
    }
    for (i, part) in pattern.split('*').enumerate() {
        if i > 0 {
            out.push_str(".*");
        }
        out.push_str(&regex::escape(part));
    }
    if !pattern.ends_with('*') {
        out.push('$');
    }
    out
}

/// A compiled wildcard pattern.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    source: String,
    regex: Regex,
}

impl WildcardPattern {
    pub fn new(pattern: &str) -> Result<Self, IconifyError> {
        let regex = Regex::new(&wildcard_to_regex(pattern))
            .map_err(|_| IconifyError::InvalidSpecifier(pattern.to_string()))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Both halves of a specifier, compiled.
struct CompiledSpecifier {
    raw: Specifier,
    collection: WildcardPattern,
    name: WildcardPattern,
}

impl CompiledSpecifier {
    fn parse(raw: &str) -> Result<Self, IconifyError> {
        let spec: Specifier = raw.parse()?;
        Ok(Self {
            collection: WildcardPattern::new(&spec.collection_pattern)?,
            name: WildcardPattern::new(&spec.name_pattern)?,
            raw: spec,
        })
    }
}

/// Resolves specifiers against a catalog.
///
/// Within one [`Resolver::resolve`] call the collection list and each
/// collection's icon list are fetched at most once, however many
/// specifiers touch them.
#[derive(Clone)]
pub struct Resolver {
    catalog: Arc<dyn CatalogClient>,
}

impl Resolver {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self { catalog }
    }

    /// Expand `specifiers` into a sorted, deduplicated, non-empty icon list.
    ///
    /// Every specifier is validated before the catalog is contacted, so a
    /// single malformed one fails the call without partial results.
    pub async fn resolve<S: AsRef<str>>(&self, specifiers: &[S]) -> Result<Vec<IconIdentity>, IconifyError> {
        let compiled = specifiers
            .iter()
            .map(|s| CompiledSpecifier::parse(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut collections: Option<Vec<String>> = None;
        let mut icon_lists: HashMap<String, Vec<String>> = HashMap::new();
        let mut found = BTreeSet::new();

        for spec in &compiled {
            if collections.is_none() {
                let names = self.catalog.list_collections().await.map_err(|source| {
                    IconifyError::CatalogUnavailable {
                        operation: "list collections",
                        source,
                    }
                })?;
                collections = Some(names);
            }
            let matching: Vec<&String> = collections
                .iter()
                .flatten()
                .filter(|c| spec.collection.is_match(c))
                .collect();

            tracing::debug!(
                specifier = %spec.raw,
                collections = matching.len(),
                "matched collections"
            );

            let before = found.len();
            for collection in matching {
                if !icon_lists.contains_key(collection) {
                    let icons = self.catalog.list_icons(collection).await.map_err(|source| {
                        IconifyError::CatalogUnavailable {
                            operation: "list icons",
                            source,
                        }
                    })?;
                    icon_lists.insert(collection.clone(), icons);
                }

                let icons = icon_lists.get(collection).map(Vec::as_slice).unwrap_or_default();
                found.extend(
                    icons
                        .iter()
                        .filter(|name| spec.name.is_match(name))
                        .map(|name| IconIdentity::new(collection.as_str(), name.as_str())),
                );
            }

            if found.len() == before {
                tracing::debug!(specifier = %spec.raw, "specifier matched no new icons");
            }
        }

        if found.is_empty() {
            return Err(IconifyError::NoIconsFound);
        }

        tracing::info!(specifiers = compiled.len(), icons = found.len(), "resolved icons");
        Ok(found.into_iter().collect())
    }
}
