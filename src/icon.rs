// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Icon identities, user specifiers and per-download icon state.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::IconifyError;

/// `<collection>:<name>`, each side made of ASCII letters, digits, `_`, `-` and `*`.
static SPECIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_\-\*]+):([A-Za-z0-9_\-\*]+)$").expect("valid specifier regex")
});

/// Unique `(collection, name)` pair for one icon in the catalog.
///
/// Ordering and equality follow the `collection:name` string, so
/// `"a-b:x"` sorts before `"a:x"` (`-` < `:`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconIdentity {
    pub collection: String,
    pub name: String,
}

impl IconIdentity {
    pub fn new(collection: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            name: name.into(),
        }
    }

    /// The `collection:name` key used for sorting and display.
    pub fn key(&self) -> String {
        format!("{}:{}", self.collection, self.name)
    }
}

impl Ord for IconIdentity {
    fn cmp(&self, other: &Self) -> Ordering {
        // Byte-wise comparison of "collection:name" without allocating.
        let lhs = self.collection.bytes().chain(std::iter::once(b':')).chain(self.name.bytes());
        let rhs = other.collection.bytes().chain(std::iter::once(b':')).chain(other.name.bytes());
        lhs.cmp(rhs)
    }
}

impl PartialOrd for IconIdentity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for IconIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.collection, self.name)
    }
}

/// A parsed user specifier. Either half may contain `*` wildcards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    pub collection_pattern: String,
    pub name_pattern: String,
}

impl Specifier {
    /// Returns true if neither half contains a wildcard.
    pub fn is_exact(&self) -> bool {
        !self.collection_pattern.contains('*') && !self.name_pattern.contains('*')
    }
}

impl FromStr for Specifier {
    type Err = IconifyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let caps = SPECIFIER_RE
            .captures(raw)
            .ok_or_else(|| IconifyError::InvalidSpecifier(raw.to_string()))?;
        Ok(Self {
            collection_pattern: caps[1].to_string(),
            name_pattern: caps[2].to_string(),
        })
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.collection_pattern, self.name_pattern)
    }
}

/// An icon being processed by a download worker.
///
/// Created with the identity only; the worker that dequeued it fills in the
/// remaining fields and drops it once the file is written.
#[derive(Debug, Clone)]
pub struct ResolvedIcon {
    pub identity: IconIdentity,
    pub raw_body: String,
    pub package_name: String,
    pub component_name: String,
    pub rendered_template: String,
}

impl ResolvedIcon {
    pub fn new(identity: IconIdentity) -> Self {
        Self {
            identity,
            raw_body: String::new(),
            package_name: String::new(),
            component_name: String::new(),
            rendered_template: String::new(),
        }
    }
}
