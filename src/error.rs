// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error taxonomy and consistent error formatting for templ-iconify.
//!
//! Every failure in resolution or download ends the whole run. The variants
//! here say which stage failed; [`IconifyError::report`] turns one into an
//! actionable message with possible causes and suggested fixes.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::icon::IconIdentity;

/// Hint appended to every formatted error.
pub const VERBOSE_HINT: &str = "Re-run with -v (or RUST_LOG=debug) for details.";

/// Failures reported by a catalog backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog answered 404 for a single icon.
    #[error("icon not found: {collection}:{name}")]
    IconNotFound { collection: String, name: String },

    /// Transport failure, timeout, non-404 status or unparseable payload.
    #[error("catalog unavailable at {url}: {reason}")]
    Unavailable { url: String, reason: String },
}

impl CatalogError {
    pub fn unavailable(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Unavailable {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

/// Errors surfaced by resolution and the download pool.
#[derive(Debug, Error)]
pub enum IconifyError {
    /// A specifier did not match `<collection>:<name>`.
    #[error("invalid icon specifier {0:?}: expected <collection>:<name>")]
    InvalidSpecifier(String),

    /// Resolution finished without a single matching icon.
    #[error("no icons found")]
    NoIconsFound,

    /// The catalog failed while listing collections or icons.
    #[error("{operation}: {source}")]
    CatalogUnavailable {
        operation: &'static str,
        #[source]
        source: CatalogError,
    },

    /// Fetching one icon body failed.
    #[error("fetch {icon}: {source}")]
    Fetch {
        icon: IconIdentity,
        #[source]
        source: CatalogError,
    },

    /// Writing a generated template to disk failed.
    #[error("save {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A download worker panicked or was aborted.
    #[error("download worker failed: {0}")]
    Worker(String),
}

impl IconifyError {
    /// Returns true for a fetch that failed because the icon does not exist.
    pub fn is_icon_not_found(&self) -> bool {
        matches!(
            self,
            IconifyError::Fetch {
                source: CatalogError::IconNotFound { .. },
                ..
            }
        )
    }

    /// Process exit code for this error (sysexits.h conventions).
    pub fn exit_code(&self) -> i32 {
        match self {
            IconifyError::InvalidSpecifier(_) => exit_codes::DATA_ERR,
            IconifyError::NoIconsFound => exit_codes::NO_INPUT,
            IconifyError::Fetch {
                source: CatalogError::IconNotFound { .. },
                ..
            } => exit_codes::NO_INPUT,
            IconifyError::CatalogUnavailable { .. } | IconifyError::Fetch { .. } => {
                exit_codes::SERVICE_UNAVAILABLE
            }
            IconifyError::Persist { .. } => exit_codes::IO_ERR,
            IconifyError::Worker(_) => exit_codes::ERROR,
        }
    }

    /// Build the user-facing report with causes and fixes.
    pub fn report(&self) -> String {
        let builder = ErrorBuilder::new(self.to_string());
        match self {
            IconifyError::InvalidSpecifier(_) => builder
                .cause("Specifier is missing the ':' separator")
                .cause("Specifier contains characters other than letters, digits, '_', '-' or '*'")
                .fix("Use the form collection:name, e.g. mdi:home")
                .fix("Quote wildcards so the shell does not expand them: \"mdi:home-*\""),
            IconifyError::NoIconsFound => builder
                .cause("Collection or icon name is misspelled")
                .cause("Pattern is anchored where a wildcard was intended")
                .fix("Browse available icons at https://icon-sets.iconify.design")
                .fix("Widen the pattern, e.g. mdi:home*"),
            IconifyError::CatalogUnavailable { .. } => builder
                .cause("No network connection")
                .cause("Iconify API is down or rate limiting")
                .cause("Wrong --api-url or TEMPL_ICONIFY_API_URL")
                .fix("Check connectivity and try again"),
            IconifyError::Fetch {
                source: CatalogError::IconNotFound { .. },
                ..
            } => builder
                .cause("Icon was removed from the collection")
                .fix("Re-run without that icon"),
            IconifyError::Fetch { .. } => builder
                .cause("Network dropped during download")
                .cause("Request timed out")
                .fix("Lower the worker count with -w")
                .fix("Try again"),
            IconifyError::Persist { .. } => builder
                .cause("Output directory is not writable")
                .cause("Disk is full")
                .fix("Choose another directory with -o"),
            IconifyError::Worker(_) => builder
                .cause("Internal error in a download task")
                .fix("Re-run with -vv and report the log"),
        }
        .build()
    }
}

/// Exit codes following sysexits.h conventions.
pub mod exit_codes {
    /// Success - operation completed successfully
    pub const SUCCESS: i32 = 0;
    /// General error - unspecified error
    pub const ERROR: i32 = 1;
    /// Usage error - invalid command line arguments
    pub const USAGE: i32 = 64;
    /// Data error - malformed specifier
    pub const DATA_ERR: i32 = 65;
    /// No input - nothing matched or an icon is missing
    pub const NO_INPUT: i32 = 66;
    /// Service unavailable - Iconify API unreachable
    pub const SERVICE_UNAVAILABLE: i32 = 69;
    /// I/O error - writing templates failed
    pub const IO_ERR: i32 = 74;
    /// Interrupted by Ctrl+C
    pub const INTERRUPTED: i32 = 130;
}

/// Formats an error message with title, causes and fixes.
///
/// # Example
///
/// ```
/// use templ_iconify::error::format_error;
///
/// let error = format_error(
///     "no icons found",
///     &["Collection name is misspelled"],
///     &["Widen the pattern, e.g. mdi:home*"],
/// );
/// assert!(error.starts_with("[✗] no icons found"));
/// ```
pub fn format_error(title: &str, causes: &[&str], fixes: &[&str]) -> String {
    let mut output = format!("[✗] {}\n\n", title);

    if !causes.is_empty() {
        output.push_str("Possible causes:\n");
        for cause in causes {
            output.push_str(&format!("  - {}\n", cause));
        }
        output.push('\n');
    }

    if !fixes.is_empty() {
        output.push_str("Try these fixes:\n");
        for (i, fix) in fixes.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, fix));
        }
        output.push('\n');
    }

    output.push_str(VERBOSE_HINT);
    output
}

/// Builder for constructing formatted error messages.
#[derive(Debug, Clone)]
pub struct ErrorBuilder {
    title: String,
    causes: Vec<String>,
    fixes: Vec<String>,
}

impl ErrorBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            causes: Vec::new(),
            fixes: Vec::new(),
        }
    }

    /// Add a possible cause.
    pub fn cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    /// Add a suggested fix.
    pub fn fix(mut self, fix: impl Into<String>) -> Self {
        self.fixes.push(fix.into());
        self
    }

    pub fn build(self) -> String {
        let causes: Vec<&str> = self.causes.iter().map(|s| s.as_str()).collect();
        let fixes: Vec<&str> = self.fixes.iter().map(|s| s.as_str()).collect();
        format_error(&self.title, &causes, &fixes)
    }
}

impl fmt::Display for ErrorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clone().build())
    }
}
