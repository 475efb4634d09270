// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Writing generated templates to `<save_dir>/<package>/<icon>.<ext>`.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::IconifyError;
use crate::icon::ResolvedIcon;

/// Destination of one generated icon.
pub fn output_path(save_dir: &Path, icon: &ResolvedIcon, extension: &str) -> PathBuf {
    save_dir
        .join(&icon.package_name)
        .join(format!("{}.{}", icon.identity.name, extension))
}

/// A catalog-supplied name must stay a single component under `save_dir`.
fn is_plain_component(part: &str) -> bool {
    !part.is_empty() && !part.contains(['/', '\\']) && !part.contains("..")
}

/// Persist `icon.rendered_template`, creating directories as needed.
///
/// Package or icon names that contain a path separator or `..` are
/// rejected before anything touches the filesystem.
pub async fn save_icon(save_dir: &Path, icon: &ResolvedIcon, extension: &str) -> Result<PathBuf, IconifyError> {
    let path = output_path(save_dir, icon, extension);
    if !is_plain_component(&icon.package_name) || !is_plain_component(&icon.identity.name) {
        return Err(IconifyError::Persist {
            path,
            source: io::Error::new(io::ErrorKind::InvalidInput, "icon name escapes the output directory"),
        });
    }
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| IconifyError::Persist {
                path: dir.to_path_buf(),
                source,
            })?;
    }

    tokio::fs::write(&path, icon.rendered_template.as_bytes())
        .await
        .map_err(|source| IconifyError::Persist {
            path: path.clone(),
            source,
        })?;

    tracing::debug!(path = %path.display(), "saved template");
    Ok(path)
}
