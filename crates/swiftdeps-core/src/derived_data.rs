//! DerivedData discovery.
//!
//! Xcode materializes package checkouts under
//! `<DerivedData>/<Project_Name>-<hash>/SourcePackages/checkouts`. A project
//! may own several hashed directories; the most recently modified one wins.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::error::{ResolveError, Result};

/// Apply Xcode's DerivedData naming (spaces become underscores).
pub fn normalize_project_name(project_name: &str) -> String {
    project_name.replace(' ', "_")
}

/// Find the most recently modified `<normalized>-*` directory under `derived_data_root`.
///
/// Equal modification times fall back to the lexically greatest path.
pub fn find_project_cache(derived_data_root: &Path, project_name: &str) -> Result<PathBuf> {
    if !derived_data_root.is_dir() {
        return Err(ResolveError::DerivedDataNotFound(
            derived_data_root.to_path_buf(),
        ));
    }

    let prefix = format!("{}-", normalize_project_name(project_name));
    let entries =
        fs::read_dir(derived_data_root).map_err(|e| ResolveError::io(derived_data_root, e))?;

    let newest = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(&prefix))
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .map(|path| (modified_time(&path), path))
        .max_by(|(a_time, a_path), (b_time, b_path)| {
            a_time.cmp(b_time).then_with(|| a_path.cmp(b_path))
        });

    match newest {
        Some((_, path)) => {
            debug!(path = %path.display(), "Selected DerivedData directory");
            Ok(path)
        }
        None => Err(ResolveError::NoProjectCache {
            project: project_name.to_string(),
            root: derived_data_root.to_path_buf(),
        }),
    }
}

/// Locate `SourcePackages/checkouts` for `project_name`.
///
/// Distinguishes a missing DerivedData root, a project that was never built,
/// and a build directory that never fetched packages.
pub fn find_checkouts_dir(derived_data_root: &Path, project_name: &str) -> Result<PathBuf> {
    let project_cache = find_project_cache(derived_data_root, project_name)?;
    let checkouts = project_cache.join("SourcePackages").join("checkouts");

    if !checkouts.is_dir() {
        return Err(ResolveError::CheckoutsNotFound(project_cache));
    }

    debug!(path = %checkouts.display(), "Found package checkouts");
    Ok(checkouts)
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
