//! Checkout and manifest lookup within `SourcePackages/checkouts`.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

/// Manifest file name inside every package checkout
pub const MANIFEST_FILE: &str = "Package.swift";

/// Find the checkout directory for `identity`.
///
/// Tries the exact directory name first, then a case-insensitive scan of the
/// immediate subdirectories in name order.
pub fn find_package_dir(checkouts: &Path, identity: &str) -> Option<PathBuf> {
    if is_single_component(identity) {
        let exact = checkouts.join(identity);
        if exact.is_dir() {
            return Some(exact);
        }
    }

    let wanted = identity.to_lowercase();
    let mut subdirs: Vec<PathBuf> = fs::read_dir(checkouts)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    subdirs.sort();

    subdirs.into_iter().find(|path| {
        path.file_name()
            .is_some_and(|name| name.to_string_lossy().to_lowercase() == wanted)
    })
}

/// Find `Package.swift` for `identity`.
///
/// Only the first matching checkout directory is consulted; a checkout
/// without a manifest yields `None`.
pub fn find_manifest(checkouts: &Path, identity: &str) -> Option<PathBuf> {
    let package_dir = find_package_dir(checkouts, identity)?;
    let manifest = package_dir.join(MANIFEST_FILE);

    if manifest.is_file() {
        debug!(path = %manifest.display(), "Found Package.swift");
        Some(manifest)
    } else {
        debug!(dir = %package_dir.display(), "Package.swift not found in checkout");
        None
    }
}

/// Read manifest text, logging and swallowing any I/O failure.
///
/// Invalid UTF-8 is replaced rather than rejected; extraction only looks for
/// ASCII declarations.
pub fn read_manifest(path: &Path) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Could not read Package.swift");
            None
        }
    }
}

fn is_single_component(identity: &str) -> bool {
    let mut components = Path::new(identity).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_component_guard() {
        assert!(is_single_component("swift-log"));
        assert!(!is_single_component("../escape"));
        assert!(!is_single_component("a/b"));
        assert!(!is_single_component(""));
    }
}
