//! Lockfile path resolution.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ResolveError, Result};

/// Candidate `Package.resolved` locations for a project container, in priority order.
///
/// 1. The shared workspace data inside the `.xcodeproj` bundle
/// 2. The per-developer `.swiftpm` workspace next to it
pub fn lockfile_candidates(container: &Path) -> Vec<PathBuf> {
    let mut candidates = vec![
        container
            .join("project.xcworkspace")
            .join("xcshareddata")
            .join("swiftpm")
            .join("Package.resolved"),
    ];

    if let Some(parent) = container.parent() {
        candidates.push(
            parent
                .join(".swiftpm")
                .join("xcode")
                .join("package.xcworkspace")
                .join("xcshareddata")
                .join("swiftpm")
                .join("Package.resolved"),
        );
    }

    candidates
}

/// Return the first existing `Package.resolved` for `container`.
pub fn find_lockfile(container: &Path) -> Result<PathBuf> {
    let candidates = lockfile_candidates(container);

    for candidate in &candidates {
        if candidate.exists() {
            debug!(path = %candidate.display(), "Found Package.resolved");
            return Ok(candidate.clone());
        }
    }

    Err(ResolveError::LockfileNotFound {
        searched: candidates,
    })
}
