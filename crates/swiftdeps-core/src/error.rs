//! Error types for dependency resolution.

use std::path::PathBuf;

/// Errors surfaced while resolving a project's dependencies.
///
/// Only a missing or unreadable lockfile aborts a resolution. The cache
/// variants are reported by the locators but absorbed by the resolver.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Could not find Package.resolved (searched: {})", display_paths(.searched))]
    LockfileNotFound { searched: Vec<PathBuf> },

    #[error("DerivedData directory not found at {}", .0.display())]
    DerivedDataNotFound(PathBuf),

    #[error("No DerivedData directory found for project '{project}' in {}", .root.display())]
    NoProjectCache { project: String, root: PathBuf },

    #[error("SourcePackages/checkouts not found in {}", .0.display())]
    CheckoutsNotFound(PathBuf),

    #[error("Unknown Package.resolved format{}", display_origin(.path.as_deref()))]
    UnknownFormat { path: Option<PathBuf> },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot determine home directory")]
    HomeDirUnavailable,
}

impl ResolveError {
    /// True for every "something is not on disk" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::LockfileNotFound { .. }
                | Self::DerivedDataNotFound(_)
                | Self::NoProjectCache { .. }
                | Self::CheckoutsNotFound(_)
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn display_origin(path: Option<&std::path::Path>) -> String {
    path.map(|p| format!(": {}", p.display())).unwrap_or_default()
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, ResolveError>;
