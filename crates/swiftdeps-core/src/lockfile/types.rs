//! Lockfile types for pinned packages.

use serde::Serialize;

/// Version reported when a pin records neither a release nor a revision.
pub const UNKNOWN_VERSION: &str = "unknown";

/// A single dependency entry from `Package.resolved`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pin {
    /// Lockfile-level package identity (`package` in v1, `identity` in v2+)
    pub identity: String,

    /// Repository URL or local path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_location: Option<String>,

    /// Release version, else revision hash, else [`UNKNOWN_VERSION`]
    pub resolved_version: String,

    /// Branch the pin tracks, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl Pin {
    /// Create a pin with no repository or branch metadata
    pub fn new(identity: impl Into<String>, resolved_version: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            repository_location: None,
            resolved_version: resolved_version.into(),
            branch: None,
        }
    }

    /// Set the repository location
    pub fn with_repository(mut self, location: impl Into<String>) -> Self {
        self.repository_location = Some(location.into());
        self
    }

    /// Set the tracked branch
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// The tagged release, if the resolved version is a semantic version.
    pub fn release(&self) -> Option<semver::Version> {
        parse_release(&self.resolved_version)
    }
}

/// Parse a resolved version as a tagged release.
///
/// Revision hashes and [`UNKNOWN_VERSION`] return `None`.
pub fn parse_release(version: &str) -> Option<semver::Version> {
    let raw = version.strip_prefix('v').unwrap_or(version);
    semver::Version::parse(raw).ok()
}

/// Pins in lockfile order, plus the schema version that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PinList {
    /// Top-level `version` field (absent in bare-array lockfiles)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_version: Option<u32>,

    pub pins: Vec<Pin>,
}

impl PinList {
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pin> {
        self.pins.iter()
    }
}

impl IntoIterator for PinList {
    type Item = Pin;
    type IntoIter = std::vec::IntoIter<Pin>;

    fn into_iter(self) -> Self::IntoIter {
        self.pins.into_iter()
    }
}
