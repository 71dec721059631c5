//! Resolver configuration.

use std::path::{Path, PathBuf};

use crate::error::{ResolveError, Result};

/// Injected settings for a [`crate::resolver::DependencyResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    derived_data_dir: PathBuf,
}

impl ResolverConfig {
    /// Create a config rooted at an explicit DerivedData directory.
    pub fn new(derived_data_dir: impl Into<PathBuf>) -> Self {
        Self {
            derived_data_dir: derived_data_dir.into(),
        }
    }

    /// Use Xcode's standard DerivedData location for the current user.
    ///
    /// # Returns
    /// `~/Library/Developer/Xcode/DerivedData`
    pub fn detect() -> Result<Self> {
        let home = dirs::home_dir().ok_or(ResolveError::HomeDirUnavailable)?;
        Ok(Self::new(default_derived_data_dir(&home)))
    }

    pub fn derived_data_dir(&self) -> &Path {
        &self.derived_data_dir
    }
}

/// Xcode's DerivedData directory beneath a home directory.
pub fn default_derived_data_dir(home: &Path) -> PathBuf {
    home.join("Library")
        .join("Developer")
        .join("Xcode")
        .join("DerivedData")
}
