//! Swiftdeps Core Library
//!
//! Resolves the Swift packages pinned by an Xcode project's `Package.resolved`
//! and maps each package to the modules it exports, using the checkouts Xcode
//! keeps under DerivedData.

pub mod config;
pub mod derived_data;
pub mod error;
pub mod lockfile;
pub mod manifest;
pub mod resolver;

pub use error::{ResolveError, Result};

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::ResolverConfig;

    // Errors
    pub use crate::error::{ResolveError, Result};

    // Lockfile
    pub use crate::lockfile::{Pin, PinList};

    // Resolution
    pub use crate::resolver::{
        DependencyMap, DependencyResolver, ResolvedDependency, resolve_module_to_package,
    };
}
