//! Dependency resolution for Xcode projects.
//!
//! Pipeline:
//! 1. Locate and parse `Package.resolved` (fatal on failure)
//! 2. Locate the DerivedData checkouts (optional)
//! 3. For each pin, read its `Package.swift` for the declared name and targets
//! 4. Assemble a [`DependencyMap`] keyed by package name

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use tracing::{debug, warn};

use crate::config::ResolverConfig;
use crate::derived_data::find_checkouts_dir;
use crate::error::Result;
use crate::lockfile::{Pin, find_lockfile, load_pins, parse_release};
use crate::manifest::{extract_package_name, extract_targets, find_manifest, read_manifest};

// =============================================================================
// Data Structures
// =============================================================================

/// Queryable metadata for one resolved package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDependency {
    /// Manifest-declared name, or the pin identity when unavailable
    #[serde(skip)]
    pub package_name: String,

    /// Version copied from the pin
    pub version: String,

    /// Repository copied from the pin
    #[serde(rename = "repo")]
    pub repository: Option<String>,

    /// Library and executable targets, alphabetically ordered
    pub exported_modules: BTreeSet<String>,
}

impl ResolvedDependency {
    /// Metadata for a pin whose manifest could not be consulted.
    pub fn from_pin(pin: &Pin) -> Self {
        Self {
            package_name: pin.identity.clone(),
            version: pin.resolved_version.clone(),
            repository: pin.repository_location.clone(),
            exported_modules: BTreeSet::new(),
        }
    }

    pub fn exports(&self, module: &str) -> bool {
        self.exported_modules.contains(module)
    }

    /// The tagged release, or `None` for revision-pinned packages.
    pub fn release(&self) -> Option<semver::Version> {
        parse_release(&self.version)
    }
}

/// Package name to metadata, in first-insertion order.
///
/// Re-inserting an existing name replaces its metadata but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyMap {
    entries: Vec<ResolvedDependency>,
    index: HashMap<String, usize>,
}

impl DependencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite by `package_name`, returning the replaced entry.
    pub fn insert(&mut self, dependency: ResolvedDependency) -> Option<ResolvedDependency> {
        match self.index.get(&dependency.package_name) {
            Some(&slot) => Some(std::mem::replace(&mut self.entries[slot], dependency)),
            None => {
                self.index
                    .insert(dependency.package_name.clone(), self.entries.len());
                self.entries.push(dependency);
                None
            }
        }
    }

    pub fn get(&self, package_name: &str) -> Option<&ResolvedDependency> {
        self.index.get(package_name).map(|&slot| &self.entries[slot])
    }

    pub fn contains(&self, package_name: &str) -> bool {
        self.index.contains_key(package_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedDependency> {
        self.entries.iter()
    }

    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|d| d.package_name.as_str())
    }

    /// Map a module or package name to its package.
    ///
    /// Package names resolve to themselves. Otherwise the first package in
    /// insertion order exporting the module wins; use
    /// [`DependencyMap::packages_exporting`] to detect ambiguity.
    pub fn resolve_module_to_package(&self, module_or_package: &str) -> Option<&str> {
        if let Some(dependency) = self.get(module_or_package) {
            return Some(dependency.package_name.as_str());
        }

        self.entries
            .iter()
            .find(|d| d.exports(module_or_package))
            .map(|d| d.package_name.as_str())
    }

    /// Every package exporting `module`, in insertion order.
    pub fn packages_exporting(&self, module: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|d| d.exports(module))
            .map(|d| d.package_name.as_str())
            .collect()
    }

    /// Modules exported by more than one package, with their owners.
    pub fn ambiguous_modules(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut owners: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for dependency in &self.entries {
            for module in &dependency.exported_modules {
                owners
                    .entry(module.as_str())
                    .or_default()
                    .push(dependency.package_name.as_str());
            }
        }
        owners.retain(|_, packages| packages.len() > 1);
        owners
    }
}

impl<'a> IntoIterator for &'a DependencyMap {
    type Item = &'a ResolvedDependency;
    type IntoIter = std::slice::Iter<'a, ResolvedDependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for DependencyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for dependency in &self.entries {
            map.serialize_entry(&dependency.package_name, dependency)?;
        }
        map.end()
    }
}

/// Free-function form of [`DependencyMap::resolve_module_to_package`].
pub fn resolve_module_to_package<'a>(
    module_or_package: &str,
    dependencies: &'a DependencyMap,
) -> Option<&'a str> {
    dependencies.resolve_module_to_package(module_or_package)
}

/// Project display name for a container path (`Foo Bar.xcodeproj` -> `Foo Bar`).
pub fn project_name_for(container: &Path) -> String {
    container
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// =============================================================================
// Resolver
// =============================================================================

/// Builds a [`DependencyMap`] from on-disk state.
///
/// Holds no state between calls; every resolution rereads the lockfile and
/// checkouts.
#[derive(Debug, Clone)]
pub struct DependencyResolver {
    config: ResolverConfig,
}

impl DependencyResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve using the container's file stem as the project name.
    pub fn resolve(&self, container: &Path) -> Result<DependencyMap> {
        self.resolve_named(container, &project_name_for(container))
    }

    /// Resolve with an explicit project display name.
    ///
    /// # Errors
    /// Only a missing, unreadable, or unrecognized `Package.resolved` is an
    /// error. A missing cache or manifest degrades to empty module lists.
    pub fn resolve_named(&self, container: &Path, project_name: &str) -> Result<DependencyMap> {
        let lockfile = find_lockfile(container)?;
        let pins = load_pins(&lockfile)?;
        debug!(count = pins.len(), "Found dependencies");

        let checkouts = self.locate_checkouts(project_name);

        let mut dependencies = DependencyMap::new();
        for pin in pins.iter() {
            let dependency = resolve_pin(pin, checkouts.as_deref());
            if let Some(previous) = dependencies.insert(dependency) {
                debug!(
                    package = %previous.package_name,
                    "Later pin overwrote package with the same declared name"
                );
            }
        }

        for (module, packages) in dependencies.ambiguous_modules() {
            warn!(
                module,
                packages = ?packages,
                "Module exported by multiple packages; lookups use the first"
            );
        }

        Ok(dependencies)
    }

    fn locate_checkouts(&self, project_name: &str) -> Option<PathBuf> {
        match find_checkouts_dir(self.config.derived_data_dir(), project_name) {
            Ok(checkouts) => Some(checkouts),
            Err(err) => {
                warn!(error = %err, "Will not be able to extract module information");
                None
            }
        }
    }
}

fn resolve_pin(pin: &Pin, checkouts: Option<&Path>) -> ResolvedDependency {
    debug!(identity = %pin.identity, "Processing package");
    let mut dependency = ResolvedDependency::from_pin(pin);

    let Some(content) = checkouts
        .and_then(|dir| find_manifest(dir, &pin.identity))
        .and_then(|manifest| read_manifest(&manifest))
    else {
        return dependency;
    };

    if let Some(name) = extract_package_name(&content) {
        debug!(package = %name, "Package name");
        dependency.package_name = name;
    }
    dependency.exported_modules = extract_targets(&content).into_iter().collect();
    dependency
}
