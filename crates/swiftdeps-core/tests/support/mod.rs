//! Synthetic Xcode project and DerivedData trees for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

pub const PROJECT_NAME: &str = "Demo";

pub struct Fixture {
    pub temp: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let fixture = Self {
            temp: TempDir::new().unwrap(),
        };
        fs::create_dir_all(fixture.container()).unwrap();
        fixture
    }

    pub fn container(&self) -> PathBuf {
        self.temp
            .path()
            .join("project")
            .join(format!("{PROJECT_NAME}.xcodeproj"))
    }

    pub fn derived_data(&self) -> PathBuf {
        self.temp.path().join("DerivedData")
    }

    /// Write `Package.resolved` into the shared workspace data.
    pub fn write_lockfile(&self, data: &Value) -> PathBuf {
        let path = self
            .container()
            .join("project.xcworkspace/xcshareddata/swiftpm/Package.resolved");
        write_json(&path, data);
        path
    }

    /// Write `Package.resolved` into the per-developer `.swiftpm` workspace.
    pub fn write_local_lockfile(&self, data: &Value) -> PathBuf {
        let path = self
            .temp
            .path()
            .join("project/.swiftpm/xcode/package.xcworkspace/xcshareddata/swiftpm/Package.resolved");
        write_json(&path, data);
        path
    }

    /// Create `DerivedData/<dir_name>/SourcePackages/checkouts`.
    pub fn checkouts(&self, dir_name: &str) -> PathBuf {
        let path = self
            .derived_data()
            .join(dir_name)
            .join("SourcePackages")
            .join("checkouts");
        fs::create_dir_all(&path).unwrap();
        path
    }
}

pub fn write_json(path: &Path, data: &Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_vec_pretty(data).unwrap()).unwrap();
}

pub fn write_manifest(checkouts: &Path, dir_name: &str, content: &str) -> PathBuf {
    let dir = checkouts.join(dir_name);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("Package.swift");
    fs::write(&path, content).unwrap();
    path
}

/// A `Package.swift` declaring `name` with `(kind, target)` declarations.
pub fn manifest(name: &str, targets: &[(&str, &str)]) -> String {
    let targets = targets
        .iter()
        .map(|(kind, target)| format!("        .{kind}(\n            name: \"{target}\",\n            dependencies: []\n        ),"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "// swift-tools-version:5.9\nimport PackageDescription\n\nlet package = Package(\n    name: \"{name}\",\n    targets: [\n{targets}\n    ]\n)\n"
    )
}

/// v2 lockfile pinning `alpha` to a release and `beta` to a revision.
pub fn alpha_beta_lockfile() -> Value {
    json!({
        "pins": [
            {
                "identity": "alpha",
                "kind": "remoteSourceControl",
                "location": "https://github.com/example/alpha.git",
                "state": { "revision": "1111111", "version": "1.2.0" }
            },
            {
                "identity": "beta",
                "kind": "remoteSourceControl",
                "location": "https://github.com/example/beta.git",
                "state": { "branch": "main", "revision": "2222222" }
            }
        ],
        "version": 2
    })
}
