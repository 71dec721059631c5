//! `Package.resolved` decoding.
//!
//! SwiftPM has shipped several lockfile layouts:
//! - v1: `{ "object": { "pins": [{ "package", "repositoryURL", "state" }] } }`
//! - v2/v3: `{ "pins": [{ "identity", "location", "state" }] }`
//!
//! A bare top-level pin array is accepted as well. Each layout is decoded
//! into the same [`PinList`].

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::types::{Pin, PinList, UNKNOWN_VERSION};
use crate::error::{ResolveError, Result};

/// Identity used when a pin names neither `package` nor `identity`.
const UNNAMED_PIN: &str = "Unknown";

/// Accepted top-level shapes, tried in declaration order.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLockfile {
    Pins {
        version: Option<u32>,
        pins: Vec<RawPin>,
    },
    Object {
        version: Option<u32>,
        object: RawObject,
    },
    Bare(Vec<RawPin>),
}

#[derive(Debug, Deserialize)]
struct RawObject {
    pins: Vec<RawPin>,
}

#[derive(Debug, Deserialize)]
struct RawPin {
    package: Option<String>,
    identity: Option<String>,
    #[serde(rename = "repositoryURL")]
    repository_url: Option<String>,
    location: Option<String>,
    state: Option<RawState>,
}

#[derive(Debug, Default, Deserialize)]
struct RawState {
    version: Option<String>,
    revision: Option<String>,
    branch: Option<String>,
}

impl RawPin {
    fn into_pin(self) -> Pin {
        let state = self.state.unwrap_or_default();
        let resolved_version = non_empty(state.version)
            .or_else(|| non_empty(state.revision))
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string());

        Pin {
            identity: self
                .package
                .or(self.identity)
                .unwrap_or_else(|| UNNAMED_PIN.to_string()),
            repository_location: self.repository_url.or(self.location),
            resolved_version,
            branch: non_empty(state.branch),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Decode already-loaded lockfile JSON into pins, preserving lockfile order.
///
/// Fails with [`ResolveError::UnknownFormat`] when no accepted shape matches.
pub fn parse_pins(data: Value) -> Result<PinList> {
    let raw: RawLockfile =
        serde_json::from_value(data).map_err(|_| ResolveError::UnknownFormat { path: None })?;

    let (format_version, raw_pins) = match raw {
        RawLockfile::Pins { version, pins } => (version, pins),
        RawLockfile::Object { version, object } => (version, object.pins),
        RawLockfile::Bare(pins) => (None, pins),
    };

    Ok(PinList {
        format_version,
        pins: raw_pins.into_iter().map(RawPin::into_pin).collect(),
    })
}

/// Read and decode the lockfile at `path`.
pub fn load_pins(path: &Path) -> Result<PinList> {
    let bytes = fs::read(path).map_err(|e| ResolveError::io(path, e))?;
    let data: Value = serde_json::from_slice(&bytes).map_err(|source| ResolveError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let pins = parse_pins(data).map_err(|err| match err {
        ResolveError::UnknownFormat { .. } => ResolveError::UnknownFormat {
            path: Some(path.to_path_buf()),
        },
        other => other,
    })?;

    debug!(
        count = pins.len(),
        format_version = ?pins.format_version,
        "Parsed Package.resolved"
    );
    Ok(pins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_v2_pins() {
        let data = json!({
            "pins": [{
                "identity": "swift-log",
                "kind": "remoteSourceControl",
                "location": "https://github.com/apple/swift-log.git",
                "state": { "revision": "abc123", "version": "1.5.3" }
            }],
            "version": 2
        });

        let pins = parse_pins(data).unwrap();
        assert_eq!(pins.format_version, Some(2));
        assert_eq!(
            pins.pins,
            vec![
                Pin::new("swift-log", "1.5.3")
                    .with_repository("https://github.com/apple/swift-log.git")
            ]
        );
    }

    #[test]
    fn test_v1_nested_pins() {
        let data = json!({
            "object": {
                "pins": [{
                    "package": "Alamofire",
                    "repositoryURL": "https://github.com/Alamofire/Alamofire.git",
                    "state": { "branch": null, "revision": "f96b619", "version": "5.8.0" }
                }]
            },
            "version": 1
        });

        let pins = parse_pins(data).unwrap();
        assert_eq!(pins.format_version, Some(1));
        assert_eq!(pins.pins[0].identity, "Alamofire");
        assert_eq!(pins.pins[0].resolved_version, "5.8.0");
        assert!(pins.pins[0].branch.is_none());
    }

    #[test]
    fn test_shapes_are_equivalent() {
        let pin = json!({
            "identity": "alpha",
            "location": "https://example.com/alpha.git",
            "state": { "version": "2.0.0" }
        });
        let flat = parse_pins(json!({ "pins": [pin.clone()] })).unwrap();
        let nested = parse_pins(json!({ "object": { "pins": [pin.clone()] } })).unwrap();
        let bare = parse_pins(json!([pin])).unwrap();

        assert_eq!(flat.pins, nested.pins);
        assert_eq!(flat.pins, bare.pins);
    }

    #[test]
    fn test_version_falls_back_to_revision_then_unknown() {
        let data = json!({
            "pins": [
                { "identity": "tagged", "state": { "version": "1.0.0", "revision": "aaa" } },
                { "identity": "revision", "state": { "version": null, "revision": "bbb" } },
                { "identity": "branch", "state": { "branch": "main", "revision": "" } },
                { "identity": "bare" }
            ]
        });

        let pins = parse_pins(data).unwrap();
        let versions: Vec<_> = pins.iter().map(|p| p.resolved_version.as_str()).collect();
        assert_eq!(versions, vec!["1.0.0", "bbb", "unknown", "unknown"]);
        assert_eq!(pins.pins[2].branch.as_deref(), Some("main"));
    }

    #[test]
    fn test_package_preferred_over_identity() {
        let data = json!({
            "pins": [{
                "package": "SwiftLog",
                "identity": "swift-log",
                "repositoryURL": "https://a.example/log.git",
                "location": "https://b.example/log.git"
            }]
        });

        let pins = parse_pins(data).unwrap();
        assert_eq!(pins.pins[0].identity, "SwiftLog");
        assert_eq!(
            pins.pins[0].repository_location.as_deref(),
            Some("https://a.example/log.git")
        );
    }

    #[test]
    fn test_unnamed_pin() {
        let pins = parse_pins(json!({ "pins": [{ "state": {} }] })).unwrap();
        assert_eq!(pins.pins[0].identity, "Unknown");
        assert!(pins.pins[0].repository_location.is_none());
    }

    #[test]
    fn test_lockfile_order_preserved() {
        let data = json!({
            "pins": [
                { "identity": "zeta" },
                { "identity": "alpha" },
                { "identity": "mu" }
            ]
        });

        let pins = parse_pins(data).unwrap();
        let names: Vec<_> = pins.iter().map(|p| p.identity.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mu"]);
    }

    #[test]
    fn test_unknown_format() {
        for data in [
            json!({ "dependencies": [] }),
            json!({ "object": { "packages": [] } }),
            json!("Package.resolved"),
            json!(42),
        ] {
            let err = parse_pins(data).unwrap_err();
            assert!(matches!(err, ResolveError::UnknownFormat { .. }));
        }
    }
}
