//! Pattern-based extraction from `Package.swift` source.
//!
//! The manifest is executable Swift; this only recognizes the common
//! `Package(name: ...)` and `.target(name: ...)` declaration idioms.
//! Anything unrecognized yields an empty result, never an error.
//!
//! The package name is found by scanning the `Package(...)` arguments with
//! nesting tracked, so fields such as `platforms: [.macOS(.v13)]` may
//! precede `name:`. Nested `name:` labels (products, targets) are skipped.

use std::sync::LazyLock;

use regex::Regex;

static PACKAGE_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bPackage\s*\(").expect("package call pattern is valid"));

static NAME_ARGUMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\Aname\s*:\s*"([^"]+)""#).expect("name argument pattern is valid")
});

// `.testTarget` never matches: the dot must directly precede the kind.
static TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\.(?:target|executableTarget)\s*\(\s*name\s*:\s*"([^"]+)""#)
        .expect("target pattern is valid")
});

/// The `name:` argument of the top-level `Package(...)` declaration.
pub fn extract_package_name(content: &str) -> Option<String> {
    PACKAGE_CALL
        .find_iter(content)
        .find_map(|call| top_level_name(&content[call.end()..]))
}

/// Find a `name:` label at depth zero in call arguments (text just past `(`).
///
/// Stops at the call's closing parenthesis. String literals and comments are
/// skipped so brackets inside them do not affect nesting.
fn top_level_name(args: &str) -> Option<String> {
    let bytes = args.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => i = skip_string(bytes, i + 1),
            b'/' if bytes.get(i + 1) == Some(&b'/') => i = skip_past(bytes, i + 2, b"\n"),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_past(bytes, i + 2, b"*/"),
            b'(' | b'[' | b'{' => {
                depth += 1;
                i += 1;
            }
            b')' | b']' | b'}' => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
                i += 1;
            }
            b'n' if depth == 0 && (i == 0 || !is_identifier_byte(bytes[i - 1])) => {
                if let Some(name) = NAME_ARGUMENT.captures(&args[i..]).and_then(|c| c.get(1)) {
                    return Some(name.as_str().to_string());
                }
                i += 1;
            }
            _ => i += 1,
        }
    }

    None
}

/// Index just past the closing quote of a string whose body starts at `start`.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Index just past the next `terminator` at or after `start`.
fn skip_past(bytes: &[u8], start: usize, terminator: &[u8]) -> usize {
    bytes
        .get(start..)
        .and_then(|rest| rest.windows(terminator.len()).position(|w| w == terminator))
        .map_or(bytes.len(), |offset| start + offset + terminator.len())
}

fn is_identifier_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Names of every `.target` and `.executableTarget` declaration, in source order.
///
/// Test targets are excluded. Duplicates are kept.
pub fn extract_targets(content: &str) -> Vec<String> {
    TARGET
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
