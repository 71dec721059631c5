//! `Package.swift` lookup and best-effort metadata extraction.

pub mod extract;
pub mod locate;

pub use extract::{extract_package_name, extract_targets};
pub use locate::{MANIFEST_FILE, find_manifest, find_package_dir, read_manifest};
