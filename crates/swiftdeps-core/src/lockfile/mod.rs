//! `Package.resolved` discovery and parsing.
//!
//! Normalizes the lockfile schema versions SwiftPM has written over time
//! into a single ordered list of pins.

pub mod locate;
pub mod parse;
pub mod types;

pub use locate::{find_lockfile, lockfile_candidates};
pub use parse::{load_pins, parse_pins};
pub use types::{Pin, PinList, UNKNOWN_VERSION, parse_release};
