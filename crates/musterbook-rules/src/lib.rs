//! Roster legality checks.
//!
//! The engine evaluates every rule category against a roster and its faction
//! catalog and returns the violations as data; only an unknown faction is an
//! error.

pub mod engine;
pub mod errors;
pub mod regiment_options;
pub mod weapons;

pub use engine::{VARIANT_SUFFIXES, check_roster, validate_roster};
pub use errors::{RuleKind, RulesError, Violation, ViolationReport};
