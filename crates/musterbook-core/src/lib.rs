//! Core contracts and helpers for Musterbook.
//!
//! This crate defines the read-only rules catalog, the roster model with its
//! storage encoding, and utilities shared by the rules engine, the importer
//! and the CLI.

pub mod catalog;
pub mod error;
pub mod fuzzy;
pub mod pairs;
pub mod points;
pub mod roster;
pub mod unit;
pub mod validation;

pub use catalog::{
    Ability, AbilityTable, CatalogSet, FactionCatalog, Formation, Lore,
    UNIVERSAL_MANIFESTATION_LORES,
};
pub use error::{Error, Result};
pub use fuzzy::{FuzzyMatch, LineMatch, find_best_match, find_best_match_in_text, similarity};
pub use points::{PointsCalculator, StandardPoints};
pub use roster::{MAX_REGIMENTS, POINTS_CAP, Regiment, Roster, UnitSelection, WeaponChoice};
pub use unit::{
    BattleProfile, ModelGroup, RegimentOption, Unit, UnitCategory, Weapon, WeaponSelection,
};
pub use validation::validate_catalog;

/// Current contract version for stored roster records.
pub const ROSTER_FORMAT_VERSION: &str = "0.1";
