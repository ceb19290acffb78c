use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{AbilityTable, FactionCatalog};
use crate::error::{Error, Result};
use crate::unit::WeaponSelection;

/// Validate internal consistency of a faction catalog.
///
/// This checks:
/// - duplicate formations/units/profiles/ability tables
/// - every battle profile has a unit entry
/// - duplicate weapons inside a model group
/// - grouped weapons have at least one sibling sharing the group key
pub fn validate_catalog(catalog: &FactionCatalog) -> Result<()> {
    check_unique(
        catalog.formations.iter().map(|formation| formation.name.as_str()),
        "formation",
        &catalog.name,
    )?;
    check_unique(
        catalog.units.iter().map(|unit| unit.name.as_str()),
        "unit",
        &catalog.name,
    )?;
    check_unique(
        catalog.battle_profiles.iter().map(|profile| profile.name.as_str()),
        "battle profile",
        &catalog.name,
    )?;
    check_tables(&catalog.heroic_traits, "heroic trait", &catalog.name)?;
    check_tables(&catalog.artifacts, "artifact", &catalog.name)?;
    check_tables(&catalog.enhancements, "enhancement", &catalog.name)?;

    for profile in &catalog.battle_profiles {
        if catalog.unit(&profile.name).is_none() {
            return Err(Error::InvalidCatalog(format!(
                "battle profile without unit: {}.{}",
                catalog.name, profile.name
            )));
        }
    }

    for unit in &catalog.units {
        for group in &unit.model_groups {
            let mut weapons = BTreeSet::new();
            let mut grouped: BTreeMap<&str, usize> = BTreeMap::new();
            for weapon in &group.weapons {
                if !weapons.insert(weapon.name.to_lowercase()) {
                    return Err(Error::InvalidCatalog(format!(
                        "duplicate weapon name: {}.{}.{}",
                        unit.name, group.name, weapon.name
                    )));
                }
                if let WeaponSelection::Grouped { group: key } = &weapon.selection {
                    *grouped.entry(key.as_str()).or_insert(0) += 1;
                }
            }

            if let Some((key, _)) = grouped.iter().find(|(_, count)| **count < 2) {
                return Err(Error::InvalidCatalog(format!(
                    "weapon group with a single weapon: {}.{}.{}",
                    unit.name, group.name, key
                )));
            }
        }
    }

    Ok(())
}

fn check_tables(tables: &[AbilityTable], kind: &str, faction: &str) -> Result<()> {
    check_unique(tables.iter().map(|table| table.name.as_str()), kind, faction)?;
    for table in tables {
        check_unique(
            table.abilities.iter().map(|ability| ability.name.as_str()),
            kind,
            &format!("{faction}.{}", table.name),
        )?;
    }
    Ok(())
}

fn check_unique<'a>(names: impl Iterator<Item = &'a str>, kind: &str, scope: &str) -> Result<()> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name.trim().to_lowercase()) {
            return Err(Error::InvalidCatalog(format!(
                "duplicate {kind} name: {scope}.{name}"
            )));
        }
    }
    Ok(())
}
