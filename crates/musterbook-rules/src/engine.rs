use std::collections::{HashMap, HashSet};

use musterbook_core::{
    CatalogSet, FactionCatalog, MAX_REGIMENTS, POINTS_CAP, PointsCalculator, Regiment, Roster,
    StandardPoints, UnitSelection,
};

use crate::errors::{RuleKind, RulesError, ViolationReport};
use crate::regiment_options::check_regiment_options;
use crate::weapons::check_weapon_options;

/// Variant suffixes whose units exclude their base unit, written as
/// `"<base> (<suffix>)"`.
pub const VARIANT_SUFFIXES: &[&str] = &["Scourge of Ghyran"];

/// Validate a roster against its faction's catalog and return the violation
/// messages in rule order.
///
/// Fails only when the roster's faction is not in the catalog set.
pub fn validate_roster(roster: &Roster, catalogs: &CatalogSet) -> Result<Vec<String>, RulesError> {
    let catalog = catalogs
        .faction(&roster.faction)
        .ok_or_else(|| RulesError::UnknownFaction(roster.faction.clone()))?;
    Ok(check_roster(roster, catalog, &StandardPoints).messages())
}

/// Run every rule category against a roster.
///
/// All violations of one category are reported before the next category.
/// Within a category units are visited regiment by regiment (leader first),
/// then the auxiliary units.
pub fn check_roster(
    roster: &Roster,
    catalog: &FactionCatalog,
    points: &dyn PointsCalculator,
) -> ViolationReport {
    let mut report = ViolationReport::default();

    check_unique_enhancements(roster, catalog, &mut report);
    check_companions(roster, catalog, &mut report);
    check_points(roster, catalog, points, &mut report);
    check_general(roster, &mut report);
    check_regiment_count(roster, &mut report);
    check_warmaster(roster, catalog, &mut report);
    check_regiment_size(roster, &mut report);
    check_leader_category(roster, catalog, &mut report);
    check_unique_duplicates(roster, catalog, &mut report);
    check_reinforcement(roster, catalog, &mut report);
    check_weapons(roster, catalog, &mut report);
    check_leader_assignment(roster, &mut report);
    check_catalog_presence(roster, catalog, &mut report);
    check_enhancement_singletons(roster, &mut report);
    for regiment in &roster.regiments {
        check_regiment_options(regiment, catalog, &mut report);
    }
    check_variant_exclusivity(roster, &mut report);
    check_undersize(roster, catalog, &mut report);

    report
}

fn check_unique_enhancements(
    roster: &Roster,
    catalog: &FactionCatalog,
    report: &mut ViolationReport,
) {
    for unit in roster.units() {
        let unique = catalog
            .profile(&unit.name)
            .is_some_and(|profile| profile.is_unique());
        if unique && unit.has_enhancement() {
            report.push(
                RuleKind::UniqueEnhancement,
                format!(
                    "{} is unique and cannot take a heroic trait, artifact or enhancement",
                    unit.name
                ),
            );
        }
    }
}

fn check_companions(roster: &Roster, catalog: &FactionCatalog, report: &mut ViolationReport) {
    for regiment in &roster.regiments {
        let leader = regiment.assigned_leader();

        if let Some(leader) = leader
            && let Some(profile) = catalog.profile(&leader.name)
        {
            for companion in &profile.companion_units {
                let present = regiment
                    .followers
                    .iter()
                    .any(|follower| same_name(&follower.name, companion));
                if !present {
                    report.push(
                        RuleKind::Companion,
                        format!("{}'s regiment must include {}", leader.name, companion),
                    );
                }
            }
        }

        for follower in &regiment.followers {
            let Some(required) = catalog
                .profile(&follower.name)
                .and_then(|profile| profile.companion_leader.as_deref())
            else {
                continue;
            };
            let led_correctly = leader.is_some_and(|leader| same_name(&leader.name, required));
            if !led_correctly {
                report.push(
                    RuleKind::Companion,
                    format!("{} must be led by {}", follower.name, required),
                );
            }
        }
    }
}

fn check_points(
    roster: &Roster,
    catalog: &FactionCatalog,
    points: &dyn PointsCalculator,
    report: &mut ViolationReport,
) {
    let total = points.roster_points(roster, catalog);
    if total > POINTS_CAP {
        report.push(
            RuleKind::PointsCap,
            format!("Roster is {total} points, exceeding the {POINTS_CAP} point limit"),
        );
    }
}

fn check_general(roster: &Roster, report: &mut ViolationReport) {
    let generals = roster.regiment_units().filter(|unit| unit.general).count();
    match generals {
        1 => {}
        0 => report.push(RuleKind::General, "A general must be selected"),
        count => report.push(
            RuleKind::General,
            format!("Only one general may be selected ({count} selected)"),
        ),
    }
}

fn check_regiment_count(roster: &Roster, report: &mut ViolationReport) {
    let count = roster.regiments.len();
    if count > MAX_REGIMENTS {
        report.push(
            RuleKind::RegimentCount,
            format!("No more than {MAX_REGIMENTS} regiments may be fielded ({count} present)"),
        );
    }
}

fn check_warmaster(roster: &Roster, catalog: &FactionCatalog, report: &mut ViolationReport) {
    let warmasters: Vec<&UnitSelection> = roster
        .units()
        .filter(|unit| {
            catalog
                .profile(&unit.name)
                .is_some_and(|profile| profile.has_keyword("warmaster"))
        })
        .collect();

    if !warmasters.is_empty() && !warmasters.iter().any(|unit| unit.general) {
        let names: Vec<&str> = distinct_names(warmasters.iter().copied());
        report.push(
            RuleKind::Warmaster,
            format!("A Warmaster must be your general: {}", names.join(", ")),
        );
    }
}

fn check_regiment_size(roster: &Roster, report: &mut ViolationReport) {
    for (idx, regiment) in roster.regiments.iter().enumerate() {
        let max = if regiment.is_led_by_general() { 4 } else { 3 };
        let count = regiment.followers.len();
        if count > max {
            report.push(
                RuleKind::RegimentSize,
                format!(
                    "{}: No more than {max} units may join this regiment ({count} present)",
                    regiment_label(idx, regiment)
                ),
            );
        }
    }
}

fn check_leader_category(roster: &Roster, catalog: &FactionCatalog, report: &mut ViolationReport) {
    for (idx, regiment) in roster.regiments.iter().enumerate() {
        let Some(leader) = regiment.assigned_leader() else {
            continue;
        };
        let Some(profile) = catalog.profile(&leader.name) else {
            continue;
        };
        if !profile.is_hero() {
            report.push(
                RuleKind::LeaderCategory,
                format!(
                    "Regiment {}: {} must have the Hero category to lead a regiment",
                    idx + 1,
                    leader.name
                ),
            );
        }
    }
}

fn check_unique_duplicates(
    roster: &Roster,
    catalog: &FactionCatalog,
    report: &mut ViolationReport,
) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for unit in roster.units() {
        *counts.entry(name_key(&unit.name)).or_insert(0) += 1;
    }

    for name in distinct_names(roster.units()) {
        let unique = catalog
            .profile(name)
            .is_some_and(|profile| profile.is_unique());
        if unique && counts.get(&name_key(name)).copied().unwrap_or(0) > 1 {
            report.push(
                RuleKind::UniqueDuplicate,
                format!("Duplicate unique unit: {name}"),
            );
        }
    }
}

fn check_reinforcement(roster: &Roster, catalog: &FactionCatalog, report: &mut ViolationReport) {
    for unit in roster.units().filter(|unit| unit.reinforced) {
        let (Some(profile), Some(entry)) = (catalog.profile(&unit.name), catalog.unit(&unit.name))
        else {
            continue;
        };
        if !profile.reinforceable || entry.size() <= 1 {
            report.push(
                RuleKind::Reinforcement,
                format!("{} cannot be reinforced", unit.name),
            );
        }
    }
}

fn check_weapons(roster: &Roster, catalog: &FactionCatalog, report: &mut ViolationReport) {
    for unit in roster.units() {
        if let Some(entry) = catalog.unit(&unit.name) {
            check_weapon_options(unit, entry, report);
        }
    }
}

fn check_leader_assignment(roster: &Roster, report: &mut ViolationReport) {
    for (idx, regiment) in roster.regiments.iter().enumerate() {
        if regiment.assigned_leader().is_none() {
            report.push(
                RuleKind::LeaderAssignment,
                format!("Regiment {} has no leader", idx + 1),
            );
        }
    }
}

fn check_catalog_presence(roster: &Roster, catalog: &FactionCatalog, report: &mut ViolationReport) {
    let mut reported = HashSet::new();

    for unit in roster.units() {
        let name = unit.name.trim();
        if name.is_empty() {
            continue;
        }
        let resolved = catalog.unit(name).is_some() && catalog.profile(name).is_some();
        if !resolved && reported.insert(name_key(name)) {
            report.push(RuleKind::CatalogPresence, format!("Unknown unit: {name}"));
        }
    }

    for unit in roster.units() {
        if let Some(heroic_trait) = &unit.heroic_trait
            && catalog.heroic_trait_table(heroic_trait).is_none()
        {
            report.push(
                RuleKind::CatalogPresence,
                format!("Unknown heroic trait: {} ({})", heroic_trait, unit.name),
            );
        }
        if let Some(artifact) = &unit.artifact
            && catalog.artifact_table(artifact).is_none()
        {
            report.push(
                RuleKind::CatalogPresence,
                format!("Unknown artifact: {} ({})", artifact, unit.name),
            );
        }
        for (table, enhancement) in &unit.enhancements {
            let known = catalog
                .enhancement_table(table)
                .is_some_and(|entries| entries.ability(enhancement).is_some());
            if !known {
                report.push(
                    RuleKind::CatalogPresence,
                    format!("Unknown enhancement: {} from {} ({})", enhancement, table, unit.name),
                );
            }
        }
    }
}

fn check_enhancement_singletons(roster: &Roster, report: &mut ViolationReport) {
    let heroic_traits: Vec<&str> = roster
        .units()
        .filter_map(|unit| unit.heroic_trait.as_deref())
        .collect();
    if heroic_traits.len() > 1 {
        report.push(
            RuleKind::EnhancementSingleton,
            format!(
                "Only one heroic trait may be selected ({} selected)",
                heroic_traits.len()
            ),
        );
    }

    let artifacts: Vec<&str> = roster
        .units()
        .filter_map(|unit| unit.artifact.as_deref())
        .collect();
    if artifacts.len() > 1 {
        report.push(
            RuleKind::EnhancementSingleton,
            format!("Only one artifact may be selected ({} selected)", artifacts.len()),
        );
    }

    let mut tables: Vec<(&str, usize)> = Vec::new();
    let mut enhancements: Vec<&str> = Vec::new();
    for unit in roster.units() {
        for (table, enhancement) in &unit.enhancements {
            enhancements.push(enhancement.as_str());
            match tables.iter_mut().find(|(name, _)| same_name(name, table)) {
                Some((_, count)) => *count += 1,
                None => tables.push((table.as_str(), 1)),
            }
        }
    }
    for (table, count) in tables {
        if count > 1 {
            report.push(
                RuleKind::EnhancementSingleton,
                format!("Only one enhancement from {table} may be selected ({count} selected)"),
            );
        }
    }

    for name in repeated(heroic_traits.iter().chain(&artifacts).chain(&enhancements).copied()) {
        report.push(
            RuleKind::EnhancementSingleton,
            format!("{name} is assigned to more than one unit"),
        );
    }
}

fn check_variant_exclusivity(roster: &Roster, report: &mut ViolationReport) {
    for name in distinct_names(roster.units()) {
        let Some(base) = variant_base(name) else {
            continue;
        };
        if roster.count_of(base) > 0 {
            report.push(
                RuleKind::VariantExclusivity,
                format!("{name} and {base} cannot both be included"),
            );
        }
    }
}

fn check_undersize(roster: &Roster, catalog: &FactionCatalog, report: &mut ViolationReport) {
    for name in distinct_names(roster.units()) {
        let Some(condition) = catalog
            .profile(name)
            .and_then(|profile| profile.undersize_condition.as_deref())
        else {
            continue;
        };
        let actual = roster.count_of(name);
        let allowed = roster.count_of(condition);
        if actual > allowed {
            report.push(
                RuleKind::UndersizeCondition,
                format!(
                    "{name}: {actual} included but only {allowed} allowed (one per {condition})"
                ),
            );
        }
    }
}

/// Base unit name for `"<base> (<suffix>)"` when the suffix is a known variant.
fn variant_base(name: &str) -> Option<&str> {
    let trimmed = name.trim();
    let without_paren = trimmed.strip_suffix(')')?;
    let open = without_paren.rfind(" (")?;
    let suffix = &without_paren[open + 2..];
    if VARIANT_SUFFIXES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(suffix.trim()))
    {
        let base = trimmed[..open].trim();
        (!base.is_empty()).then_some(base)
    } else {
        None
    }
}

fn regiment_label(idx: usize, regiment: &Regiment) -> String {
    match regiment.assigned_leader() {
        Some(leader) => format!("Regiment {} ({})", idx + 1, leader.name),
        None => format!("Regiment {}", idx + 1),
    }
}

/// Names in first-appearance order, without case-insensitive repeats.
fn distinct_names<'a>(units: impl Iterator<Item = &'a UnitSelection>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    units
        .map(|unit| unit.name.trim())
        .filter(|name| !name.is_empty() && seen.insert(name_key(name)))
        .collect()
}

/// Names occurring more than once, each reported once in first-appearance order.
fn repeated<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let names: Vec<&str> = names.collect();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for name in &names {
        *counts.entry(name_key(name)).or_insert(0) += 1;
    }
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| counts.get(&name_key(name)).copied().unwrap_or(0) > 1)
        .filter(|name| seen.insert(name_key(name)))
        .collect()
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn same_name(left: &str, right: &str) -> bool {
    left.trim().eq_ignore_ascii_case(right.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_base_requires_known_suffix() {
        assert_eq!(
            variant_base("Lord-Celestant (Scourge of Ghyran)"),
            Some("Lord-Celestant")
        );
        assert_eq!(variant_base("Lord-Celestant (on Dracoth)"), None);
        assert_eq!(variant_base("Lord-Celestant"), None);
    }

    #[test]
    fn repeated_reports_each_name_once() {
        let names = ["Blade", "Crown", "blade", "Blade"];
        assert_eq!(repeated(names.into_iter()), vec!["Blade"]);
    }
}
