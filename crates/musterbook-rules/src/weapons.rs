use std::collections::BTreeMap;

use musterbook_core::{Unit, UnitSelection, WeaponSelection};

use crate::errors::{RuleKind, ViolationReport};

/// Check a unit's weapon choices against its catalog model groups.
///
/// Reinforced units double every optional and grouped limit. Weapons sharing a
/// grouped key must together account for every model in the group.
pub fn check_weapon_options(unit: &UnitSelection, entry: &Unit, report: &mut ViolationReport) {
    let multiplier = if unit.reinforced { 2 } else { 1 };

    for (group_name, choices) in &unit.weapons {
        let Some(group) = entry.model_group(group_name) else {
            report.push(
                RuleKind::WeaponOptions,
                format!("{}: unknown model group '{}'", unit.name, group_name),
            );
            continue;
        };

        let group_max = group.count.saturating_mul(multiplier);
        let mut grouped_totals: BTreeMap<&str, u32> = BTreeMap::new();

        for choice in choices {
            let Some(weapon) = group.weapon(&choice.name) else {
                report.push(
                    RuleKind::WeaponOptions,
                    format!(
                        "{}: {} is not a weapon option for {}",
                        unit.name, choice.name, group.name
                    ),
                );
                continue;
            };
            let count = choice.count.unwrap_or(0);

            match &weapon.selection {
                WeaponSelection::Default => {}
                WeaponSelection::Optional { max } => {
                    let max = max.saturating_mul(multiplier);
                    if count > max {
                        report.push(
                            RuleKind::WeaponOptions,
                            format!(
                                "{}: no more than {} {} may be taken ({} selected)",
                                unit.name, max, weapon.name, count
                            ),
                        );
                    }
                }
                WeaponSelection::Grouped { group: key } => {
                    if count > group_max {
                        report.push(
                            RuleKind::WeaponOptions,
                            format!(
                                "{}: no more than {} {} may be taken ({} selected)",
                                unit.name, group_max, weapon.name, count
                            ),
                        );
                    }
                    let total = grouped_totals.entry(key.as_str()).or_insert(0);
                    *total = total.saturating_add(count);
                }
            }
        }

        for total in grouped_totals.values() {
            if *total != group_max {
                report.push(
                    RuleKind::WeaponOptions,
                    format!(
                        "{}: {} weapon selections must be exactly {} (selected {})",
                        unit.name, group.name, group_max, total
                    ),
                );
            }
        }
    }
}
