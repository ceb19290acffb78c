use crate::catalog::FactionCatalog;
use crate::roster::{Roster, UnitSelection};

/// Computes the points a roster spends against its cap.
pub trait PointsCalculator {
    fn roster_points(&self, roster: &Roster, catalog: &FactionCatalog) -> u32;
}

/// Points as printed: unit points (doubled when reinforced), selected lores
/// and faction terrain. Names missing from the catalog count as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPoints;

impl StandardPoints {
    pub fn unit_points(&self, unit: &UnitSelection, catalog: &FactionCatalog) -> u32 {
        let Some(entry) = catalog.unit(&unit.name) else {
            return 0;
        };
        if unit.reinforced {
            entry.points.saturating_mul(2)
        } else {
            entry.points
        }
    }
}

impl PointsCalculator for StandardPoints {
    fn roster_points(&self, roster: &Roster, catalog: &FactionCatalog) -> u32 {
        let units: u32 = roster
            .units()
            .map(|unit| self.unit_points(unit, catalog))
            .fold(0, u32::saturating_add);

        let lores: u32 = [
            roster.spell_lore.as_deref(),
            roster.prayer_lore.as_deref(),
            roster.manifestation_lore.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(|lore| catalog.lore_points(lore))
        .fold(0, u32::saturating_add);

        let terrain = roster
            .faction_terrain
            .as_deref()
            .and_then(|name| catalog.unit(name))
            .map(|unit| unit.points)
            .unwrap_or(0);

        units.saturating_add(lores).saturating_add(terrain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Lore;
    use crate::roster::Regiment;
    use crate::unit::{Unit, UnitCategory};

    fn catalog() -> FactionCatalog {
        FactionCatalog {
            name: "Test Host".to_string(),
            formations: Vec::new(),
            units: vec![
                Unit {
                    name: "Knight".to_string(),
                    category: UnitCategory::Hero,
                    points: 120,
                    model_groups: Vec::new(),
                },
                Unit {
                    name: "Spearmen".to_string(),
                    category: UnitCategory::Infantry,
                    points: 100,
                    model_groups: Vec::new(),
                },
            ],
            battle_profiles: Vec::new(),
            heroic_traits: Vec::new(),
            artifacts: Vec::new(),
            enhancements: Vec::new(),
            spell_lores: Vec::new(),
            prayer_lores: Vec::new(),
            manifestation_lores: vec![Lore {
                name: "Lore of Storms".to_string(),
                points: 40,
            }],
        }
    }

    #[test]
    fn reinforced_units_cost_double() {
        let mut roster = Roster::new("List", "Test Host", "");
        let spearmen = UnitSelection {
            reinforced: true,
            ..UnitSelection::new("Spearmen")
        };
        roster
            .regiments
            .push(Regiment::with_followers(UnitSelection::new("Knight"), vec![spearmen]));
        roster.manifestation_lore = Some("lore of storms".to_string());

        assert_eq!(StandardPoints.roster_points(&roster, &catalog()), 120 + 200 + 40);
    }

    #[test]
    fn oversized_totals_saturate() {
        let mut catalog = catalog();
        catalog.units[1].points = u32::MAX / 2;
        let mut roster = Roster::new("List", "Test Host", "");
        roster.auxiliary_units.push(UnitSelection {
            reinforced: true,
            ..UnitSelection::new("Spearmen")
        });
        roster.auxiliary_units.push(UnitSelection::new("Spearmen"));
        roster.manifestation_lore = Some("Lore of Storms".to_string());

        assert_eq!(StandardPoints.roster_points(&roster, &catalog), u32::MAX);
    }

    #[test]
    fn unknown_units_are_free() {
        let mut roster = Roster::new("List", "Test Host", "");
        roster.auxiliary_units.push(UnitSelection::new("Nobody"));
        assert_eq!(StandardPoints.roster_points(&roster, &catalog()), 0);
    }
}
