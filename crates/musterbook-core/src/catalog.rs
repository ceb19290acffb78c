use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::unit::{BattleProfile, Unit, UnitCategory};

/// Manifestation lores every faction may take regardless of its own tables.
pub const UNIVERSAL_MANIFESTATION_LORES: &[&str] = &[
    "Forbidden Power",
    "Morbid Conjuration",
    "Primal Energy",
    "Twilit Sorceries",
    "Aetherwrought Machineries",
    "Krondspine Incarnate",
];

/// Read-only rules data for one faction.
///
/// Every collection is kept in authoring order: lookups that pick the "first"
/// match (default formation, free-text detection) depend on it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FactionCatalog {
    /// Display name of the faction (e.g. `Stormcast Eternals`).
    pub name: String,
    #[serde(default)]
    pub formations: Vec<Formation>,
    #[serde(default)]
    pub units: Vec<Unit>,
    #[serde(default)]
    pub battle_profiles: Vec<BattleProfile>,
    #[serde(default)]
    pub heroic_traits: Vec<AbilityTable>,
    #[serde(default)]
    pub artifacts: Vec<AbilityTable>,
    /// Named enhancement tables; one pick per table is allowed list-wide.
    #[serde(default)]
    pub enhancements: Vec<AbilityTable>,
    #[serde(default)]
    pub spell_lores: Vec<Lore>,
    #[serde(default)]
    pub prayer_lores: Vec<Lore>,
    #[serde(default)]
    pub manifestation_lores: Vec<Lore>,
}

/// Battle formation granting army-wide rules.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Formation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A named pool of abilities (heroic traits, artifacts or an enhancement table).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AbilityTable {
    pub name: String,
    #[serde(default)]
    pub abilities: Vec<Ability>,
}

impl AbilityTable {
    pub fn ability(&self, name: &str) -> Option<&Ability> {
        self.abilities
            .iter()
            .find(|ability| ability.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Ability {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Spell, prayer or manifestation lore.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Lore {
    pub name: String,
    #[serde(default)]
    pub points: u32,
}

impl FactionCatalog {
    pub fn unit(&self, name: &str) -> Option<&Unit> {
        self.units
            .iter()
            .find(|unit| unit.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn profile(&self, name: &str) -> Option<&BattleProfile> {
        self.battle_profiles
            .iter()
            .find(|profile| profile.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn formation(&self, name: &str) -> Option<&Formation> {
        self.formations
            .iter()
            .find(|formation| formation.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Default formation for a new roster: the first one authored.
    pub fn default_formation(&self) -> Option<&Formation> {
        self.formations.first()
    }

    /// Units that may be placed in regiments or the auxiliary list.
    pub fn rosterable_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|unit| unit.category.is_rosterable())
    }

    pub fn faction_terrain(&self) -> impl Iterator<Item = &Unit> {
        self.units
            .iter()
            .filter(|unit| unit.category == UnitCategory::FactionTerrain)
    }

    /// Table holding the named heroic trait, if any.
    pub fn heroic_trait_table(&self, name: &str) -> Option<&AbilityTable> {
        find_table(&self.heroic_traits, name)
    }

    pub fn artifact_table(&self, name: &str) -> Option<&AbilityTable> {
        find_table(&self.artifacts, name)
    }

    pub fn enhancement_table(&self, table: &str) -> Option<&AbilityTable> {
        self.enhancements
            .iter()
            .find(|candidate| candidate.name.eq_ignore_ascii_case(table.trim()))
    }

    /// Points for a lore of any kind, falling back to zero for unknown names.
    pub fn lore_points(&self, name: &str) -> u32 {
        self.spell_lores
            .iter()
            .chain(&self.prayer_lores)
            .chain(&self.manifestation_lores)
            .find(|lore| lore.name.eq_ignore_ascii_case(name.trim()))
            .map(|lore| lore.points)
            .unwrap_or(0)
    }
}

fn find_table<'a>(tables: &'a [AbilityTable], ability: &str) -> Option<&'a AbilityTable> {
    tables
        .iter()
        .find(|table| table.ability(ability.trim()).is_some())
}

/// All faction catalogs known to the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSet {
    pub factions: Vec<FactionCatalog>,
}

impl CatalogSet {
    pub fn new(factions: Vec<FactionCatalog>) -> Self {
        Self { factions }
    }

    pub fn faction(&self, name: &str) -> Option<&FactionCatalog> {
        self.factions
            .iter()
            .find(|faction| faction.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Like [`CatalogSet::faction`] but reports a missing faction as an error.
    pub fn require(&self, name: &str) -> Result<&FactionCatalog> {
        self.faction(name)
            .ok_or_else(|| Error::UnknownFaction(name.to_string()))
    }

    pub fn faction_names(&self) -> impl Iterator<Item = &str> {
        self.factions.iter().map(|faction| faction.name.as_str())
    }
}
