use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Battlefield role of a unit as printed on its battle profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UnitCategory {
    Hero,
    Infantry,
    Cavalry,
    Beast,
    Monster,
    WarMachine,
    Manifestation,
    FactionTerrain,
    #[serde(other)]
    Other,
}

impl UnitCategory {
    /// Lower-case label used when matching free text and regiment options.
    pub fn label(self) -> &'static str {
        match self {
            UnitCategory::Hero => "hero",
            UnitCategory::Infantry => "infantry",
            UnitCategory::Cavalry => "cavalry",
            UnitCategory::Beast => "beast",
            UnitCategory::Monster => "monster",
            UnitCategory::WarMachine => "war machine",
            UnitCategory::Manifestation => "manifestation",
            UnitCategory::FactionTerrain => "faction terrain",
            UnitCategory::Other => "other",
        }
    }

    /// Manifestations and faction terrain are selected through lores and
    /// terrain slots, never as regiment or auxiliary units.
    pub fn is_rosterable(self) -> bool {
        !matches!(self, UnitCategory::Manifestation | UnitCategory::FactionTerrain)
    }
}

/// Warscroll entry: points and model groups with their weapon options.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Unit {
    pub name: String,
    pub category: UnitCategory,
    /// Base points for an unreinforced unit.
    pub points: u32,
    #[serde(default)]
    pub model_groups: Vec<ModelGroup>,
}

impl Unit {
    /// Number of models in the unreinforced unit.
    pub fn size(&self) -> u32 {
        self.model_groups.iter().map(|group| group.count).fold(0, u32::saturating_add)
    }

    pub fn model_group(&self, name: &str) -> Option<&ModelGroup> {
        self.model_groups
            .iter()
            .find(|group| group.name.eq_ignore_ascii_case(name))
    }
}

/// A set of identical models inside a unit, e.g. the champion or the rank and file.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ModelGroup {
    pub name: String,
    pub count: u32,
    #[serde(default)]
    pub weapons: Vec<Weapon>,
}

impl ModelGroup {
    pub fn weapon(&self, name: &str) -> Option<&Weapon> {
        self.weapons
            .iter()
            .find(|weapon| weapon.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Weapon {
    pub name: String,
    #[serde(default)]
    pub selection: WeaponSelection,
}

/// How many models of a group may take a weapon.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WeaponSelection {
    /// Always carried; never chosen.
    #[default]
    Default,
    /// Up to `max` models may swap to this weapon.
    Optional { max: u32 },
    /// Weapons sharing `group` split the whole model group between them.
    Grouped { group: String },
}

/// Rules data for one unit: keywords, pairing and regiment options.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BattleProfile {
    pub name: String,
    pub category: UnitCategory,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Tags a leader's regiment options refer to when admitting this unit.
    #[serde(default)]
    pub regiment_tags: Vec<String>,
    /// Units that must join any regiment this unit leads.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub companion_units: Vec<String>,
    /// Leader this unit may only be fielded under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub companion_leader: Option<String>,
    #[serde(default)]
    pub regiment_options: Vec<RegimentOption>,
    #[serde(default)]
    pub reinforceable: bool,
    /// Unit whose count caps how many of this unit may be fielded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub undersize_condition: Option<String>,
}

impl BattleProfile {
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords
            .iter()
            .any(|candidate| candidate.trim().eq_ignore_ascii_case(keyword))
    }

    pub fn is_hero(&self) -> bool {
        self.has_keyword("hero")
    }

    pub fn is_unique(&self) -> bool {
        self.has_keyword("unique")
    }
}

/// A leader-granted permission to include followers of some kind.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RegimentOption {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}
