use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Points limit every roster is built against.
pub const POINTS_CAP: u32 = 2000;

/// Legal maximum number of regiments; more is reported, not prevented.
pub const MAX_REGIMENTS: usize = 5;

fn default_points_cap() -> u32 {
    POINTS_CAP
}

/// A user's army list for one faction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Roster {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub faction: String,
    pub formation: String,
    #[serde(default)]
    pub regiments: Vec<Regiment>,
    #[serde(default)]
    pub auxiliary_units: Vec<UnitSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction_terrain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spell_lore: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prayer_lore: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifestation_lore: Option<String>,
    #[serde(default)]
    pub setup_complete: bool,
    #[serde(default = "default_points_cap")]
    pub points_cap: u32,
    /// Set by the roster store on every save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Roster {
    /// Empty roster with no regiments and nothing selected.
    pub fn new(
        name: impl Into<String>,
        faction: impl Into<String>,
        formation: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            faction: faction.into(),
            formation: formation.into(),
            regiments: Vec::new(),
            auxiliary_units: Vec::new(),
            faction_terrain: None,
            spell_lore: None,
            prayer_lore: None,
            manifestation_lore: None,
            setup_complete: false,
            points_cap: POINTS_CAP,
            updated_at: None,
        }
    }

    /// Regiment units (leader first, then followers, regiment by regiment).
    pub fn regiment_units(&self) -> impl Iterator<Item = &UnitSelection> {
        self.regiments.iter().flat_map(|regiment| regiment.units())
    }

    /// Every unit in the roster: regiment units followed by auxiliaries.
    pub fn units(&self) -> impl Iterator<Item = &UnitSelection> {
        self.regiment_units().chain(self.auxiliary_units.iter())
    }

    pub fn count_of(&self, unit_name: &str) -> usize {
        self.units()
            .filter(|unit| unit.name.trim().eq_ignore_ascii_case(unit_name.trim()))
            .count()
    }
}

/// A leader and the units it leads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Regiment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader: Option<UnitSelection>,
    #[serde(default)]
    pub followers: Vec<UnitSelection>,
}

impl Regiment {
    pub fn new(leader: UnitSelection) -> Self {
        Self {
            leader: Some(leader),
            followers: Vec::new(),
        }
    }

    pub fn with_followers(leader: UnitSelection, followers: Vec<UnitSelection>) -> Self {
        Self {
            leader: Some(leader),
            followers,
        }
    }

    /// Leader with a non-blank unit name.
    pub fn assigned_leader(&self) -> Option<&UnitSelection> {
        self.leader
            .as_ref()
            .filter(|leader| !leader.name.trim().is_empty())
    }

    pub fn units(&self) -> impl Iterator<Item = &UnitSelection> {
        self.leader.iter().chain(self.followers.iter())
    }

    pub fn is_led_by_general(&self) -> bool {
        self.leader.as_ref().is_some_and(|leader| leader.general)
    }
}

/// A catalog unit as fielded in a roster, with the player's choices.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UnitSelection {
    pub name: String,
    #[serde(default)]
    pub general: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heroic_trait: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
    #[serde(default)]
    pub reinforced: bool,
    /// Enhancement table name to chosen enhancement.
    #[serde(default, with = "crate::pairs")]
    pub enhancements: BTreeMap<String, String>,
    /// Model group name to the weapons chosen for it.
    #[serde(default, with = "crate::pairs")]
    pub weapons: BTreeMap<String, Vec<WeaponChoice>>,
}

impl UnitSelection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn has_enhancement(&self) -> bool {
        self.heroic_trait.is_some() || self.artifact.is_some() || !self.enhancements.is_empty()
    }
}

/// A weapon picked for some models of a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeaponChoice {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl WeaponChoice {
    pub fn new(name: impl Into<String>, count: Option<u32>) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}
