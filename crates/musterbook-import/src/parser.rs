use regex::Regex;
use tracing::debug;

use musterbook_core::{AbilityTable, FactionCatalog, Unit, UnitSelection, WeaponChoice};

/// Variant phrase that exports spell in several ways; lines carrying it are
/// matched on names with the phrase and parentheticals removed.
const VARIANT_PHRASE: &str = "scourge of ghyran";

enum State<'c> {
    Searching,
    Open {
        unit: UnitSelection,
        entry: &'c Unit,
    },
}

/// Line-by-line unit parser for one regiment or auxiliary block.
///
/// Expects lower-cased text. A line naming a rosterable catalog unit opens a
/// new unit; that line and every following line until the next opening line
/// add flags, weapons and enhancements to it.
pub(crate) struct ChunkParser<'c> {
    catalog: &'c FactionCatalog,
    numbers: &'c Regex,
}

impl<'c> ChunkParser<'c> {
    pub(crate) fn new(catalog: &'c FactionCatalog, numbers: &'c Regex) -> Self {
        Self { catalog, numbers }
    }

    /// Units named in the block, in order of appearance.
    pub(crate) fn parse(&self, chunk: &str) -> Vec<UnitSelection> {
        let mut units = Vec::new();
        let mut state = State::Searching;

        for line in chunk.lines().map(str::trim).filter(|line| !line.is_empty()) {
            if let Some(entry) = self.opening_unit(line) {
                if let State::Open { unit, .. } = std::mem::replace(&mut state, State::Searching) {
                    units.push(unit);
                }
                debug!(unit = %entry.name, line = %line, "unit opened");

                let mut unit = UnitSelection::new(entry.name.clone());
                let rest = line.replacen(&entry.name.to_lowercase(), " ", 1);
                self.apply_line(&mut unit, entry, &rest, line);
                state = State::Open { unit, entry };
                continue;
            }

            match &mut state {
                State::Open { unit, entry } => self.apply_line(unit, *entry, line, line),
                State::Searching => debug!(line = %line, "line before first unit ignored"),
            }
        }

        if let State::Open { unit, .. } = state {
            units.push(unit);
        }
        units
    }

    /// Catalog unit named by the line; the longest name wins.
    fn opening_unit(&self, line: &str) -> Option<&'c Unit> {
        let variant_line = line.contains(VARIANT_PHRASE);
        let haystack = if variant_line {
            strip_variant(line)
        } else {
            line.to_string()
        };

        self.catalog
            .rosterable_units()
            .filter_map(|unit| {
                let name = unit.name.to_lowercase();
                if variant_line {
                    let stripped = strip_variant(&name);
                    let rank = (name.contains(VARIANT_PHRASE), stripped.len());
                    (!stripped.is_empty() && haystack.contains(&stripped)).then_some((unit, rank))
                } else {
                    haystack.contains(&name).then_some((unit, (false, name.len())))
                }
            })
            .min_by_key(|(_, rank)| std::cmp::Reverse(*rank))
            .map(|(unit, _)| unit)
    }

    /// Add what `text` says about the open unit. `full_line` is the whole line,
    /// used for the reinforced points check.
    fn apply_line(&self, unit: &mut UnitSelection, entry: &Unit, text: &str, full_line: &str) {
        if text.contains("general") {
            unit.general = true;
        }
        if text.contains("reinforce") || self.lists_double_points(full_line, entry) {
            unit.reinforced = true;
        }

        let count = self.first_number(text);
        for group in &entry.model_groups {
            for weapon in &group.weapons {
                if !text.contains(&weapon.name.to_lowercase()) {
                    continue;
                }
                let choices = unit.weapons.entry(group.name.clone()).or_default();
                match choices
                    .iter_mut()
                    .find(|choice| choice.name.eq_ignore_ascii_case(&weapon.name))
                {
                    Some(existing) => existing.count = count,
                    None => choices.push(WeaponChoice::new(weapon.name.clone(), count)),
                }
            }
        }

        if unit.heroic_trait.is_none() {
            unit.heroic_trait = first_ability(&self.catalog.heroic_traits, text);
        }
        if unit.artifact.is_none() {
            unit.artifact = first_ability(&self.catalog.artifacts, text);
        }
        for table in &self.catalog.enhancements {
            if unit.enhancements.contains_key(&table.name) {
                continue;
            }
            if let Some(enhancement) = first_ability(std::slice::from_ref(table), text) {
                unit.enhancements.insert(table.name.clone(), enhancement);
            }
        }
    }

    fn first_number(&self, text: &str) -> Option<u32> {
        self.numbers
            .find(text)
            .and_then(|found| found.as_str().parse().ok())
    }

    /// Exports print a reinforced unit's doubled points next to its name.
    fn lists_double_points(&self, line: &str, entry: &Unit) -> bool {
        let Some(doubled) = entry.points.checked_mul(2).filter(|points| *points > 0) else {
            return false;
        };
        self.numbers
            .find_iter(line)
            .any(|found| found.as_str().parse::<u32>().ok() == Some(doubled))
    }
}

fn first_ability(tables: &[AbilityTable], text: &str) -> Option<String> {
    tables
        .iter()
        .flat_map(|table| table.abilities.iter())
        .find(|ability| text.contains(&ability.name.to_lowercase()))
        .map(|ability| ability.name.clone())
}

/// Drop the variant phrase and every parenthetical, then collapse whitespace.
fn strip_variant(text: &str) -> String {
    let without_phrase = text.replace(VARIANT_PHRASE, " ");
    let mut kept = String::with_capacity(without_phrase.len());
    let mut depth = 0usize;
    for ch in without_phrase.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => kept.push(ch),
            _ => {}
        }
    }
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}
