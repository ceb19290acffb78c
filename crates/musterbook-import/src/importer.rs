use regex::Regex;
use tracing::info;

use musterbook_core::{FactionCatalog, Regiment, Roster, UNIVERSAL_MANIFESTATION_LORES};

use crate::errors::{ImportError, Result};
use crate::loader::CatalogLoader;
use crate::options::ImportOptions;
use crate::parser::ChunkParser;
use crate::segment::Segmenter;

/// Rebuilds rosters from exported plain-text lists.
///
/// Matching is case-insensitive substring containment against the faction's
/// catalog; the text has no fixed grammar.
#[derive(Debug, Clone)]
pub struct Importer {
    options: ImportOptions,
    segmenter: Segmenter,
    points_suffix: Regex,
    numbers: Regex,
}

impl Importer {
    pub fn new(options: ImportOptions) -> Result<Self> {
        Ok(Self {
            options,
            segmenter: Segmenter::new()?,
            points_suffix: Regex::new(r"(?i)\s*\d+\s*/\s*\d+\s*pts\s*$")?,
            numbers: Regex::new(r"\d+")?,
        })
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Detect the faction, load its catalog and parse the list.
    pub async fn import(&self, text: &str, loader: &dyn CatalogLoader) -> Result<Roster> {
        info!(event = "import_started", bytes = text.len());

        let lowered = text.trim().to_lowercase();
        let factions = loader.factions().await?;
        let faction = factions
            .iter()
            .find(|name| lowered.contains(&name.to_lowercase()))
            .ok_or(ImportError::UnknownFaction)?;
        info!(event = "faction_detected", faction = %faction);

        let catalog = loader
            .load_faction(faction)
            .await
            .map_err(|err| match err {
                ImportError::Catalog(message) => ImportError::Catalog(message),
                other => ImportError::Catalog(format!("{faction}: {other}")),
            })?;

        let roster = self.import_with_catalog(text, &catalog);
        info!(
            event = "import_finished",
            faction = %roster.faction,
            formation = %roster.formation,
            regiments = roster.regiments.len(),
            auxiliary_units = roster.auxiliary_units.len()
        );
        Ok(roster)
    }

    /// Parse a list whose faction catalog is already known.
    pub fn import_with_catalog(&self, text: &str, catalog: &FactionCatalog) -> Roster {
        let lowered = text.trim().to_lowercase();

        let formation = catalog
            .formations
            .iter()
            .find(|formation| lowered.contains(&formation.name.to_lowercase()))
            .or_else(|| catalog.default_formation())
            .map(|formation| formation.name.clone())
            .unwrap_or_default();

        let mut roster = Roster::new(self.roster_name(text), catalog.name.clone(), formation);
        roster.faction_terrain = first_named(
            &lowered,
            catalog.faction_terrain().map(|unit| unit.name.as_str()),
        );
        roster.spell_lore = first_named(
            &lowered,
            catalog.spell_lores.iter().map(|lore| lore.name.as_str()),
        );
        roster.prayer_lore = first_named(
            &lowered,
            catalog.prayer_lores.iter().map(|lore| lore.name.as_str()),
        );
        roster.manifestation_lore = first_named(
            &lowered,
            catalog.manifestation_lores.iter().map(|lore| lore.name.as_str()),
        )
        .or_else(|| {
            if self.options.universal_manifestation_lores {
                first_named(&lowered, UNIVERSAL_MANIFESTATION_LORES.iter().copied())
            } else {
                None
            }
        });

        let sections = self.segmenter.split(&lowered);
        let parser = ChunkParser::new(catalog, &self.numbers);
        for chunk in sections.regiments {
            let mut units = parser.parse(chunk).into_iter();
            roster.regiments.push(Regiment {
                leader: units.next(),
                followers: units.collect(),
            });
        }
        if let Some(chunk) = sections.auxiliary {
            roster.auxiliary_units = parser.parse(chunk);
        }

        roster.setup_complete = self.options.mark_setup_complete;
        roster
    }

    /// First non-blank line without its `<spent>/<cap> pts` suffix.
    fn roster_name(&self, text: &str) -> String {
        let name = text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(|line| self.points_suffix.replace(line, "").trim().to_string())
            .unwrap_or_default();
        if name.is_empty() {
            self.options.default_name.clone()
        } else {
            name
        }
    }
}

/// Import with default options.
pub async fn import_roster(text: &str, loader: &dyn CatalogLoader) -> Result<Roster> {
    import_roster_with_options(text, loader, ImportOptions::default()).await
}

/// Import with caller-provided options.
pub async fn import_roster_with_options(
    text: &str,
    loader: &dyn CatalogLoader,
    options: ImportOptions,
) -> Result<Roster> {
    Importer::new(options)?.import(text, loader).await
}

fn first_named<'n>(text: &str, names: impl IntoIterator<Item = &'n str>) -> Option<String> {
    names
        .into_iter()
        .find(|name| !name.trim().is_empty() && text.contains(&name.to_lowercase()))
        .map(str::to_string)
}
