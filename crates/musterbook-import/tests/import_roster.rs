use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use musterbook_core::{FactionCatalog, WeaponChoice};
use musterbook_import::{
    CatalogLoader, FsCatalogLoader, ImportError, ImportOptions, Importer, import_roster,
};
use musterbook_rules::validate_roster;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures")
}

fn loader() -> FsCatalogLoader {
    FsCatalogLoader::new(fixtures().join("catalogs"))
}

fn troggs_text() -> Result<String> {
    let path = fixtures().join("lists/troggs.txt");
    std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
}

#[tokio::test]
async fn imports_exported_troggs_list() -> Result<()> {
    let roster = import_roster(&troggs_text()?, &loader()).await?;

    assert_eq!(roster.name, "Troggs");
    assert_eq!(roster.faction, "Gloomspite Gitz");
    assert_eq!(roster.formation, "Troggherd");
    assert_eq!(roster.spell_lore.as_deref(), Some("Lore of the Clammy Dank"));
    assert_eq!(roster.manifestation_lore.as_deref(), Some("Forbidden Power"));
    assert_eq!(roster.prayer_lore, None);
    assert!(roster.setup_complete);

    assert_eq!(roster.regiments.len(), 2);
    let general = roster.regiments[0].leader.as_ref().context("general's leader")?;
    assert_eq!(general.name, "Dankhold Troggboss");
    assert!(general.general);
    assert_eq!(general.heroic_trait.as_deref(), Some("Loquacious Lungs"));
    let followers: Vec<(&str, bool)> = roster.regiments[0]
        .followers
        .iter()
        .map(|unit| (unit.name.as_str(), unit.reinforced))
        .collect();
    assert_eq!(
        followers,
        vec![
            ("Dankhold Troggoths", false),
            ("Rockgut Troggoths", true),
            ("Fellwater Troggoths", false),
        ]
    );

    let second = &roster.regiments[1];
    let leader = second.leader.as_ref().context("second leader")?;
    assert_eq!(leader.name, "Loonboss");
    assert!(!leader.general);
    assert_eq!(leader.artifact.as_deref(), Some("Glowy Howzit"));
    assert_eq!(second.followers.len(), 2);
    assert_eq!(
        second.followers[0].weapons.get("Stabbas"),
        Some(&vec![
            WeaponChoice::new("Stabba", Some(12)),
            WeaponChoice::new("Pokin' Spear", Some(8)),
            WeaponChoice::new("Barbed Net", Some(3)),
        ])
    );
    assert_eq!(second.followers[1].name, "Loonsmasha Fanatics");

    let auxiliary: Vec<&str> = roster
        .auxiliary_units
        .iter()
        .map(|unit| unit.name.as_str())
        .collect();
    assert_eq!(auxiliary, vec!["Squig Hoppers"]);
    Ok(())
}

#[tokio::test]
async fn imported_troggs_list_is_legal() -> Result<()> {
    let loader = loader();
    let roster = import_roster(&troggs_text()?, &loader).await?;
    let catalog = loader.load_faction(&roster.faction).await?;

    let messages = validate_roster(&roster, &musterbook_core::CatalogSet::new(vec![catalog]))?;
    assert!(messages.is_empty(), "unexpected violations: {messages:?}");
    Ok(())
}

#[tokio::test]
async fn unknown_faction_aborts_import() -> Result<()> {
    let err = import_roster("My list\nRegiment\nLoonboss", &loader())
        .await
        .expect_err("no faction named");
    assert!(matches!(err, ImportError::UnknownFaction));
    Ok(())
}

#[tokio::test]
async fn faction_detection_follows_loader_order() -> Result<()> {
    let text = "Allies\nGloomspite Gitz and Stormcast Eternals\nRegiment\nLord-Celestant\n";
    let roster = import_roster(text, &loader()).await?;
    assert_eq!(roster.faction, "Stormcast Eternals");
    assert_eq!(roster.formation, "Thunderhead Host");
    assert_eq!(roster.name, "Allies");
    assert_eq!(roster.regiments.len(), 1);
    Ok(())
}

#[tokio::test]
async fn list_without_sections_has_no_units() -> Result<()> {
    let roster = import_roster("Gloomspite Gitz\nLoonboss\nStabbas", &loader()).await?;
    assert_eq!(roster.name, "Gloomspite Gitz");
    assert_eq!(roster.formation, "Bad Moon Madmob");
    assert!(roster.regiments.is_empty());
    assert!(roster.auxiliary_units.is_empty());
    Ok(())
}

#[tokio::test]
async fn universal_lore_fallback_can_be_disabled() -> Result<()> {
    let options = ImportOptions {
        universal_manifestation_lores: false,
        ..ImportOptions::default()
    };
    let roster = Importer::new(options)?
        .import(&troggs_text()?, &loader())
        .await?;
    assert_eq!(roster.manifestation_lore, None);
    Ok(())
}

#[tokio::test]
async fn empty_regiment_block_has_no_leader() -> Result<()> {
    let text = "Gloomspite Gitz\nRegiment 1\nnothing here\nRegiment 2\nLoonboss\nStabbas";
    let roster = import_roster(text, &loader()).await?;
    assert_eq!(roster.regiments.len(), 2);
    assert!(roster.regiments[0].leader.is_none());
    assert!(roster.regiments[0].followers.is_empty());
    assert_eq!(roster.regiments[1].followers.len(), 1);
    Ok(())
}

struct BrokenLoader;

#[async_trait]
impl CatalogLoader for BrokenLoader {
    async fn factions(&self) -> musterbook_import::Result<Vec<String>> {
        Ok(vec!["Gloomspite Gitz".to_string()])
    }

    async fn load_faction(&self, _name: &str) -> musterbook_import::Result<FactionCatalog> {
        Err(ImportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "catalog file missing",
        )))
    }
}

#[tokio::test]
async fn catalog_failure_is_reported_as_catalog_error() -> Result<()> {
    let err = import_roster("Gloomspite Gitz\nRegiment\nLoonboss", &BrokenLoader)
        .await
        .expect_err("catalog cannot load");
    match err {
        ImportError::Catalog(message) => {
            assert!(message.starts_with("Gloomspite Gitz:"), "{message}");
            assert!(message.contains("catalog file missing"));
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}
