use std::fs;
use std::path::Path;

use musterbook_core::{
    CatalogSet, FactionCatalog, Regiment, Roster, StandardPoints, UnitSelection, WeaponChoice,
};
use musterbook_rules::{RuleKind, RulesError, check_roster, validate_roster};

fn load_catalog(file: &str) -> FactionCatalog {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures/catalogs")
        .join(file);
    let contents =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing json at {}", path.display()));
    serde_json::from_str(&contents).expect("parse catalog json")
}

fn catalogs() -> CatalogSet {
    CatalogSet::new(vec![
        load_catalog("stormcast_eternals.json"),
        load_catalog("gloomspite_gitz.json"),
    ])
}

fn gitz_roster() -> Roster {
    Roster::new("Test", "Gloomspite Gitz", "Troggherd")
}

fn general(name: &str) -> UnitSelection {
    UnitSelection {
        general: true,
        ..UnitSelection::new(name)
    }
}

fn units(names: &[&str]) -> Vec<UnitSelection> {
    names.iter().map(|name| UnitSelection::new(*name)).collect()
}

fn validate(roster: &Roster) -> Vec<String> {
    validate_roster(roster, &catalogs()).expect("known faction")
}

fn legal_troggs() -> Roster {
    let mut roster = gitz_roster();
    roster.regiments.push(Regiment::with_followers(
        UnitSelection {
            heroic_trait: Some("Loquacious Lungs".to_string()),
            ..general("Dankhold Troggboss")
        },
        vec![
            UnitSelection::new("Dankhold Troggoths"),
            UnitSelection {
                reinforced: true,
                ..UnitSelection::new("Rockgut Troggoths")
            },
            UnitSelection::new("Fellwater Troggoths"),
        ],
    ));

    let mut stabbas = UnitSelection::new("Stabbas");
    stabbas.weapons.insert(
        "Stabbas".to_string(),
        vec![
            WeaponChoice::new("Stabba", Some(12)),
            WeaponChoice::new("Pokin' Spear", Some(8)),
            WeaponChoice::new("Barbed Net", Some(3)),
        ],
    );
    roster.regiments.push(Regiment::with_followers(
        UnitSelection {
            artifact: Some("Glowy Howzit".to_string()),
            ..UnitSelection::new("Loonboss")
        },
        vec![stabbas, UnitSelection::new("Loonsmasha Fanatics")],
    ));
    roster.auxiliary_units.push(UnitSelection::new("Squig Hoppers"));
    roster.spell_lore = Some("Lore of the Clammy Dank".to_string());
    roster
}

#[test]
fn legal_roster_has_no_violations() {
    let messages = validate(&legal_troggs());
    assert!(messages.is_empty(), "unexpected violations: {messages:?}");
}

#[test]
fn unknown_faction_is_an_error() {
    let roster = Roster::new("Test", "Seraphon", "Sunclaw Starhost");
    let err = validate_roster(&roster, &catalogs()).expect_err("faction is unknown");
    assert!(matches!(err, RulesError::UnknownFaction(name) if name == "Seraphon"));
}

#[test]
fn general_led_regiment_takes_four_followers() {
    let followers = units(&[
        "Dankhold Troggoths",
        "Rockgut Troggoths",
        "Fellwater Troggoths",
        "Fellwater Troggoths",
    ]);

    let mut roster = gitz_roster();
    roster.regiments.push(Regiment::with_followers(
        general("Dankhold Troggboss"),
        followers.clone(),
    ));
    let messages = validate(&roster);
    assert!(
        !messages.iter().any(|message| message.contains("No more than 4 units")),
        "{messages:?}"
    );
    assert!(!messages.iter().any(|message| message.contains("No more than 3 units")));

    let mut roster = gitz_roster();
    roster.regiments.push(Regiment::with_followers(
        UnitSelection::new("Dankhold Troggboss"),
        followers,
    ));
    let messages = validate(&roster);
    assert!(messages.contains(
        &"Regiment 1 (Dankhold Troggboss): No more than 3 units may join this regiment (4 present)"
            .to_string()
    ));
}

#[test]
fn non_hero_leader_is_reported() {
    let mut roster = gitz_roster();
    roster.regiments.push(Regiment::new(general("Stabbas")));
    let messages = validate(&roster);
    assert!(
        messages
            .iter()
            .any(|message| message.contains("must have the Hero category")),
        "{messages:?}"
    );
}

#[test]
fn duplicate_unique_unit_is_reported_once() {
    let mut roster = gitz_roster();
    roster.regiments.push(Regiment::new(general("Skragrott, the Loonking")));
    roster.regiments.push(Regiment::new(UnitSelection::new(
        "Skragrott, the Loonking",
    )));
    roster
        .auxiliary_units
        .push(UnitSelection::new("Skragrott, the Loonking"));

    let messages = validate(&roster);
    let duplicates: Vec<&String> = messages
        .iter()
        .filter(|message| message.starts_with("Duplicate unique unit"))
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0], "Duplicate unique unit: Skragrott, the Loonking");
}

#[test]
fn unique_unit_cannot_take_enhancements() {
    let mut roster = gitz_roster();
    roster.regiments.push(Regiment::new(UnitSelection {
        artifact: Some("Glowy Howzit".to_string()),
        ..general("Skragrott, the Loonking")
    }));
    let catalogs = catalogs();
    let faction = catalogs.faction("Gloomspite Gitz").expect("catalog");
    let report = check_roster(&roster, faction, &StandardPoints);
    assert_eq!(report.for_rule(RuleKind::UniqueEnhancement).count(), 1);
}

#[test]
fn warmaster_must_be_general() {
    let mut roster = gitz_roster();
    roster.regiments.push(Regiment::with_followers(
        general("Loonboss"),
        units(&["Stabbas"]),
    ));
    roster.regiments.push(Regiment::new(UnitSelection::new(
        "Skragrott, the Loonking",
    )));
    let messages = validate(&roster);
    assert!(
        messages.contains(&"A Warmaster must be your general: Skragrott, the Loonking".to_string())
    );
}

#[test]
fn general_count_must_be_exactly_one() {
    let mut roster = gitz_roster();
    roster.regiments.push(Regiment::new(UnitSelection::new("Loonboss")));
    assert!(validate(&roster).contains(&"A general must be selected".to_string()));

    roster.regiments.push(Regiment::new(general("Dankhold Troggboss")));
    roster.regiments[0].leader = Some(general("Loonboss"));
    assert!(
        validate(&roster).contains(&"Only one general may be selected (2 selected)".to_string())
    );
}

#[test]
fn companions_must_travel_together() {
    let mut roster = Roster::new("Test", "Stormcast Eternals", "Thunderhead Host");
    roster.regiments.push(Regiment::new(general("Knight-Draconis")));
    roster.regiments.push(Regiment::with_followers(
        UnitSelection::new("Lord-Celestant"),
        units(&["Stormdrake Guard"]),
    ));

    let messages = validate(&roster);
    assert!(
        messages.contains(&"Knight-Draconis's regiment must include Stormdrake Guard".to_string())
    );
    assert!(messages.contains(&"Stormdrake Guard must be led by Knight-Draconis".to_string()));
}

#[test]
fn points_cap_counts_reinforced_units_twice() {
    let mut roster = gitz_roster();
    roster.regiments.push(Regiment::with_followers(
        general("Dankhold Troggboss"),
        units(&["Dankhold Troggoths", "Dankhold Troggoths", "Dankhold Troggoths"]),
    ));
    for unit in &mut roster.regiments[0].followers {
        unit.reinforced = true;
    }

    let messages = validate(&roster);
    assert!(
        messages.contains(&"Roster is 2180 points, exceeding the 2000 point limit".to_string())
    );
    assert_eq!(
        messages
            .iter()
            .filter(|message| message.ends_with("cannot be reinforced"))
            .count(),
        3
    );
}

#[test]
fn too_many_regiments_are_reported() {
    let mut roster = gitz_roster();
    roster.regiments.push(Regiment::new(general("Loonboss")));
    for _ in 0..5 {
        roster.regiments.push(Regiment::new(UnitSelection::new("Loonboss")));
    }
    assert!(
        validate(&roster)
            .contains(&"No more than 5 regiments may be fielded (6 present)".to_string())
    );
}

#[test]
fn grouped_weapons_must_cover_the_unit() {
    let mut stabbas = UnitSelection::new("Stabbas");
    stabbas.weapons.insert(
        "Stabbas".to_string(),
        vec![
            WeaponChoice::new("Stabba", Some(10)),
            WeaponChoice::new("Pokin' Spear", Some(5)),
        ],
    );
    let mut roster = gitz_roster();
    roster.regiments.push(Regiment::with_followers(general("Loonboss"), vec![stabbas]));

    let messages = validate(&roster);
    assert!(messages.contains(
        &"Stabbas: Stabbas weapon selections must be exactly 20 (selected 15)".to_string()
    ));
}

#[test]
fn enhancements_are_list_wide_singletons() {
    let mut roster = legal_troggs();
    roster.regiments[1].leader = Some(UnitSelection {
        heroic_trait: Some("Loquacious Lungs".to_string()),
        ..UnitSelection::new("Loonboss")
    });

    let messages = validate(&roster);
    assert!(messages.contains(&"Only one heroic trait may be selected (2 selected)".to_string()));
    assert!(messages.contains(&"Loquacious Lungs is assigned to more than one unit".to_string()));
}

#[test]
fn artifacts_and_table_enhancements_are_singletons() {
    let mut roster = legal_troggs();
    roster.auxiliary_units[0].artifact = Some("Backstabber's Blade".to_string());
    let followers = &mut roster.regiments[0].followers;
    followers[1]
        .enhancements
        .insert("Troggoth Blessings".to_string(), "Aura of Haphazard Healing".to_string());
    followers[2]
        .enhancements
        .insert("Troggoth Blessings".to_string(), "Krazogg's Grunt".to_string());

    let messages = validate(&roster);
    assert!(messages.contains(&"Only one artifact may be selected (2 selected)".to_string()));
    assert!(messages.contains(
        &"Only one enhancement from Troggoth Blessings may be selected (2 selected)".to_string()
    ));
    assert!(!messages.iter().any(|message| message.contains("more than one unit")));
}

#[test]
fn unknown_trait_and_artifact_are_reported() {
    let mut roster = legal_troggs();
    roster.regiments[0].leader = Some(UnitSelection {
        heroic_trait: Some("Loud Mouth".to_string()),
        ..general("Dankhold Troggboss")
    });
    roster.regiments[1].leader = Some(UnitSelection {
        artifact: Some("Shiny Rock".to_string()),
        ..UnitSelection::new("Loonboss")
    });

    let messages = validate(&roster);
    assert!(
        messages.contains(&"Unknown heroic trait: Loud Mouth (Dankhold Troggboss)".to_string())
    );
    assert!(messages.contains(&"Unknown artifact: Shiny Rock (Loonboss)".to_string()));
}

#[test]
fn follower_outside_every_option_cannot_join() {
    let mut roster = gitz_roster();
    roster.regiments.push(Regiment::with_followers(
        general("Dankhold Troggboss"),
        units(&["Rockgut Troggoths", "Stabbas"]),
    ));

    let messages = validate(&roster);
    assert!(messages.contains(&"Stabbas cannot join Dankhold Troggboss's regiment".to_string()));
    assert!(!messages.iter().any(|message| message.starts_with("Rockgut Troggoths cannot join")));
}

#[test]
fn capped_option_limits_matching_followers() {
    let mut roster = gitz_roster();
    roster.regiments.push(Regiment::with_followers(
        general("Loonboss"),
        units(&["Rockgut Troggoths", "Fellwater Troggoths", "Stabbas"]),
    ));

    let messages = validate(&roster);
    assert!(messages.contains(
        &"Loonboss's regiment may include at most 1 units matching Troggoth (2 present)"
            .to_string()
    ));
    assert!(!messages.iter().any(|message| message.contains("cannot join")));
}

#[test]
fn hero_followers_need_a_matching_option() {
    let mut roster = gitz_roster();
    roster.regiments.push(Regiment::with_followers(
        general("Dankhold Troggboss"),
        units(&["Loonboss", "Loonboss on Giant Cave Squig"]),
    ));

    let messages = validate(&roster);
    assert!(
        messages.contains(
            &"Dankhold Troggboss's regiment may include at most 1 Moonclan Hero (2 present)"
                .to_string()
        ),
        "{messages:?}"
    );
    assert!(messages.contains(
        &"Dankhold Troggboss's regiment may include at most 1 units matching Moonclan Hero \
          (2 present)"
            .to_string()
    ));
    assert!(!messages.iter().any(|message| message.contains("is a Hero and cannot join")));

    let mut roster = gitz_roster();
    roster.regiments.push(Regiment::with_followers(
        general("Loonboss"),
        units(&["Dankhold Troggboss"]),
    ));
    assert!(validate(&roster).contains(
        &"Dankhold Troggboss is a Hero and cannot join Loonboss's regiment".to_string()
    ));
}

#[test]
fn variant_and_base_unit_are_exclusive() {
    let mut roster = gitz_roster();
    roster.regiments.push(Regiment::with_followers(
        general("Dankhold Troggboss"),
        units(&["Rockgut Troggoths", "Rockgut Troggoths (Scourge of Ghyran)"]),
    ));
    assert!(validate(&roster).contains(
        &"Rockgut Troggoths (Scourge of Ghyran) and Rockgut Troggoths cannot both be included"
            .to_string()
    ));
}

#[test]
fn undersize_units_are_capped_by_condition_unit() {
    let mut roster = gitz_roster();
    roster.regiments.push(Regiment::with_followers(
        general("Loonboss"),
        units(&["Stabbas", "Loonsmasha Fanatics", "Loonsmasha Fanatics"]),
    ));
    assert!(validate(&roster).contains(
        &"Loonsmasha Fanatics: 2 included but only 1 allowed (one per Stabbas)".to_string()
    ));
}

#[test]
fn unresolvable_names_are_reported_once_and_skipped() {
    let mut roster = gitz_roster();
    roster.regiments.push(Regiment::with_followers(
        general("Gobbapalooza"),
        units(&["Gobbapalooza", "Stabbas"]),
    ));
    roster.regiments.push(Regiment::default());
    roster.auxiliary_units.push(UnitSelection {
        enhancements: [("Troggoth Blessings".to_string(), "Mystery Gift".to_string())]
            .into_iter()
            .collect(),
        ..UnitSelection::new("Squig Hoppers")
    });

    let messages = validate(&roster);
    assert_eq!(
        messages
            .iter()
            .filter(|message| message.as_str() == "Unknown unit: Gobbapalooza")
            .count(),
        1
    );
    assert!(messages.contains(&"Regiment 2 has no leader".to_string()));
    assert!(messages.contains(
        &"Unknown enhancement: Mystery Gift from Troggoth Blessings (Squig Hoppers)".to_string()
    ));
    assert!(!messages.iter().any(|message| message.contains("Hero category")));
}

#[test]
fn sparse_roster_is_total() {
    let json = r#"{
        "name": "Sparse",
        "faction": "Gloomspite Gitz",
        "formation": "",
        "regiments": [
            { "leader": { "name": "" }, "followers": [ { "name": "Stabbas" } ] },
            { "followers": [] }
        ]
    }"#;
    let roster: Roster = serde_json::from_str(json).expect("parse sparse roster");
    let messages = validate(&roster);
    assert!(messages.contains(&"Regiment 1 has no leader".to_string()));
    assert!(messages.contains(&"Regiment 2 has no leader".to_string()));
    assert!(messages.contains(&"A general must be selected".to_string()));
}

#[test]
fn categories_are_reported_in_rule_order() {
    let mut roster = gitz_roster();
    roster.regiments.push(Regiment::new(UnitSelection::new("Stabbas")));
    roster.regiments.push(Regiment::default());

    let catalog = catalogs();
    let faction = catalog.faction("Gloomspite Gitz").expect("catalog");
    let report = check_roster(&roster, faction, &StandardPoints);
    let rules: Vec<RuleKind> = report.violations.iter().map(|violation| violation.rule).collect();
    assert_eq!(
        rules,
        vec![
            RuleKind::General,
            RuleKind::LeaderCategory,
            RuleKind::LeaderAssignment,
        ]
    );
}
