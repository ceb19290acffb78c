use std::env;
use std::path::{Path, PathBuf};

use musterbook_core::{FactionCatalog, Roster, StandardPoints};
use musterbook_rules::check_roster;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let mut roster_path: Option<PathBuf> = None;
    let mut catalog_path: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--catalog" => {
                catalog_path = args.next().map(PathBuf::from);
            }
            _ => {
                if roster_path.is_none() {
                    roster_path = Some(PathBuf::from(arg));
                } else {
                    return Err("unexpected argument".into());
                }
            }
        }
    }

    let roster_path = roster_path.ok_or("missing roster path")?;
    let catalog_path = catalog_path.ok_or("missing --catalog path")?;

    let roster: Roster = serde_json::from_str(&read(&roster_path)?)?;
    let catalog: FactionCatalog = serde_json::from_str(&read(&catalog_path)?)?;
    if !catalog.name.eq_ignore_ascii_case(&roster.faction) {
        return Err(format!(
            "roster faction '{}' does not match catalog '{}'",
            roster.faction, catalog.name
        )
        .into());
    }

    let report = check_roster(&roster, &catalog, &StandardPoints);
    if report.is_ok() {
        println!("roster is legal");
        return Ok(());
    }

    eprintln!("roster has {} violation(s)", report.len());
    for violation in &report.violations {
        eprintln!("{} {}", violation.rule.code(), violation.message);
    }
    std::process::exit(1);
}

fn read(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    Ok(std::fs::read_to_string(path)?)
}
