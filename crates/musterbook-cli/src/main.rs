mod logging;
mod workspace;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use musterbook_core::fuzzy::LINE_SCAN_THRESHOLD;
use musterbook_core::{
    FactionCatalog, Roster, StandardPoints, find_best_match, find_best_match_in_text,
};
use musterbook_import::{CatalogLoader, FsCatalogLoader, ImportError, ImportOptions, Importer};
use musterbook_rules::{RulesError, ViolationReport, check_roster};
use schemars::schema_for;
use thiserror::Error;
use uuid::Uuid;

use logging::init_logging;
use workspace::{
    RosterStore, WorkspaceError, WorkspacePaths, WorkspaceSettings, load_or_create_settings,
    write_json_atomic,
};

#[derive(Debug, Error)]
enum CliError {
    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),
    #[error("import error: {0}")]
    Import(#[from] ImportError),
    #[error("rules error: {0}")]
    Rules(#[from] RulesError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("roster is not legal ({0} violations)")]
    Illegal(usize),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "musterbook", version, about = "Musterbook roster tools")]
struct Cli {
    /// Workspace directory holding settings, logs and saved rosters.
    #[arg(long, global = true, default_value = ".musterbook")]
    workspace: PathBuf,
    /// Catalog directory; overrides `catalog_dir` from settings.toml.
    #[arg(long, global = true)]
    catalog_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rebuild a roster from an exported plain-text list.
    Import(ImportArgs),
    /// Check a roster against its faction's rules.
    Validate(ValidateArgs),
    /// Suggest catalog unit names close to a misspelled one.
    Suggest(SuggestArgs),
    /// Print the JSON Schema of faction catalog files.
    Schema(SchemaArgs),
    /// Manage saved rosters.
    #[command(subcommand)]
    Rosters(RostersCommand),
}

#[derive(Args, Debug)]
struct ImportArgs {
    /// Exported list to read; `-` reads stdin.
    #[arg(value_name = "FILE")]
    input: PathBuf,
    /// Save the roster to the workspace store.
    #[arg(long, default_value_t = false)]
    save: bool,
    /// Write the roster JSON to this path instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Roster name when the list has no title line.
    #[arg(long)]
    default_name: Option<String>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Roster JSON file.
    #[arg(value_name = "ROSTER", required_unless_present = "id")]
    path: Option<PathBuf>,
    /// Saved roster id.
    #[arg(long, conflicts_with = "path")]
    id: Option<Uuid>,
    /// Print the report as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Exit with an error when the roster has violations.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Args, Debug)]
struct SuggestArgs {
    /// Faction whose units are searched.
    #[arg(long)]
    faction: String,
    /// Misspelled unit name.
    #[arg(value_name = "NAME", required_unless_present = "text")]
    name: Option<String>,
    /// Scan a text file line by line instead.
    #[arg(long, conflicts_with = "name")]
    text: Option<PathBuf>,
    /// Minimum similarity (0..=1).
    #[arg(long)]
    threshold: Option<f64>,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Write the schema to this path instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum RostersCommand {
    /// List saved rosters, most recent first.
    List,
    /// Print a saved roster as JSON.
    Show { id: Uuid },
    /// Delete a saved roster.
    Delete { id: Uuid },
}

struct Context {
    paths: WorkspacePaths,
    settings: WorkspaceSettings,
    catalog_dir: PathBuf,
}

impl Context {
    fn loader(&self) -> FsCatalogLoader {
        FsCatalogLoader::new(&self.catalog_dir)
    }

    fn store(&self) -> RosterStore {
        RosterStore::new(self.paths.resolve(&self.settings.rosters_dir))
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    let paths = WorkspacePaths::new(cli.workspace);
    paths.ensure_dirs()?;
    let settings = load_or_create_settings(&paths)?;
    init_logging(&paths, &settings)?;

    let catalog_dir = match cli.catalog_dir {
        Some(dir) => dir,
        None => paths.resolve(&settings.catalog_dir),
    };
    let ctx = Context {
        paths,
        settings,
        catalog_dir,
    };

    let timer = Instant::now();
    let result = match cli.command {
        Command::Import(args) => run_import(&ctx, args).await,
        Command::Validate(args) => run_validate(&ctx, args).await,
        Command::Suggest(args) => run_suggest(&ctx, args).await,
        Command::Schema(args) => run_schema(args),
        Command::Rosters(command) => run_rosters(&ctx, command),
    };

    let duration_ms = timer.elapsed().as_millis();
    match &result {
        Ok(()) => tracing::info!(event = "command_finished", status = "success", duration_ms),
        Err(err) => {
            tracing::info!(event = "command_finished", status = "error", error = %err, duration_ms)
        }
    }
    result
}

async fn run_import(ctx: &Context, args: ImportArgs) -> Result<(), CliError> {
    let text = read_input(&args.input)?;

    let mut options = ImportOptions::default();
    if let Some(name) = args.default_name {
        options.default_name = name;
    }

    let loader = ctx.loader();
    let mut roster = Importer::new(options)?.import(&text, &loader).await?;
    let catalog = loader.load_faction(&roster.faction).await?;
    let report = check_roster(&roster, &catalog, &StandardPoints);

    if args.save {
        let path = ctx.store().save(&mut roster)?;
        println!("saved roster {} to {}", roster.id, path.display());
    }
    match &args.out {
        Some(out) => {
            write_json_atomic(out, &roster)?;
            tracing::info!(event = "roster_written", path = %out.display());
        }
        None if !args.save => println!("{}", serde_json::to_string_pretty(&roster)?),
        None => {}
    }

    print_report(&report, &roster, &catalog, ctx.settings.suggestion_threshold);
    Ok(())
}

async fn run_validate(ctx: &Context, args: ValidateArgs) -> Result<(), CliError> {
    let roster = match (&args.path, args.id) {
        (Some(path), None) => {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str::<Roster>(&content)?
        }
        (None, Some(id)) => ctx.store().load(id)?,
        _ => {
            return Err(CliError::InvalidConfig(
                "use either a roster path or --id".to_string(),
            ));
        }
    };

    let catalog = load_roster_catalog(&ctx.loader(), &roster.faction).await?;
    let report = check_roster(&roster, &catalog, &StandardPoints);
    tracing::info!(
        event = "roster_validated",
        roster = %roster.name,
        faction = %roster.faction,
        violations = report.len()
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_ok() {
        println!("{} is legal", roster.name);
    } else {
        print_report(&report, &roster, &catalog, ctx.settings.suggestion_threshold);
    }

    if args.strict && !report.is_ok() {
        return Err(CliError::Illegal(report.len()));
    }
    Ok(())
}

async fn run_suggest(ctx: &Context, args: SuggestArgs) -> Result<(), CliError> {
    let catalog = load_roster_catalog(&ctx.loader(), &args.faction).await?;
    let candidates: Vec<&str> = catalog
        .rosterable_units()
        .map(|unit| unit.name.as_str())
        .collect();

    match (args.name, args.text) {
        (Some(name), None) => {
            let threshold = args.threshold.unwrap_or(ctx.settings.suggestion_threshold);
            match find_best_match(&name, &candidates, threshold) {
                Some(found) => println!("{} ({:.2})", found.candidate, found.score),
                None => println!("no unit close to '{name}'"),
            }
        }
        (None, Some(path)) => {
            let text = read_input(&path)?;
            let threshold = args.threshold.unwrap_or(LINE_SCAN_THRESHOLD);
            match find_best_match_in_text(&text, &candidates, threshold) {
                Some(found) => println!(
                    "{} ({:.2}) from line: {}",
                    found.candidate, found.score, found.line
                ),
                None => println!("no line close to a {} unit", catalog.name),
            }
        }
        _ => {
            return Err(CliError::InvalidConfig(
                "use either a name or --text".to_string(),
            ));
        }
    }
    Ok(())
}

fn run_schema(args: SchemaArgs) -> Result<(), CliError> {
    let schema = schema_for!(FactionCatalog);
    match args.out {
        Some(out) => write_json_atomic(&out, &schema)?,
        None => println!("{}", serde_json::to_string_pretty(&schema)?),
    }
    Ok(())
}

fn run_rosters(ctx: &Context, command: RostersCommand) -> Result<(), CliError> {
    let store = ctx.store();
    match command {
        RostersCommand::List => {
            for roster in store.list()? {
                let updated = roster
                    .updated_at
                    .map(|at| at.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{}  {}  {}  {}",
                    roster.id, roster.name, roster.faction, updated
                );
            }
        }
        RostersCommand::Show { id } => {
            let roster = store.load(id)?;
            println!("{}", serde_json::to_string_pretty(&roster)?);
        }
        RostersCommand::Delete { id } => {
            store.delete(id)?;
            println!("deleted roster {id}");
        }
    }
    Ok(())
}

/// Catalog for a roster's faction; an unlisted faction is a rules error.
async fn load_roster_catalog(
    loader: &dyn CatalogLoader,
    faction: &str,
) -> Result<FactionCatalog, CliError> {
    let factions = loader.factions().await?;
    let Some(name) = factions
        .iter()
        .find(|name| name.eq_ignore_ascii_case(faction.trim()))
    else {
        return Err(RulesError::UnknownFaction(faction.to_string()).into());
    };
    Ok(loader.load_faction(name).await?)
}

fn read_input(path: &Path) -> Result<String, CliError> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(std::fs::read_to_string(path)?)
}

fn print_report(
    report: &ViolationReport,
    roster: &Roster,
    catalog: &FactionCatalog,
    threshold: f64,
) {
    if report.is_ok() {
        eprintln!("no violations");
        return;
    }

    eprintln!("{} violation(s):", report.len());
    for violation in &report.violations {
        eprintln!("  {}", violation.message);
    }

    let candidates: Vec<&str> = catalog
        .rosterable_units()
        .map(|unit| unit.name.as_str())
        .collect();
    let mut suggested: Vec<&str> = Vec::new();
    for unit in roster.units() {
        let name = unit.name.trim();
        if name.is_empty() || catalog.unit(name).is_some() || suggested.contains(&name) {
            continue;
        }
        suggested.push(name);
        if let Some(found) = find_best_match(name, &candidates, threshold) {
            eprintln!("  did you mean '{}' for '{}'?", found.candidate, name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_loader() -> FsCatalogLoader {
        FsCatalogLoader::new(
            Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/catalogs"),
        )
    }

    #[test]
    fn validate_requires_path_or_id() {
        assert!(Cli::try_parse_from(["musterbook", "validate"]).is_err());
        let cli = Cli::try_parse_from(["musterbook", "validate", "list.json", "--strict"])
            .expect("parse validate");
        let Command::Validate(args) = cli.command else {
            panic!("expected validate command");
        };
        assert_eq!(args.path, Some(PathBuf::from("list.json")));
        assert!(args.strict);
        assert_eq!(cli.workspace, PathBuf::from(".musterbook"));
    }

    #[test]
    fn suggest_name_and_text_conflict() {
        let parsed = Cli::try_parse_from([
            "musterbook",
            "suggest",
            "--faction",
            "Gloomspite Gitz",
            "Stabas",
            "--text",
            "list.txt",
        ]);
        assert!(parsed.is_err());
    }

    #[tokio::test]
    async fn roster_catalog_matches_faction_case_insensitively() {
        let catalog = load_roster_catalog(&fixture_loader(), " gloomspite gitz ")
            .await
            .expect("load catalog");
        assert_eq!(catalog.name, "Gloomspite Gitz");
    }

    #[tokio::test]
    async fn unlisted_faction_is_a_rules_error() {
        let err = load_roster_catalog(&fixture_loader(), "Sylvaneth")
            .await
            .expect_err("unknown faction");
        assert!(matches!(
            err,
            CliError::Rules(RulesError::UnknownFaction(ref name)) if name == "Sylvaneth"
        ));
    }
}
