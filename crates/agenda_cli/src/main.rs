//! Command-line driver for the agenda core.
//!
//! # Responsibility
//! - Stand in for the presentation layer: render Browse/Agenda views and
//!   forward add/remove/toggle intents to core services.
//! - Resolve configuration from flags over `AGENDA_*` environment variables.

use agenda_core::db::{open_db, Connection};
use agenda_core::{
    derive_browse_view, init_logging_from_config, AgendaConfig, AgendaView, Attraction,
    AttractionId, AttractionType, BrowseQuery, CatalogService, MembershipService, Notification,
    Notifier, Severity, SqliteAttractionRepository, ToggleOutcome, TypeFilter, UserContext,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "agenda", version, about = "Browse conference attractions and manage your agenda")]
struct Cli {
    /// SQLite database path (overrides AGENDA_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Signed-in user id; user-scoped commands are skipped without one.
    #[arg(long, global = true, env = "AGENDA_USER_ID")]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Import attractions from a JSON array file.
    Import { file: PathBuf },
    /// List attractions, optionally filtered.
    Browse {
        #[arg(long, short, default_value = "")]
        search: String,
        /// `all` or an exact type value.
        #[arg(long = "type", short = 't', default_value = "all")]
        kind: String,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Show the personal agenda grouped by date.
    Agenda {
        #[arg(long)]
        json: bool,
    },
    /// Add an attraction to the agenda.
    Add { id: String },
    /// Remove an attraction from the agenda.
    Remove { id: String },
    /// Add when absent, remove when present.
    Toggle { id: String },
    /// Print core linkage info.
    Ping,
}

/// Attraction record as accepted by `import`; `id` is generated when absent.
#[derive(Debug, Deserialize)]
struct ImportRecord {
    id: Option<String>,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    speaker: String,
    #[serde(default)]
    location: String,
    #[serde(rename = "type")]
    kind: String,
    event_date: String,
    start_time: String,
    end_time: String,
}

impl From<ImportRecord> for Attraction {
    fn from(record: ImportRecord) -> Self {
        Self {
            id: record
                .id
                .filter(|id| !id.trim().is_empty())
                .map_or_else(AttractionId::generate, AttractionId::new),
            title: record.title,
            description: record.description,
            speaker: record.speaker,
            location: record.location,
            kind: AttractionType::parse(&record.kind),
            event_date: record.event_date,
            start_time: record.start_time,
            end_time: record.end_time,
        }
    }
}

/// Prints notifications to stderr.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let tag = match notification.severity {
            Severity::Info => "ok",
            Severity::Error => "error",
        };
        eprintln!("[{tag}] {}: {}", notification.title, notification.message);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AgendaConfig::from_env().context("invalid AGENDA_* configuration")?;
    if let Some(db) = cli.db.clone() {
        config.db_path = db;
    }
    init_logging_from_config(&config).context("failed to initialize logging")?;

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let user = cli.user.as_deref().map(UserContext::new);
    let notifier = ConsoleNotifier;

    match cli.command {
        Command::Ping => {
            println!("agenda_core ping={}", agenda_core::ping());
            println!("agenda_core version={}", agenda_core::core_version());
        }
        Command::Import { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let records: Vec<ImportRecord> =
                serde_json::from_str(&raw).context("import file must be a JSON array")?;
            let attractions: Vec<Attraction> = records.into_iter().map(Attraction::from).collect();
            let written = SqliteAttractionRepository::new(&conn).upsert_attractions(&attractions)?;
            println!("imported {written} attraction(s)");
        }
        Command::Browse { search, kind, json } => {
            let catalog = CatalogService::new(SqliteAttractionRepository::new(&conn));
            let memberships = MembershipService::new(SqliteAttractionRepository::new(&conn));
            let Ok(attractions) = catalog.fetch_attractions(&notifier) else {
                return Ok(());
            };
            // A failed sync is already reported; browse still renders.
            let _ = memberships.sync_memberships(user.as_ref(), &notifier);

            let query = BrowseQuery::new(search, TypeFilter::parse(&kind));
            let items = derive_browse_view(
                &attractions,
                &memberships.membership_ids(),
                &memberships.pending_ids(),
                &query,
            );

            if json {
                let rows: Vec<&Attraction> = items.iter().map(|item| item.attraction).collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if items.is_empty() {
                println!("No attractions found. Try adjusting the filters or search terms.");
            } else {
                for item in &items {
                    let marker = if item.in_agenda { "[x]" } else { "[ ]" };
                    print_attraction(marker, item.attraction);
                }
            }
        }
        Command::Agenda { json } => {
            let catalog = CatalogService::new(SqliteAttractionRepository::new(&conn));
            match catalog.fetch_agenda(user.as_ref(), &notifier) {
                Ok(Some(view)) if json => {
                    let groups: Vec<_> = view
                        .into_groups()
                        .into_iter()
                        .map(|group| (group.event_date, group.entries))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&groups)?);
                }
                Ok(Some(view)) => print_agenda(&view),
                Ok(None) => println!("Sign in (--user) to see your agenda."),
                Err(_) => {}
            }
        }
        Command::Add { id } => run_toggle(&conn, user.as_ref(), &notifier, &id, Intent::Add)?,
        Command::Remove { id } => {
            run_toggle(&conn, user.as_ref(), &notifier, &id, Intent::Remove)?
        }
        Command::Toggle { id } => {
            run_toggle(&conn, user.as_ref(), &notifier, &id, Intent::Toggle)?
        }
    }

    Ok(())
}

enum Intent {
    Add,
    Remove,
    Toggle,
}

fn run_toggle(
    conn: &Connection,
    user: Option<&UserContext>,
    notifier: &dyn Notifier,
    id: &str,
    intent: Intent,
) -> Result<()> {
    let service = MembershipService::new(SqliteAttractionRepository::new(conn));
    if service.sync_memberships(user, notifier).is_err() {
        return Ok(());
    }

    let id = AttractionId::new(id);
    let result = match intent {
        Intent::Add => service.add(user, &id, notifier),
        Intent::Remove => service.remove(user, &id, notifier),
        Intent::Toggle => service.toggle(user, &id, notifier),
    };

    match result {
        Ok(ToggleOutcome::Skipped) => println!("Sign in (--user) to change your agenda."),
        Ok(ToggleOutcome::Unchanged) => println!("Nothing to change for {id}."),
        Ok(ToggleOutcome::Added) | Ok(ToggleOutcome::Removed) => {}
        // Repository failures were already reported through the notifier.
        Err(err) => log::debug!("event=cli_toggle module=cli status=error error={err}"),
    }
    Ok(())
}

fn print_attraction(marker: &str, attraction: &Attraction) {
    println!(
        "{marker} {} {} {} [{}] {}",
        attraction.id,
        attraction.event_date,
        attraction.time_range_label(),
        attraction.kind.label(),
        attraction.title
    );
    if !attraction.speaker.is_empty() || !attraction.location.is_empty() {
        println!("      {} @ {}", attraction.speaker, attraction.location);
    }
}

fn print_agenda(view: &AgendaView) {
    if view.is_empty() {
        println!("Your agenda is empty. Add attractions you want to attend.");
        return;
    }

    for group in view.groups() {
        let noun = if group.len() == 1 {
            "attraction"
        } else {
            "attractions"
        };
        println!("== {} ({} {noun})", group.event_date, group.len());
        for entry in &group.entries {
            print_attraction("*", &entry.attraction);
        }
    }
}
