//! quizstore CLI - admin front end for the career-guidance quiz store
//!
//! Opens the SQLite store described by `~/.quizstore/config.toml` (or
//! `--config`), and exposes the catalog, statistics and website sync
//! operations of `quizstore-core` as subcommands. Query output is pretty JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quizstore_core::{Database, StoreConfig};
use tracing::debug;

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "quizstore",
    author,
    version,
    about = "Manage the career-guidance quiz database",
    long_about = "Inspect and maintain the quiz store: questions, specializations, \
                  partner universities, user statistics and the website export."
)]
struct Cli {
    /// Config file (defaults to ~/.quizstore/config.toml)
    #[arg(long, global = true, env = "QUIZSTORE_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Database file, overriding the config
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the database file and schema if missing
    Init,
    /// Load the built-in questions and specializations (idempotent)
    Seed,
    /// User, active session and completed test counts
    Stats,
    /// Every user id that ever started a session
    Users,
    /// Quiz questions
    Question(commands::question::QuestionArgs),
    /// Specialization profiles
    Spec(commands::spec::SpecArgs),
    /// Partner universities
    University(commands::university::UniversityArgs),
    /// Write universities.json
    Export(commands::site::ExportArgs),
    /// Regenerate universities.json and the embedded data in universities.html
    Sync,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    let mut config = StoreConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(db) = cli.db {
        config.database.path = db;
    }

    let db = Database::from_config(&config)
        .with_context(|| format!("Failed to open {}", config.database.path.display()))?;
    debug!(path = %db.path().display(), retry = ?db.retry_policy(), "store opened");

    match cli.command {
        Commands::Init => commands::store::run_init(&db)?,
        Commands::Seed => commands::store::run_seed(&db)?,
        Commands::Stats => commands::store::run_stats(&db)?,
        Commands::Users => commands::store::run_users(&db)?,
        Commands::Question(args) => commands::run_question(&db, args)?,
        Commands::Spec(args) => commands::run_spec(&db, args)?,
        Commands::University(args) => commands::run_university(&db, args)?,
        Commands::Export(args) => commands::site::run_export(&db, &config, args)?,
        Commands::Sync => commands::site::run_sync(&db, &config)?,
    }
    Ok(())
}
