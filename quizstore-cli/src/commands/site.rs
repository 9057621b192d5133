//! Website export and sync

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use quizstore_core::{Database, StoreConfig};
use serde_json::json;

use super::print_json;

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Output file (defaults to website.json_path from the config)
    #[arg(long, short = 'o', value_name = "PATH")]
    out: Option<PathBuf>,
}

pub fn run_export(db: &Database, config: &StoreConfig, args: ExportArgs) -> Result<()> {
    let out = args.out.unwrap_or_else(|| config.website.json_path.clone());
    let count = db
        .export_universities_to_json(&out)
        .with_context(|| format!("Failed to export to {}", out.display()))?;
    print_json(&json!({ "path": out.display().to_string(), "universities": count }))
}

pub fn run_sync(db: &Database, config: &StoreConfig) -> Result<()> {
    if !db.sync_website_data(&config.website) {
        bail!("Website sync failed (run with --debug for details)");
    }
    print_json(&json!({
        "json": config.website.json_path.display().to_string(),
        "html": config.website.html_path.display().to_string(),
    }))
}
