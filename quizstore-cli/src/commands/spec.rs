//! Specialization commands: list, show, delete

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use quizstore_core::Database;
use serde_json::json;

use super::print_json;

#[derive(Parser, Debug)]
pub struct SpecArgs {
    #[command(subcommand)]
    pub command: SpecCommands,
}

#[derive(Subcommand, Debug)]
pub enum SpecCommands {
    /// List stored specializations
    List {
        /// Print names only, sorted case-insensitively
        #[arg(long)]
        names: bool,
    },
    /// Show one specialization by name (built-in profile when not stored)
    Show { name: String },
    /// Delete a specialization; its universities keep the dangling id
    Delete { id: i64 },
}

pub fn run_spec(db: &Database, args: SpecArgs) -> Result<()> {
    match args.command {
        SpecCommands::List { names: true } => print_json(&db.get_specialization_names()?),
        SpecCommands::List { names: false } => {
            let specs: Vec<_> = db.get_all_specializations()?.into_values().collect();
            print_json(&specs)
        }
        SpecCommands::Show { name } => {
            let spec = db
                .get_specialization(&name)
                .ok_or_else(|| anyhow!("Specialization '{}' not found", name))?;
            print_json(&spec)
        }
        SpecCommands::Delete { id } => {
            let deleted = db.delete_specialization(id)?;
            print_json(&json!({ "id": id, "deleted": deleted }))
        }
    }
}
