//! University commands: list, unique, add, delete, delete-name

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use quizstore_core::{Database, NewUniversity};
use serde_json::json;

use super::print_json;

#[derive(Parser, Debug)]
pub struct UniversityArgs {
    #[command(subcommand)]
    pub command: UniversityCommands,
}

#[derive(Subcommand, Debug)]
pub enum UniversityCommands {
    /// List universities, optionally for one specialization
    List {
        /// Specialization name
        #[arg(long, short = 's')]
        spec: Option<String>,
    },
    /// One entry per distinct university name
    Unique,
    /// Add a university row
    Add(AddUniversityArgs),
    /// Delete one row by id
    Delete { id: i64 },
    /// Delete every row with this exact name
    DeleteName { name: String },
}

#[derive(Parser, Debug)]
pub struct AddUniversityArgs {
    /// University name
    name: String,

    /// Specialization name the program belongs to
    #[arg(long, short = 's')]
    spec: Option<String>,

    /// Minimum admission score
    #[arg(long)]
    score_min: Option<f64>,

    /// Maximum admission score
    #[arg(long)]
    score_max: Option<f64>,

    /// Address; the text before the first comma is used as the city
    #[arg(long)]
    location: Option<String>,

    #[arg(long)]
    url: Option<String>,
}

pub fn run_university(db: &Database, args: UniversityArgs) -> Result<()> {
    match args.command {
        UniversityCommands::List { spec: Some(name) } => print_json(&db.get_universities(&name)?),
        UniversityCommands::List { spec: None } => print_json(&db.get_all_universities()?),
        UniversityCommands::Unique => print_json(&db.get_unique_universities()?),
        UniversityCommands::Add(add) => run_add(db, add),
        UniversityCommands::Delete { id } => {
            let deleted = db.delete_university(id)?;
            print_json(&json!({ "id": id, "deleted": deleted }))
        }
        UniversityCommands::DeleteName { name } => {
            let deleted = db.delete_university_by_name(&name)?;
            print_json(&json!({ "name": name, "deleted": deleted }))
        }
    }
}

fn run_add(db: &Database, args: AddUniversityArgs) -> Result<()> {
    let specialization_id = match &args.spec {
        Some(name) => Some(
            db.get_specialization_id_by_name(name)?
                .ok_or_else(|| anyhow!("Specialization '{}' is not stored. Run `quizstore seed` first", name))?,
        ),
        None => None,
    };

    let id = db.add_university(&NewUniversity {
        name: args.name,
        specialization_id,
        score_min: args.score_min,
        score_max: args.score_max,
        location: args.location,
        url: args.url,
    })?;

    print_json(&json!({ "id": id }))
}
