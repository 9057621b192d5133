//! Question commands: show, list, delete

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use quizstore_core::Database;
use serde_json::json;

use super::print_json;

#[derive(Parser, Debug)]
pub struct QuestionArgs {
    #[command(subcommand)]
    pub command: QuestionCommands,
}

#[derive(Subcommand, Debug)]
pub enum QuestionCommands {
    /// Show one question (built-in text is used when the store has none)
    Show {
        /// Question id (1-30 for the built-in quiz)
        id: i64,
    },
    /// List stored questions
    List,
    /// Delete a stored question
    Delete { id: i64 },
}

pub fn run_question(db: &Database, args: QuestionArgs) -> Result<()> {
    match args.command {
        QuestionCommands::Show { id } => {
            let question = db
                .get_question(id)
                .ok_or_else(|| anyhow!("Question {} not found", id))?;
            print_json(&question)
        }
        QuestionCommands::List => {
            let questions: Vec<_> = db.get_all_questions()?.into_values().collect();
            print_json(&questions)
        }
        QuestionCommands::Delete { id } => {
            let deleted = db.delete_question(id)?;
            print_json(&json!({ "id": id, "deleted": deleted }))
        }
    }
}
