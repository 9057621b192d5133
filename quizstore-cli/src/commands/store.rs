use anyhow::Result;
use quizstore_core::Database;
use serde_json::json;

use super::print_json;

pub fn run_init(db: &Database) -> Result<()> {
    print_json(&json!({ "database": db.path().display().to_string() }))
}

pub fn run_seed(db: &Database) -> Result<()> {
    let report = db.seed_from_fallback()?;
    print_json(&report)
}

pub fn run_stats(db: &Database) -> Result<()> {
    print_json(&db.get_user_statistics()?)
}

pub fn run_users(db: &Database) -> Result<()> {
    print_json(&db.get_all_users()?)
}
