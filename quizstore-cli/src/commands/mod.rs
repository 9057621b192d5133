//! Command implementations for the quizstore CLI

pub mod question;
pub mod site;
pub mod spec;
pub mod store;
pub mod university;

use anyhow::Result;
use serde::Serialize;

pub use question::run_question;
pub use spec::run_spec;
pub use university::run_university;

/// Pretty JSON on stdout
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
