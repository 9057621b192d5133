use chrono::Utc;
use rusqlite::params;
use tracing::info;

use super::{format_datetime, Database};
use crate::error::{Result, StoreError};
use crate::fallback;
use crate::models::SeedReport;

impl Database {
    /// Copy the built-in quiz and specialization catalog into the store.
    ///
    /// Rows keep their built-in ids; ids already present are left alone.
    pub fn seed_from_fallback(&self) -> Result<SeedReport> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let now = format_datetime(Utc::now());
        let mut report = SeedReport::default();

        for question in fallback::questions().values() {
            let options = serde_json::to_string(&question.options)
                .map_err(|e| StoreError::json(format!("options of question {}", question.id), e))?;
            report.questions += tx.execute(
                r#"
                INSERT OR IGNORE INTO questions (id, text, options, category, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![question.id, question.text, options, question.category, now],
            )?;
        }

        for spec in fallback::specializations() {
            report.specializations += tx.execute(
                r#"
                INSERT OR IGNORE INTO specializations
                    (id, name, description, tech_score, analytic_score, creative_score, careers, skills)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    spec.id,
                    spec.name,
                    spec.description,
                    spec.tech_score,
                    spec.analytic_score,
                    spec.creative_score,
                    spec.careers,
                    spec.skills,
                ],
            )?;
        }

        tx.commit()?;
        info!(
            questions = report.questions,
            specializations = report.specializations,
            "seeded built-in content"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeding_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        let first = db.seed_from_fallback().unwrap();
        assert_eq!(first.questions, 30);
        assert_eq!(first.specializations, 8);

        let second = db.seed_from_fallback().unwrap();
        assert_eq!(second, SeedReport::default());
    }

    #[test]
    fn seeded_rows_match_built_in_content() {
        let db = Database::open_in_memory().unwrap();
        db.seed_from_fallback().unwrap();

        assert_eq!(&db.get_all_questions().unwrap(), fallback::questions());
        assert_eq!(
            db.get_specialization_by_id(8).unwrap().as_ref(),
            fallback::specializations().last()
        );
    }
}
