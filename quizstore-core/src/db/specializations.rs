use std::collections::BTreeMap;

use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, error, info};

use super::Database;
use crate::error::Result;
use crate::fallback;
use crate::models::{NewSpecialization, Specialization};

const SPEC_COLUMNS: &str =
    "id, name, description, tech_score, analytic_score, creative_score, careers, skills";

fn specialization_from_row(row: &Row<'_>) -> rusqlite::Result<Specialization> {
    Ok(Specialization {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        tech_score: row.get(3)?,
        analytic_score: row.get(4)?,
        creative_score: row.get(5)?,
        careers: row.get(6)?,
        skills: row.get(7)?,
    })
}

impl Database {
    /// Specialization by name, falling back to the built-in catalog when the
    /// store has no such row or cannot be read.
    pub fn get_specialization(&self, name: &str) -> Option<Specialization> {
        match self.with_retry("get_specialization", || self.fetch_specialization(name)) {
            Ok(Some(spec)) => Some(spec),
            Ok(None) => {
                debug!(name, "specialization not stored, using built-in catalog");
                fallback::specialization(name)
            }
            Err(err) => {
                error!(name, error = %err, "get_specialization failed, using built-in catalog");
                fallback::specialization(name)
            }
        }
    }

    fn fetch_specialization(&self, name: &str) -> Result<Option<Specialization>> {
        let conn = self.conn()?;
        let spec = conn
            .query_row(
                &format!("SELECT {SPEC_COLUMNS} FROM specializations WHERE name = ?1 ORDER BY id LIMIT 1"),
                [name],
                specialization_from_row,
            )
            .optional()?;
        Ok(spec)
    }

    pub fn get_specialization_by_id(&self, id: i64) -> Result<Option<Specialization>> {
        let conn = self.conn()?;
        let spec = conn
            .query_row(
                &format!("SELECT {SPEC_COLUMNS} FROM specializations WHERE id = ?1"),
                [id],
                specialization_from_row,
            )
            .optional()?;
        Ok(spec)
    }

    /// Id of the first specialization with this exact name
    pub fn get_specialization_id_by_name(&self, name: &str) -> Result<Option<i64>> {
        let conn = self.conn()?;
        let id = conn
            .query_row(
                "SELECT id FROM specializations WHERE name = ?1 ORDER BY id LIMIT 1",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    /// Stored specialization names, sorted case-insensitively
    pub fn get_specialization_names(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT name FROM specializations ORDER BY name COLLATE NOCASE")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    pub fn get_all_specializations(&self) -> Result<BTreeMap<i64, Specialization>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {SPEC_COLUMNS} FROM specializations ORDER BY id"))?;
        let specs = stmt
            .query_map([], specialization_from_row)?
            .map(|spec| spec.map(|s| (s.id, s)))
            .collect::<rusqlite::Result<BTreeMap<_, _>>>()?;
        Ok(specs)
    }

    pub fn add_specialization(&self, spec: &NewSpecialization) -> Result<i64> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO specializations
                (name, description, tech_score, analytic_score, creative_score, careers, skills)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                spec.name,
                spec.description,
                spec.tech_score,
                spec.analytic_score,
                spec.creative_score,
                spec.careers,
                spec.skills,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!(specialization_id = id, name = %spec.name, "specialization added");
        Ok(id)
    }

    /// Returns false when no specialization had that id. Universities keep
    /// their (now dangling) `specialization_id`.
    pub fn delete_specialization(&self, id: i64) -> Result<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let deleted = tx.execute("DELETE FROM specializations WHERE id = ?1", [id])?;
        tx.commit()?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str) -> NewSpecialization {
        NewSpecialization {
            name: name.to_string(),
            description: Some("desc".into()),
            tech_score: Some(0.9),
            analytic_score: Some(0.5),
            creative_score: Some(0.1),
            careers: Some("• Backend".into()),
            skills: None,
        }
    }

    #[test]
    fn stored_specialization_is_returned_by_name_and_id() {
        let db = Database::open_in_memory().unwrap();
        let id = db.add_specialization(&spec("Робототехника")).unwrap();

        let by_name = db.get_specialization("Робототехника").unwrap();
        assert_eq!(by_name.id, id);
        assert_eq!(by_name.tech_score, Some(0.9));
        assert_eq!(db.get_specialization_by_id(id).unwrap(), Some(by_name));
        assert_eq!(db.get_specialization_id_by_name("Робототехника").unwrap(), Some(id));
    }

    #[test]
    fn unknown_name_falls_back_to_catalog() {
        let db = Database::open_in_memory().unwrap();
        let spec = db.get_specialization("Кибербезопасность").unwrap();
        assert_eq!(spec.id, 4);
        assert!(spec.tech_score.is_none());
        assert!(db.get_specialization("Нет такой").is_none());
        assert!(db.get_specialization_id_by_name("Кибербезопасность").unwrap().is_none());
    }

    #[test]
    fn names_sort_case_insensitively() {
        let db = Database::open_in_memory().unwrap();
        for name in ["data Science", "AI/ML", "Game Dev"] {
            db.add_specialization(&spec(name)).unwrap();
        }
        assert_eq!(
            db.get_specialization_names().unwrap(),
            vec!["AI/ML", "data Science", "Game Dev"]
        );
    }

    #[test]
    fn all_specializations_keyed_by_id() {
        let db = Database::open_in_memory().unwrap();
        let a = db.add_specialization(&spec("A")).unwrap();
        let b = db.add_specialization(&spec("B")).unwrap();
        let all = db.get_all_specializations().unwrap();
        assert_eq!(all.keys().copied().collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(all[&b].name, "B");
    }

    #[test]
    fn delete_reports_whether_found() {
        let db = Database::open_in_memory().unwrap();
        let id = db.add_specialization(&spec("A")).unwrap();
        assert!(db.delete_specialization(id).unwrap());
        assert!(!db.delete_specialization(id).unwrap());
        assert!(db.get_specialization_by_id(id).unwrap().is_none());
    }
}
