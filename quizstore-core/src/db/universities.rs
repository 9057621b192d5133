use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{error, info};

use super::Database;
use crate::error::Result;
use crate::fallback;
use crate::models::{
    city_from_location, NewUniversity, UniqueUniversity, University, UniversityCard,
    UniversityListing, NO_SPECIALIZATION, PROGRAM_PREFIX,
};

const UNIVERSITY_COLUMNS: &str = "id, name, specialization_id, score_min, score_max, location, url";

fn university_from_row(row: &Row<'_>) -> rusqlite::Result<University> {
    Ok(University {
        id: row.get(0)?,
        name: row.get(1)?,
        specialization_id: row.get(2)?,
        score_min: row.get(3)?,
        score_max: row.get(4)?,
        location: row.get(5)?,
        url: row.get(6)?,
    })
}

fn universities_for_spec(conn: &Connection, specialization_id: i64) -> Result<Vec<University>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {UNIVERSITY_COLUMNS} FROM universities WHERE specialization_id = ?1 ORDER BY id"
    ))?;
    let rows = stmt
        .query_map([specialization_id], university_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

impl Database {
    pub fn get_university(&self, id: i64) -> Result<Option<University>> {
        let conn = self.conn()?;
        let uni = conn
            .query_row(
                &format!("SELECT {UNIVERSITY_COLUMNS} FROM universities WHERE id = ?1"),
                [id],
                university_from_row,
            )
            .optional()?;
        Ok(uni)
    }

    /// Universities of the named specialization, labelled with a `program`.
    /// Unknown names yield an empty list.
    pub fn get_universities(&self, spec_name: &str) -> Result<Vec<UniversityListing>> {
        let conn = self.conn()?;
        let spec_id: Option<i64> = conn
            .query_row(
                "SELECT id FROM specializations WHERE name = ?1 ORDER BY id LIMIT 1",
                [spec_name],
                |row| row.get(0),
            )
            .optional()?;

        let Some(spec_id) = spec_id else {
            return Ok(Vec::new());
        };

        let program = format!("{PROGRAM_PREFIX}{spec_name}");
        let listings = universities_for_spec(&conn, spec_id)?
            .into_iter()
            .map(|u| UniversityListing {
                name: u.name,
                score_min: u.score_min,
                score_max: u.score_max,
                url: u.url,
                location: u.location,
                program: program.clone(),
            })
            .collect();
        Ok(listings)
    }

    /// University cards for a specialization id.
    ///
    /// Falls back to the built-in sample set when the lookup fails; an empty
    /// result is returned as is.
    pub fn get_universities_by_specialization(&self, specialization_id: i64) -> Vec<UniversityCard> {
        let result = self.with_retry("get_universities_by_specialization", || {
            let conn = self.conn()?;
            universities_for_spec(&conn, specialization_id)
        });

        match result {
            Ok(rows) => rows
                .into_iter()
                .map(|u| UniversityCard {
                    city: city_from_location(u.location.as_deref()),
                    id: u.id,
                    name: u.name,
                    score_min: u.score_min,
                    score_max: u.score_max,
                    url: u.url,
                    location: u.location,
                })
                .collect(),
            Err(err) => {
                error!(
                    specialization_id,
                    error = %err,
                    "get_universities_by_specialization failed, using sample universities"
                );
                fallback::sample_universities()
            }
        }
    }

    /// Every university attached to an existing specialization, grouped by
    /// specialization, with ids renumbered from 1.
    pub fn get_all_universities(&self) -> Result<Vec<University>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT u.id, u.name, s.id, u.score_min, u.score_max, u.location, u.url
            FROM universities u
            JOIN specializations s ON s.id = u.specialization_id
            ORDER BY s.id, u.id
            "#,
        )?;
        let rows = stmt
            .query_map([], university_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows
            .into_iter()
            .zip(1..)
            .map(|(uni, id)| University { id, ..uni })
            .collect())
    }

    pub fn add_university(&self, uni: &NewUniversity) -> Result<i64> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO universities (name, specialization_id, score_min, score_max, location, url)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                uni.name,
                uni.specialization_id,
                uni.score_min,
                uni.score_max,
                uni.location,
                uni.url,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!(university_id = id, name = %uni.name, "university added");
        Ok(id)
    }

    /// Returns false when no university had that id.
    pub fn delete_university(&self, id: i64) -> Result<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let deleted = tx.execute("DELETE FROM universities WHERE id = ?1", [id])?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    /// Delete every row with this name, across all specializations.
    /// Returns the number of rows removed.
    pub fn delete_university_by_name(&self, name: &str) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let deleted = tx.execute("DELETE FROM universities WHERE name = ?1", [name])?;
        tx.commit()?;

        info!(name, deleted, "university rows deleted by name");
        Ok(deleted)
    }

    pub fn get_unique_universities_count(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(DISTINCT name) FROM universities", [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }

    /// One entry per distinct name, carrying the location and url of its
    /// earliest row, sorted case-insensitively. Empty urls read as absent.
    pub fn get_unique_universities(&self) -> Result<Vec<UniqueUniversity>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT u.name, u.location, u.url
            FROM universities u
            WHERE u.id IN (SELECT MIN(id) FROM universities GROUP BY name)
            ORDER BY u.name COLLATE NOCASE, u.id
            "#,
        )?;
        let unis = stmt
            .query_map([], |row| {
                let url: Option<String> = row.get(2)?;
                Ok(UniqueUniversity {
                    name: row.get(0)?,
                    location: row.get(1)?,
                    url: url.filter(|u| !u.is_empty()),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(unis)
    }

    /// Lowest id among rows with this name
    pub fn get_university_id_by_name(&self, name: &str) -> Result<Option<i64>> {
        let conn = self.conn()?;
        let id = conn
            .query_row(
                "SELECT id FROM universities WHERE name = ?1 ORDER BY id LIMIT 1",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    pub fn get_university_name_by_id(&self, id: i64) -> Result<Option<String>> {
        let conn = self.conn()?;
        let name = conn
            .query_row("SELECT name FROM universities WHERE id = ?1", [id], |row| row.get(0))
            .optional()?;
        Ok(name)
    }

    /// Lowest id among rows with this name under the named specialization.
    ///
    /// [`NO_SPECIALIZATION`] matches rows without a (resolvable) specialization.
    pub fn get_university_id_by_name_and_spec(&self, name: &str, spec_name: &str) -> Result<Option<i64>> {
        let conn = self.conn()?;
        let id = conn
            .query_row(
                r#"
                SELECT u.id FROM universities u
                LEFT JOIN specializations s ON s.id = u.specialization_id
                WHERE u.name = ?1 AND (s.name = ?2 OR (?2 = ?3 AND s.name IS NULL))
                ORDER BY u.id
                LIMIT 1
                "#,
                params![name, spec_name, NO_SPECIALIZATION],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }
}
