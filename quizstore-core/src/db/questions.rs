use std::collections::BTreeMap;

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, error, info};

use super::{format_datetime, Database};
use crate::error::{Result, StoreError};
use crate::fallback;
use crate::models::{NewQuestion, Question, QuestionOption};

/// Question row with options still encoded
struct QuestionRow {
    id: i64,
    text: String,
    category: String,
    options: String,
}

impl QuestionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            text: row.get(1)?,
            category: row.get(2)?,
            options: row.get(3)?,
        })
    }

    fn decode(self) -> Result<Question> {
        let options: Vec<QuestionOption> = serde_json::from_str(&self.options)
            .map_err(|e| StoreError::json(format!("options of question {}", self.id), e))?;
        Ok(Question {
            id: self.id,
            text: self.text,
            category: self.category,
            options,
        })
    }
}

impl Database {
    /// Question by id, falling back to the built-in quiz when the store has
    /// no such row or cannot be read.
    pub fn get_question(&self, question_id: i64) -> Option<Question> {
        match self.with_retry("get_question", || self.fetch_question(question_id)) {
            Ok(Some(question)) => Some(question),
            Ok(None) => {
                debug!(question_id, "question not stored, using built-in quiz");
                fallback::question(question_id)
            }
            Err(err) => {
                error!(question_id, error = %err, "get_question failed, using built-in quiz");
                fallback::question(question_id)
            }
        }
    }

    fn fetch_question(&self, question_id: i64) -> Result<Option<Question>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT id, text, category, options FROM questions WHERE id = ?1",
                [question_id],
                QuestionRow::from_row,
            )
            .optional()?;

        row.map(QuestionRow::decode).transpose()
    }

    /// Every stored question keyed by id. No fallback.
    pub fn get_all_questions(&self) -> Result<BTreeMap<i64, Question>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, text, category, options FROM questions ORDER BY id")?;

        let rows = stmt
            .query_map([], QuestionRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|row| row.decode().map(|q| (q.id, q)))
            .collect()
    }

    pub fn add_question(&self, question: &NewQuestion) -> Result<i64> {
        let options = serde_json::to_string(&question.options)
            .map_err(|e| StoreError::json("question options", e))?;

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO questions (text, options, category, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![question.text, options, question.category, format_datetime(Utc::now())],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!(question_id = id, "question added");
        Ok(id)
    }

    /// Returns false when no question had that id.
    pub fn delete_question(&self, question_id: i64) -> Result<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let deleted = tx.execute("DELETE FROM questions WHERE id = ?1", [question_id])?;
        tx.commit()?;
        Ok(deleted > 0)
    }
}
