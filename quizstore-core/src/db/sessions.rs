use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, error};
use uuid::Uuid;

use super::{format_datetime, parse_datetime, Database};
use crate::error::{Result, StoreError};
use crate::models::{decode_answers, SessionTicket, UserSession, WriteStatus, QUIZ_LENGTH};

const ACTIVE_SESSION_SQL: &str = r#"
    SELECT id, user_id, session_id, current_question, answers, is_completed, created_at
    FROM user_sessions
    WHERE user_id = ?1 AND is_completed = 0
    ORDER BY id
    LIMIT 1
"#;

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<UserSession> {
    Ok(UserSession {
        id: row.get(0)?,
        user_id: row.get(1)?,
        session_id: row.get(2)?,
        current_question: row.get(3)?,
        answers: row.get(4)?,
        is_completed: row.get::<_, i64>(5)? != 0,
        created_at: parse_datetime(row.get(6)?),
    })
}

impl Database {
    /// Start a quiz pass for `user_id`.
    ///
    /// Always hands back a token. When the row could not be written the
    /// ticket status is [`WriteStatus::Failed`] and the token is not backed
    /// by storage. An already-active session is left untouched.
    pub fn create_user_session(&self, user_id: i64) -> SessionTicket {
        let session_id = Uuid::new_v4().to_string();

        let status = match self.with_retry("create_user_session", || {
            self.insert_session(user_id, &session_id)
        }) {
            Ok(()) => WriteStatus::Persisted,
            Err(err) => {
                error!(user_id, error = %err, "create_user_session failed, token is not persisted");
                WriteStatus::Failed(err.to_string())
            }
        };

        SessionTicket { session_id, status }
    }

    fn insert_session(&self, user_id: i64, session_id: &str) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO user_sessions (user_id, session_id, current_question, answers, is_completed, created_at)
            VALUES (?1, ?2, 1, '{}', 0, ?3)
            "#,
            params![user_id, session_id, format_datetime(Utc::now())],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// The user's active (not completed) session, as stored.
    pub fn get_user_session(&self, user_id: i64) -> Result<Option<UserSession>> {
        self.with_retry("get_user_session", || {
            let conn = self.conn()?;
            let session = conn
                .query_row(ACTIVE_SESSION_SQL, [user_id], session_from_row)
                .optional()?;
            Ok(session)
        })
    }

    /// Record `answer_value` for `question_id` in the active session.
    ///
    /// Moves the cursor to `question_id + 1` and completes the session once
    /// the last quiz question is answered. Failures are logged and reported
    /// through the returned status, never raised.
    pub fn update_user_answers(&self, user_id: i64, question_id: i64, answer_value: i64) -> WriteStatus {
        let result = self.with_retry("update_user_answers", || {
            self.write_answer(user_id, question_id, answer_value)
        });

        match result {
            Ok(status) => {
                if status == WriteStatus::NoActiveSession {
                    debug!(user_id, question_id, "no active session, answer dropped");
                }
                status
            }
            Err(err) => {
                error!(user_id, question_id, error = %err, "update_user_answers failed");
                WriteStatus::Failed(err.to_string())
            }
        }
    }

    fn write_answer(&self, user_id: i64, question_id: i64, answer_value: i64) -> Result<WriteStatus> {
        let next_question = question_id
            .checked_add(1)
            .ok_or_else(|| StoreError::invalid_record("question", question_id, "id out of range"))?;

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let Some(session) = tx.query_row(ACTIVE_SESSION_SQL, [user_id], session_from_row).optional()? else {
            return Ok(WriteStatus::NoActiveSession);
        };

        let mut answers = decode_answers(&session.answers)
            .map_err(|e| StoreError::json(format!("answers of session {}", session.id), e))?;
        answers.insert(question_id, answer_value);
        let encoded = serde_json::to_string(&answers)
            .map_err(|e| StoreError::json(format!("answers of session {}", session.id), e))?;

        tx.execute(
            r#"
            UPDATE user_sessions
            SET answers = ?1, current_question = ?2, is_completed = ?3
            WHERE id = ?4
            "#,
            params![encoded, next_question, question_id >= QUIZ_LENGTH, session.id],
        )?;
        tx.commit()?;

        Ok(WriteStatus::Persisted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_at_first_question() {
        let db = Database::open_in_memory().unwrap();
        let ticket = db.create_user_session(42);
        assert!(ticket.status.is_persisted());

        let session = db.get_user_session(42).unwrap().unwrap();
        assert_eq!(session.session_id, ticket.session_id);
        assert_eq!(session.current_question, 1);
        assert!(!session.is_completed);
        assert!(session.answer_map().unwrap().is_empty());
    }

    #[test]
    fn unknown_user_has_no_session() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_user_session(7).unwrap().is_none());
    }

    #[test]
    fn answer_without_session_is_reported() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.update_user_answers(7, 1, 4), WriteStatus::NoActiveSession);
    }

    #[test]
    fn answers_merge_and_advance_cursor() {
        let db = Database::open_in_memory().unwrap();
        db.create_user_session(1);

        assert!(db.update_user_answers(1, 1, 4).is_persisted());
        assert!(db.update_user_answers(1, 2, 16).is_persisted());
        // Re-answering overwrites
        assert!(db.update_user_answers(1, 1, 8).is_persisted());

        let session = db.get_user_session(1).unwrap().unwrap();
        let answers = session.answer_map().unwrap();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[&1], 8);
        assert_eq!(answers[&2], 16);
        assert_eq!(session.current_question, 2);
    }

    #[test]
    fn last_question_completes_session() {
        let db = Database::open_in_memory().unwrap();
        db.create_user_session(5);
        db.update_user_answers(5, QUIZ_LENGTH, 12);

        assert!(db.get_user_session(5).unwrap().is_none());
        assert_eq!(db.update_user_answers(5, 1, 4), WriteStatus::NoActiveSession);
    }

    #[test]
    fn out_of_range_question_id_is_reported_as_failed() {
        let db = Database::open_in_memory().unwrap();
        db.create_user_session(1);
        db.update_user_answers(1, 3, 8);

        assert!(matches!(db.update_user_answers(1, i64::MAX, 4), WriteStatus::Failed(_)));

        let session = db.get_user_session(1).unwrap().unwrap();
        assert_eq!(session.current_question, 4);
        assert_eq!(session.answer_map().unwrap().len(), 1);
    }

    #[test]
    fn corrupt_answers_are_reported_as_failed() {
        let db = Database::open_in_memory().unwrap();
        db.create_user_session(9);
        db.conn()
            .unwrap()
            .execute("UPDATE user_sessions SET answers = '[1, 2' WHERE user_id = 9", [])
            .unwrap();

        assert!(matches!(db.update_user_answers(9, 1, 4), WriteStatus::Failed(_)));
    }
}
