//! Record types for the quiz store
//!
//! Live rows and fallback constants share these types so callers never
//! need to know which source answered.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Number of questions in the quiz. Answering this question completes a session.
pub const QUIZ_LENGTH: i64 = 30;

/// Sentinel specialization name matching universities with no specialization.
pub const NO_SPECIALIZATION: &str = "Без специализации";

/// City label used when a university has no location.
pub const UNKNOWN_CITY: &str = "Неизвестный город";

/// Prefix of the derived `program` label in per-specialization listings.
pub const PROGRAM_PREFIX: &str = "Специализация: ";

// ============================================================================
// Questions
// ============================================================================

/// One answer choice of a quiz question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub text: String,
    pub value: i64,
    pub category: String,
}

/// A quiz question with its options decoded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub category: String,
    pub options: Vec<QuestionOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuestion {
    pub text: String,
    pub category: String,
    pub options: Vec<QuestionOption>,
}

// ============================================================================
// Specializations
// ============================================================================

/// A study specialization the quiz can recommend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specialization {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub tech_score: Option<f64>,
    pub analytic_score: Option<f64>,
    pub creative_score: Option<f64>,
    pub careers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSpecialization {
    pub name: String,
    pub description: Option<String>,
    pub tech_score: Option<f64>,
    pub analytic_score: Option<f64>,
    pub creative_score: Option<f64>,
    pub careers: Option<String>,
    pub skills: Option<String>,
}

// ============================================================================
// Universities
// ============================================================================

/// University row as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct University {
    pub id: i64,
    pub name: String,
    pub specialization_id: Option<i64>,
    pub score_min: Option<f64>,
    pub score_max: Option<f64>,
    pub location: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewUniversity {
    pub name: String,
    pub specialization_id: Option<i64>,
    pub score_min: Option<f64>,
    pub score_max: Option<f64>,
    pub location: Option<String>,
    pub url: Option<String>,
}

/// University as listed under a specialization name, with a `program` label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniversityListing {
    pub name: String,
    pub score_min: Option<f64>,
    pub score_max: Option<f64>,
    pub url: Option<String>,
    pub location: Option<String>,
    pub program: String,
}

/// University card shown to quiz takers, with a derived `city`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniversityCard {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub score_min: Option<f64>,
    pub score_max: Option<f64>,
    pub url: Option<String>,
    pub location: Option<String>,
}

/// One entry of the deduplicated university view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueUniversity {
    pub name: String,
    pub location: Option<String>,
    pub url: Option<String>,
}

/// Entry of the website export (`universities.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniversityExport {
    pub name: String,
    pub city: Option<String>,
    pub score_min: Option<f64>,
    pub score_max: Option<f64>,
    pub url: Option<String>,
    pub specialization: Option<String>,
}

/// Text before the first comma of a location, or [`UNKNOWN_CITY`].
pub fn city_from_location(location: Option<&str>) -> String {
    match location.map(str::trim) {
        Some(loc) if !loc.is_empty() => loc
            .split(',')
            .next()
            .unwrap_or(loc)
            .trim()
            .to_string(),
        _ => UNKNOWN_CITY.to_string(),
    }
}

// ============================================================================
// Sessions
// ============================================================================

/// A user's pass through the quiz, as stored
///
/// `answers` is kept as the raw JSON text of the row; use
/// [`UserSession::answer_map`] to decode it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    pub id: i64,
    pub user_id: i64,
    pub session_id: String,
    pub current_question: i64,
    pub answers: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl UserSession {
    /// Decode the stored answers as question id -> chosen value
    pub fn answer_map(&self) -> Result<BTreeMap<i64, i64>> {
        decode_answers(&self.answers)
            .map_err(|e| StoreError::json(format!("answers of session {}", self.id), e))
    }
}

pub(crate) fn decode_answers(raw: &str) -> serde_json::Result<BTreeMap<i64, i64>> {
    if raw.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(raw)
}

/// Per-question answer log row. The table exists; no operation writes it yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAnswer {
    pub id: i64,
    pub user_id: i64,
    pub question_id: i64,
    pub answer_value: i64,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
}

/// Result of a best-effort write. Degraded outcomes are reported, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteStatus {
    Persisted,
    NoActiveSession,
    Failed(String),
}

impl WriteStatus {
    pub fn is_persisted(&self) -> bool {
        matches!(self, WriteStatus::Persisted)
    }
}

/// Token handed out by `create_user_session`
///
/// `session_id` is always usable by the caller; `status` tells whether a
/// stored row backs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTicket {
    pub session_id: String,
    pub status: WriteStatus,
}

/// Aggregate session counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserStatistics {
    pub total_users: i64,
    pub active_sessions: i64,
    pub completed_tests: i64,
}

/// Counts of rows inserted by seeding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeedReport {
    pub questions: usize,
    pub specializations: usize,
}
