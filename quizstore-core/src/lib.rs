//! quizstore-core: persistence for the career-guidance quiz bot
//!
//! Stores quiz questions, user sessions, specialization profiles and partner
//! universities in one SQLite file behind a single lock. Quiz-flow reads fall
//! back to built-in content when the store has nothing to offer, and the
//! university catalog can be exported for the companion website.

pub mod config;
pub mod db;
pub mod error;
pub mod fallback;
pub mod models;
pub mod retry;
pub mod site;

pub use config::{SiteConfig, StoreConfig};
pub use db::{Database, OpenOptions};
pub use error::{Result, StoreError};
pub use models::{
    NewQuestion, NewSpecialization, NewUniversity, Question, QuestionOption, SeedReport,
    SessionTicket, Specialization, UniqueUniversity, University, UniversityCard,
    UniversityExport, UniversityListing, UserAnswer, UserSession, UserStatistics, WriteStatus,
    NO_SPECIALIZATION, QUIZ_LENGTH,
};
pub use retry::RetryPolicy;
pub use site::HtmlUpdate;
