//! End-to-end quiz flow against a real database file

use quizstore_core::fallback::{self, OPTION_SCALE};
use quizstore_core::{Database, Question, WriteStatus, QUIZ_LENGTH};
use tempfile::TempDir;

fn open() -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("quiz.db")).unwrap();
    (dir, db)
}

fn assert_scaled(question: &Question) {
    assert_eq!(question.options.len(), 4, "question {}", question.id);
    let scale: Vec<(i64, &str)> = question
        .options
        .iter()
        .map(|o| (o.value, o.category.as_str()))
        .collect();
    assert_eq!(scale, OPTION_SCALE.to_vec(), "question {}", question.id);
}

#[test]
fn test_every_stored_question_has_four_scaled_options() {
    let (_dir, db) = open();
    db.seed_from_fallback().unwrap();

    for id in 1..=QUIZ_LENGTH {
        let question = db.get_question(id).expect("seeded question");
        assert_eq!(question.id, id);
        assert_scaled(&question);
    }
}

#[test]
fn test_cleared_store_serves_built_in_quiz() {
    let (_dir, db) = open();
    db.seed_from_fallback().unwrap();
    for id in 1..=QUIZ_LENGTH {
        assert!(db.delete_question(id).unwrap());
    }
    assert!(db.get_all_questions().unwrap().is_empty());

    for id in 1..=QUIZ_LENGTH {
        let question = db.get_question(id).expect("built-in question");
        assert_eq!(Some(&question), fallback::questions().get(&id));
        assert_scaled(&question);
    }
}

#[test]
fn test_new_session_is_fresh() {
    let (_dir, db) = open();
    let ticket = db.create_user_session(1001);
    assert_eq!(ticket.status, WriteStatus::Persisted);

    let session = db.get_user_session(1001).unwrap().unwrap();
    assert_eq!(session.user_id, 1001);
    assert_eq!(session.current_question, 1);
    assert!(session.answer_map().unwrap().is_empty());
}

#[test]
fn test_full_quiz_pass_completes_on_last_question() {
    let (_dir, db) = open();
    db.create_user_session(7);

    for q in 1..QUIZ_LENGTH {
        assert_eq!(db.update_user_answers(7, q, 8), WriteStatus::Persisted);
        let session = db.get_user_session(7).unwrap().expect("still active");
        assert!(!session.is_completed);
        assert_eq!(session.current_question, q + 1);
    }

    assert_eq!(db.update_user_answers(7, QUIZ_LENGTH, 16), WriteStatus::Persisted);
    assert!(db.get_user_session(7).unwrap().is_none());

    let stats = db.get_user_statistics().unwrap();
    assert_eq!(stats.total_users, 1);
    assert_eq!(stats.active_sessions, 0);
    assert_eq!(stats.completed_tests, 1);
}

#[test]
fn test_second_session_for_same_user_is_allowed() {
    let (_dir, db) = open();
    let first = db.create_user_session(3);
    let second = db.create_user_session(3);
    assert_ne!(first.session_id, second.session_id);

    // The earliest active session is the one answers go to
    db.update_user_answers(3, 1, 4);
    let session = db.get_user_session(3).unwrap().unwrap();
    assert_eq!(session.session_id, first.session_id);
    assert_eq!(db.get_user_statistics().unwrap().active_sessions, 2);
}

#[test]
fn test_shared_handle_across_threads() {
    let (_dir, db) = open();
    let handles: Vec<_> = (0..8)
        .map(|user| {
            let db = db.clone();
            std::thread::spawn(move || {
                db.create_user_session(user);
                for q in 1..=5 {
                    assert!(db.update_user_answers(user, q, 12).is_persisted());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    assert_eq!(db.get_all_users().unwrap(), (0..8).collect::<Vec<i64>>());
    for user in 0..8 {
        let session = db.get_user_session(user).unwrap().unwrap();
        assert_eq!(session.current_question, 6);
        assert_eq!(session.answer_map().unwrap().len(), 5);
    }
}
