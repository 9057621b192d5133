use super::Database;
use crate::error::Result;
use crate::models::UserStatistics;

impl Database {
    /// Distinct users, active sessions and completed sessions
    pub fn get_user_statistics(&self) -> Result<UserStatistics> {
        let conn = self.conn()?;
        let stats = conn.query_row(
            r#"
            SELECT
                COUNT(DISTINCT user_id),
                COALESCE(SUM(CASE WHEN is_completed = 0 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN is_completed = 1 THEN 1 ELSE 0 END), 0)
            FROM user_sessions
            "#,
            [],
            |row| {
                Ok(UserStatistics {
                    total_users: row.get(0)?,
                    active_sessions: row.get(1)?,
                    completed_tests: row.get(2)?,
                })
            },
        )?;
        Ok(stats)
    }

    /// Every user id that ever started a session, ascending
    pub fn get_all_users(&self) -> Result<Vec<i64>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT DISTINCT user_id FROM user_sessions ORDER BY user_id")?;
        let users = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QUIZ_LENGTH;

    #[test]
    fn empty_store_has_zero_counters() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_user_statistics().unwrap(), UserStatistics::default());
        assert!(db.get_all_users().unwrap().is_empty());
    }

    #[test]
    fn counters_split_active_and_completed() {
        let db = Database::open_in_memory().unwrap();
        db.create_user_session(10);
        db.update_user_answers(10, QUIZ_LENGTH, 4);
        db.create_user_session(10);
        db.create_user_session(20);

        let stats = db.get_user_statistics().unwrap();
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.active_sessions, 2);
        assert_eq!(stats.completed_tests, 1);
        assert_eq!(db.get_all_users().unwrap(), vec![10, 20]);
    }
}
